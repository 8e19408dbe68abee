use ledger::{FilterKind, JsonFileGateway, Ledger};

use crate::error::Result;

mod error;
mod settings;

fn main() -> Result<()> {
    let settings = settings::Settings::new()?;

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "splitledger={level},ledger={level}",
            level = settings.level
        ))
        .init();

    tracing::info!("opening ledger at {}", settings.snapshot_path);
    let mut ledger = Ledger::builder()
        .gateway(JsonFileGateway::new(&settings.snapshot_path))
        .open()?;

    if let Some(err) = ledger.take_persistence_error() {
        tracing::error!("ledger storage problem, running from memory: {err}");
    }
    if ledger.saves_suspended() {
        tracing::warn!(
            "saves are suspended until {} is repaired or replaced",
            settings.snapshot_path
        );
    }

    for contact in ledger.contacts() {
        tracing::info!(
            id = %contact.id,
            category = %contact.category,
            "{}",
            contact.status()
        );
    }

    let owed = ledger.view(FilterKind::TheyOweMe, "").len();
    let owing = ledger.view(FilterKind::IOweThem, "").len();
    tracing::info!(
        contacts = ledger.contacts().len(),
        owed,
        owing,
        "ledger ready"
    );

    Ok(())
}
