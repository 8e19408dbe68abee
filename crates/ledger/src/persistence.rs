//! Snapshot storage used by [`Ledger`](crate::Ledger).

use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{PersistenceError, Snapshot};

/// Loads and saves whole-ledger snapshots.
///
/// The ledger treats this as best-effort durability: a failed `save` is
/// reported but never undoes the in-memory change that produced it.
pub trait PersistenceGateway {
    /// The last saved snapshot, or `None` when nothing was ever saved.
    fn load(&self) -> Result<Option<Snapshot>, PersistenceError>;

    fn save(&mut self, snapshot: &Snapshot) -> Result<(), PersistenceError>;
}

/// Stores the snapshot as a pretty-printed JSON file.
#[derive(Clone, Debug)]
pub struct JsonFileGateway {
    path: PathBuf,
}

impl JsonFileGateway {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PersistenceGateway for JsonFileGateway {
    fn load(&self) -> Result<Option<Snapshot>, PersistenceError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Ok(None);
            }
            Err(err) => return Err(err.into()),
        };
        Ok(Some(serde_json::from_str(&content)?))
    }

    fn save(&mut self, snapshot: &Snapshot) -> Result<(), PersistenceError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        let payload = serde_json::to_string_pretty(snapshot)?;
        fs::write(&self.path, payload)?;
        Ok(())
    }
}

/// Keeps the last snapshot in memory. Nothing survives the process.
#[derive(Clone, Debug, Default)]
pub struct MemoryGateway {
    stored: Option<Snapshot>,
    saves: usize,
}

impl MemoryGateway {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_snapshot(snapshot: Snapshot) -> Self {
        Self {
            stored: Some(snapshot),
            saves: 0,
        }
    }

    #[must_use]
    pub fn stored(&self) -> Option<&Snapshot> {
        self.stored.as_ref()
    }

    /// Number of successful `save` calls.
    #[must_use]
    pub fn saves(&self) -> usize {
        self.saves
    }
}

impl PersistenceGateway for MemoryGateway {
    fn load(&self) -> Result<Option<Snapshot>, PersistenceError> {
        Ok(self.stored.clone())
    }

    fn save(&mut self, snapshot: &Snapshot) -> Result<(), PersistenceError> {
        self.stored = Some(snapshot.clone());
        self.saves += 1;
        Ok(())
    }
}
