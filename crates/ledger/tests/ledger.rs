use std::sync::{Arc, Mutex};

use ledger::{
    Category, ClampOutcome, Contact, ContactDraft, ContactId, FilterKind, JsonFileGateway, Ledger,
    LedgerError, MemoryGateway, Money, Payer, PersistenceError, PersistenceGateway, Snapshot,
    SplitForm, placeholder_image, sequential_ids,
};
use uuid::Uuid;

/// Gateway that records every save and can be told to fail.
#[derive(Clone, Default)]
struct Recorder {
    stored: Arc<Mutex<Option<Snapshot>>>,
    saves: Arc<Mutex<Vec<Snapshot>>>,
    fail_load: bool,
    fail_save: Arc<Mutex<bool>>,
}

impl Recorder {
    fn saves(&self) -> Vec<Snapshot> {
        self.saves.lock().unwrap().clone()
    }

    fn set_failing(&self, failing: bool) {
        *self.fail_save.lock().unwrap() = failing;
    }
}

impl PersistenceGateway for Recorder {
    fn load(&self) -> Result<Option<Snapshot>, PersistenceError> {
        if self.fail_load {
            return Err(std::io::Error::other("disk on fire").into());
        }
        Ok(self.stored.lock().unwrap().clone())
    }

    fn save(&mut self, snapshot: &Snapshot) -> Result<(), PersistenceError> {
        if *self.fail_save.lock().unwrap() {
            return Err(std::io::Error::other("read-only").into());
        }
        *self.stored.lock().unwrap() = Some(snapshot.clone());
        self.saves.lock().unwrap().push(snapshot.clone());
        Ok(())
    }
}

fn open_seeded() -> (Ledger, Recorder) {
    let recorder = Recorder::default();
    let ledger = Ledger::builder()
        .gateway(recorder.clone())
        .id_generator(sequential_ids(1))
        .open()
        .unwrap();
    (ledger, recorder)
}

fn id_of(ledger: &Ledger, name: &str) -> ContactId {
    ledger
        .contacts()
        .iter()
        .find(|contact| contact.name == name)
        .map(|contact| contact.id)
        .expect("seed contact missing")
}

#[test]
fn first_open_seeds_and_saves() {
    let (mut ledger, recorder) = open_seeded();

    assert_eq!(ledger.snapshot(), Snapshot::seed());
    assert_eq!(recorder.saves(), vec![Snapshot::seed()]);
    assert!(ledger.take_persistence_error().is_none());
}

#[test]
fn reopen_uses_stored_snapshot() {
    let (mut ledger, recorder) = open_seeded();
    let dana = ledger.add_contact(ContactDraft::new("Dana")).unwrap();

    let reopened = Ledger::builder().gateway(recorder.clone()).open().unwrap();
    assert_eq!(reopened.contacts().len(), 4);
    assert_eq!(reopened.contacts()[3], dana);
    // no seed save on reopen
    assert_eq!(recorder.saves().len(), 2);
}

#[test]
fn added_ids_are_unique() {
    let (mut ledger, _) = open_seeded();
    for i in 0..20 {
        let contact = ledger
            .add_contact(ContactDraft::new(format!("Guest {i}")))
            .unwrap();
        let same_id = ledger
            .contacts()
            .iter()
            .filter(|c| c.id == contact.id)
            .count();
        assert_eq!(same_id, 1);
    }
    assert_eq!(ledger.contacts().len(), 23);
    assert_eq!(ledger.contacts()[3].name, "Guest 0");
}

#[test]
fn add_rejects_empty_name() {
    let (mut ledger, recorder) = open_seeded();
    let err = ledger.add_contact(ContactDraft::new("  ")).unwrap_err();
    assert!(matches!(err, LedgerError::Validation(_)));
    assert_eq!(ledger.contacts().len(), 3);
    assert_eq!(recorder.saves().len(), 1);
}

#[test]
fn repeated_adjustments_do_not_drift() {
    let (mut ledger, _) = open_seeded();
    let anthony = id_of(&ledger, "Anthony");
    let deltas = ["10.10", "3.33", "10.10", "-3.33", "3.33", "0.01"];

    let mut expected = Money::ZERO;
    for delta in deltas {
        let delta: Money = delta.parse().unwrap();
        expected += delta;
        ledger.adjust_balance(anthony, delta).unwrap();
    }

    assert_eq!(expected, Money::new(2354));
    assert_eq!(ledger.contact(anthony).unwrap().balance, expected);
}

#[test]
fn adjust_unknown_contact_is_not_found() {
    let (mut ledger, recorder) = open_seeded();
    let err = ledger
        .adjust_balance(ContactId::from_u128(999), Money::major(5))
        .unwrap_err();
    assert!(matches!(err, LedgerError::NotFound(_)));
    assert_eq!(recorder.saves().len(), 1);
}

#[test]
fn user_paid_split_credits_friend_share() {
    let (mut ledger, recorder) = open_seeded();
    let sarah = id_of(&ledger, "Sarah");
    ledger.select(sarah);

    let mut form = SplitForm::new();
    form.set_bill("100").unwrap();
    form.set_user_expense("40").unwrap();
    form.set_payer(Payer::User);

    let updated = ledger.apply_split(&mut form).unwrap();
    assert_eq!(updated.balance, Money::major(80));
    assert_eq!(ledger.selection().current(), None);
    assert_eq!(form, SplitForm::new());
    assert_eq!(
        recorder.saves().last().unwrap().contacts[1].balance,
        Money::major(80)
    );
}

#[test]
fn friend_paid_split_debits_user_share() {
    let (mut ledger, _) = open_seeded();
    let anthony = id_of(&ledger, "Anthony");
    ledger.toggle_selection(anthony);

    let mut form = SplitForm::new();
    form.set_bill("50").unwrap();
    form.set_user_expense("50").unwrap();
    form.set_payer(Payer::Friend);

    let updated = ledger.apply_split(&mut form).unwrap();
    assert_eq!(updated.balance, Money::major(-50));
    assert_eq!(
        updated.status().to_string(),
        "you owe Anthony ₹50.00"
    );
}

#[test]
fn split_without_selection_changes_nothing() {
    let (mut ledger, recorder) = open_seeded();
    let mut form = SplitForm::new();
    form.set_bill("30").unwrap();
    form.set_user_expense("10").unwrap();

    let err = ledger.apply_split(&mut form).unwrap_err();
    assert!(matches!(err, LedgerError::Validation(_)));
    assert_eq!(form.bill(), Some(Money::major(30)));
    assert_eq!(ledger.snapshot(), Snapshot::seed());
    assert_eq!(recorder.saves().len(), 1);
}

#[test]
fn invalid_split_keeps_selection() {
    let (mut ledger, _) = open_seeded();
    let clark = id_of(&ledger, "Clark");
    ledger.select(clark);

    let mut form = SplitForm::new();
    form.set_bill("30").unwrap();
    assert!(ledger.apply_split(&mut form).is_err());
    assert!(ledger.selection().is_selected(clark));
    assert_eq!(ledger.contact(clark).unwrap().balance, Money::major(-7));
}

#[test]
fn user_expense_above_bill_keeps_last_valid_value() {
    let (mut ledger, _) = open_seeded();
    let sarah = id_of(&ledger, "Sarah");
    ledger.select(sarah);

    let mut form = SplitForm::new();
    form.set_bill("30").unwrap();
    form.set_user_expense("30").unwrap();
    assert_eq!(form.set_user_expense("45").unwrap(), ClampOutcome::Kept);
    assert_eq!(form.user_expense(), Some(Money::major(30)));

    // user paid everything for themselves: nothing owed
    let updated = ledger.apply_split(&mut form).unwrap();
    assert_eq!(updated.balance, Money::major(20));
}

#[test]
fn removing_selected_contact_clears_selection() {
    let (mut ledger, _) = open_seeded();
    let clark = id_of(&ledger, "Clark");
    ledger.select(clark);

    let removed = ledger.remove_contact(clark).unwrap();
    assert_eq!(removed.name, "Clark");
    assert_eq!(ledger.selection().current(), None);
    assert!(ledger.selected_contact().is_none());

    ledger.select(clark);
    assert_eq!(ledger.selection().current(), None);
}

#[test]
fn removing_other_contact_keeps_selection() {
    let (mut ledger, _) = open_seeded();
    let clark = id_of(&ledger, "Clark");
    let sarah = id_of(&ledger, "Sarah");
    ledger.select(sarah);
    ledger.remove_contact(clark);
    assert!(ledger.selection().is_selected(sarah));
}

#[test]
fn remove_is_idempotent() {
    let (mut ledger, recorder) = open_seeded();
    let sarah = id_of(&ledger, "Sarah");

    assert!(ledger.remove_contact(sarah).is_some());
    let once = ledger.snapshot();
    assert!(ledger.remove_contact(sarah).is_none());

    assert_eq!(ledger.snapshot(), once);
    assert_eq!(recorder.saves().len(), 2);
}

#[test]
fn view_filters_the_live_ledger() {
    let (mut ledger, _) = open_seeded();
    ledger
        .add_contact(
            ContactDraft::new("Mara")
                .balance(Money::major(3))
                .category(Category::Family),
        )
        .unwrap();

    let owed: Vec<_> = ledger
        .view(FilterKind::TheyOweMe, "")
        .iter()
        .map(|c| c.name.clone())
        .collect();
    assert_eq!(owed, ["Sarah", "Mara"]);

    let family_ar: Vec<_> = ledger
        .view(FilterKind::Category(Category::Family), "AR")
        .iter()
        .map(|c| c.name.clone())
        .collect();
    assert_eq!(family_ar, ["Sarah", "Mara"]);

    let sar: Vec<_> = ledger
        .view(FilterKind::All, "sar")
        .iter()
        .map(|c| c.name.clone())
        .collect();
    assert_eq!(sar, ["Sarah"]);
}

#[test]
fn save_failure_keeps_mutation_and_reports() {
    let (mut ledger, recorder) = open_seeded();
    let sarah = id_of(&ledger, "Sarah");
    recorder.set_failing(true);

    let updated = ledger.adjust_balance(sarah, Money::major(5)).unwrap();
    assert_eq!(updated.balance, Money::major(25));
    assert_eq!(ledger.contact(sarah).unwrap().balance, Money::major(25));

    let err = ledger.take_persistence_error().unwrap();
    assert!(matches!(err, PersistenceError::Io(_)));
    assert!(ledger.take_persistence_error().is_none());

    recorder.set_failing(false);
    ledger.adjust_balance(sarah, Money::major(1)).unwrap();
    assert!(ledger.take_persistence_error().is_none());
    assert_eq!(
        recorder.saves().last().unwrap().contacts[1].balance,
        Money::major(26)
    );
}

#[test]
fn load_failure_starts_from_seed() {
    let recorder = Recorder {
        fail_load: true,
        ..Recorder::default()
    };
    let mut ledger = Ledger::builder().gateway(recorder.clone()).open().unwrap();

    assert_eq!(ledger.snapshot(), Snapshot::seed());
    assert!(matches!(
        ledger.take_persistence_error(),
        Some(PersistenceError::Io(_))
    ));
    assert!(recorder.saves().is_empty());
    assert!(ledger.saves_suspended());
}

#[test]
fn unreadable_snapshot_is_not_overwritten_by_later_mutations() {
    let id = ContactId::from_u128(7);
    let real = Snapshot::new(vec![Contact {
        id,
        name: "RealUserData".to_string(),
        image_ref: placeholder_image(id),
        balance: Money::major(3),
        category: Category::Friend,
    }]);
    let recorder = Recorder {
        stored: Arc::new(Mutex::new(Some(real.clone()))),
        fail_load: true,
        ..Recorder::default()
    };
    let mut ledger = Ledger::builder()
        .gateway(recorder.clone())
        .id_generator(sequential_ids(1))
        .open()
        .unwrap();
    ledger.take_persistence_error();

    let dana = ledger.add_contact(ContactDraft::new("Dana")).unwrap();
    assert!(ledger.contact(dana.id).is_some());
    assert!(matches!(
        ledger.take_persistence_error(),
        Some(PersistenceError::Suspended)
    ));
    let clark = id_of(&ledger, "Clark");
    ledger.adjust_balance(clark, Money::major(1)).unwrap();
    assert!(recorder.saves().is_empty());

    let recovered = Ledger::builder()
        .gateway(Recorder {
            fail_load: false,
            ..recorder.clone()
        })
        .open()
        .unwrap();
    assert_eq!(recovered.snapshot(), real);
    assert!(!recovered.saves_suspended());
}

#[test]
fn resume_saves_writes_the_in_memory_ledger() {
    let recorder = Recorder {
        stored: Arc::new(Mutex::new(Some(Snapshot::seed()))),
        fail_load: true,
        ..Recorder::default()
    };
    let mut ledger = Ledger::builder().gateway(recorder.clone()).open().unwrap();
    let sarah = id_of(&ledger, "Sarah");
    ledger.adjust_balance(sarah, Money::major(5)).unwrap();

    recorder.set_failing(true);
    assert!(ledger.resume_saves().is_err());
    assert!(ledger.saves_suspended());

    recorder.set_failing(false);
    ledger.resume_saves().unwrap();
    assert!(!ledger.saves_suspended());
    assert_eq!(recorder.saves(), vec![ledger.snapshot()]);

    ledger.adjust_balance(sarah, Money::major(1)).unwrap();
    assert_eq!(recorder.saves().len(), 2);
    assert_eq!(
        recorder.saves().last().unwrap().contacts[1].balance,
        Money::major(26)
    );
}

#[test]
fn invalid_snapshot_starts_from_seed() {
    let mut broken = Snapshot::seed();
    broken.contacts[1].id = broken.contacts[0].id;
    let mut ledger = Ledger::builder()
        .gateway(MemoryGateway::with_snapshot(broken))
        .open()
        .unwrap();

    assert_eq!(ledger.snapshot(), Snapshot::seed());
    assert!(matches!(
        ledger.take_persistence_error(),
        Some(PersistenceError::Corrupt(_))
    ));
    assert!(ledger.saves_suspended());
}

#[test]
fn snapshot_with_unrepresentable_balance_is_corrupt() {
    let mut broken = Snapshot::seed();
    broken.contacts[2].balance = Money::new(i64::MIN);
    let mut ledger = Ledger::builder()
        .gateway(MemoryGateway::with_snapshot(broken))
        .open()
        .unwrap();

    assert!(matches!(
        ledger.take_persistence_error(),
        Some(PersistenceError::Corrupt(_))
    ));
    assert_eq!(ledger.snapshot(), Snapshot::seed());
    for contact in ledger.contacts() {
        assert!(!contact.status().to_string().is_empty());
    }

    let anthony = id_of(&ledger, "Anthony");
    assert!(matches!(
        ledger.adjust_balance(anthony, Money::new(i64::MIN)),
        Err(LedgerError::Validation(_))
    ));
    assert_eq!(ledger.contact(anthony).unwrap().balance, Money::ZERO);
}

#[test]
fn json_file_gateway_persists_across_opens() {
    let root = std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../../target/test_snapshots");
    let path = root.join(format!("ledger_{}.json", Uuid::new_v4()));

    let mut ledger = Ledger::builder()
        .gateway(JsonFileGateway::new(&path))
        .open()
        .unwrap();
    let clark = id_of(&ledger, "Clark");
    ledger.adjust_balance(clark, Money::new(7_00)).unwrap();
    assert!(ledger.take_persistence_error().is_none());

    let reopened = Ledger::builder()
        .gateway(JsonFileGateway::new(&path))
        .open()
        .unwrap();
    assert_eq!(reopened.contact(clark).unwrap().balance, Money::ZERO);
    assert_eq!(reopened.snapshot(), ledger.snapshot());

    let _ = std::fs::remove_file(&path);
}
