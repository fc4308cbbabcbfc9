use acctkeep_core::{
    AccountFormData, AccountStore, FileStorage, KeyValueStorage, RecordType, UpdateOutcome,
};
use tempfile::tempdir;

fn open(dir: &std::path::Path) -> AccountStore<FileStorage> {
    let mut store = AccountStore::new(FileStorage::new(dir));
    store.init_store();
    store
}

#[test]
fn accounts_survive_reopening_the_store() {
    let dir = tempdir().unwrap();

    let id = {
        let mut store = open(dir.path());
        let id = store.add_account();
        let outcome = store.update_account(&AccountFormData {
            id: id.clone(),
            label: "work; vpn".into(),
            record_type: RecordType::Ldap,
            login: "jdoe".into(),
            password: "ignored".into(),
        });
        assert_eq!(outcome, UpdateOutcome::Updated);
        store.add_account();
        id
    };

    let store = open(dir.path());
    assert_eq!(store.accounts().len(), 2);
    let account = store.get_account_by_id(&id).unwrap();
    assert_eq!(account.login, "jdoe");
    assert_eq!(account.password, None);
    assert_eq!(account.label.len(), 2);
}

#[test]
fn corrupt_slot_leaves_store_empty_and_is_overwritten_on_save() {
    let dir = tempdir().unwrap();
    std::fs::write(dir.path().join("accounts.json"), "not json").unwrap();

    let mut store = open(dir.path());
    assert!(store.accounts().is_empty());

    store.add_account();
    let raw = FileStorage::new(dir.path()).get("accounts").unwrap().unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(parsed.as_array().map(Vec::len), Some(1));
}

#[test]
fn export_then_import_into_second_store_gets_new_ids() {
    let first_dir = tempdir().unwrap();
    let second_dir = tempdir().unwrap();

    let mut source = open(first_dir.path());
    let id = source.add_account();
    source.update_account(&AccountFormData {
        id: id.clone(),
        label: "home".into(),
        record_type: RecordType::Local,
        login: "me".into(),
        password: "hunter2".into(),
    });
    let exported = source.export_accounts().unwrap();

    let mut target = open(second_dir.path());
    assert_eq!(target.import_accounts(&exported).unwrap(), 1);

    let reopened = open(second_dir.path());
    let imported = &reopened.accounts()[0];
    assert_ne!(imported.id, id);
    assert_eq!(imported.login, "me");
    assert_eq!(imported.password.as_deref(), Some("hunter2"));
}
