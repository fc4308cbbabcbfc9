//! The account store: in-memory account list mirrored into key-value storage.

use crate::error::{ImportError, StoreError};
use crate::models::{Account, AccountFormData, AccountStats, Label, RecordType, ValidationError};
use crate::storage::KeyValueStorage;
use crate::validation::{process_label, validate_account};
use std::collections::HashMap;

/// Default storage slot for the account list.
pub const DEFAULT_STORAGE_KEY: &str = "accounts";

/// Generate a fresh unique account id.
pub fn generate_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

/// Result of submitting an edit form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// The account was replaced and persisted.
    Updated,
    /// The form failed validation; errors were recorded for the id.
    Invalid(Vec<ValidationError>),
    /// The form was valid but no account has that id.
    NotFound,
}

impl UpdateOutcome {
    pub fn is_updated(&self) -> bool {
        matches!(self, UpdateOutcome::Updated)
    }
}

/// Owns the account list and per-account validation errors.
///
/// A store built with [`AccountStore::new`] persists through its storage
/// backend. A [`detached`](AccountStore::detached) store has no backend and
/// keeps everything in memory.
#[derive(Debug)]
pub struct AccountStore<S> {
    storage: Option<S>,
    storage_key: String,
    accounts: Vec<Account>,
    validation_errors: HashMap<String, Vec<ValidationError>>,
}

impl<S: KeyValueStorage> AccountStore<S> {
    /// Create an empty store backed by `storage`. Call [`init_store`](Self::init_store) to load.
    pub fn new(storage: S) -> Self {
        Self {
            storage: Some(storage),
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            accounts: Vec::new(),
            validation_errors: HashMap::new(),
        }
    }

    /// Create a store without persistence.
    pub fn detached() -> Self {
        Self {
            storage: None,
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            accounts: Vec::new(),
            validation_errors: HashMap::new(),
        }
    }

    /// Use a different storage slot.
    pub fn with_storage_key(mut self, key: impl Into<String>) -> Self {
        self.storage_key = key.into();
        self
    }

    pub fn storage(&self) -> Option<&S> {
        self.storage.as_ref()
    }

    pub fn storage_key(&self) -> &str {
        &self.storage_key
    }

    pub fn is_detached(&self) -> bool {
        self.storage.is_none()
    }

    pub fn accounts(&self) -> &[Account] {
        &self.accounts
    }

    pub fn validation_errors(&self) -> &HashMap<String, Vec<ValidationError>> {
        &self.validation_errors
    }

    /// Errors recorded by the last failed update of `id`.
    pub fn validation_errors_for(&self, id: &str) -> &[ValidationError] {
        self.validation_errors
            .get(id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Load the persisted account list, replacing the in-memory one.
    ///
    /// Read and parse failures are logged and leave the current list as is.
    pub fn init_store(&mut self) {
        let Some(storage) = self.storage.as_ref() else {
            return;
        };

        let saved = match storage.get(&self.storage_key) {
            Ok(Some(saved)) => saved,
            Ok(None) => {
                tracing::info!("No saved accounts under key '{}'", self.storage_key);
                return;
            }
            Err(e) => {
                tracing::error!("Error reading accounts from storage: {}", e);
                return;
            }
        };

        match serde_json::from_str::<Vec<Account>>(&saved) {
            Ok(accounts) => {
                tracing::info!("Loaded {} accounts from storage", accounts.len());
                self.accounts = accounts;
            }
            Err(e) => tracing::error!("Error loading accounts from storage: {}", e),
        }
    }

    /// Write the full account list to storage. No-op for a detached store.
    pub fn save_to_storage(&mut self) -> Result<(), StoreError> {
        let Some(storage) = self.storage.as_mut() else {
            return Ok(());
        };
        write_slot(storage, &self.storage_key, &self.accounts)
    }

    fn persist(&mut self) {
        if let Err(e) = self.save_to_storage() {
            tracing::error!("Error saving accounts to storage: {}", e);
        }
    }

    /// Split a `;`-delimited label string into labels.
    pub fn process_label(&self, raw: &str) -> Vec<Label> {
        process_label(raw)
    }

    /// Check a form without touching the store.
    pub fn validate_account(&self, form: &AccountFormData) -> Vec<ValidationError> {
        validate_account(form)
    }

    /// Append an empty local account and return its id.
    pub fn add_account(&mut self) -> String {
        let id = generate_id();
        self.accounts.push(Account::new(id.clone()));
        self.persist();
        tracing::info!("Added account {}", id);
        id
    }

    /// Validate `form` and, if it passes, replace the matching account with it.
    pub fn update_account(&mut self, form: &AccountFormData) -> UpdateOutcome {
        let errors = validate_account(form);
        if !errors.is_empty() {
            self.validation_errors.insert(form.id.clone(), errors.clone());
            return UpdateOutcome::Invalid(errors);
        }
        self.validation_errors.remove(&form.id);

        let Some(slot) = self.accounts.iter_mut().find(|acc| acc.id == form.id) else {
            tracing::warn!("Account {} not found for update", form.id);
            return UpdateOutcome::NotFound;
        };

        *slot = Account {
            id: form.id.clone(),
            label: process_label(&form.label),
            record_type: form.record_type,
            login: form.login.clone(),
            password: match form.record_type {
                RecordType::Ldap => None,
                RecordType::Local => Some(form.password.clone()),
            },
        };
        self.persist();
        UpdateOutcome::Updated
    }

    /// Remove without persisting. Returns whether an account was removed.
    fn remove_account(&mut self, id: &str) -> bool {
        let Some(index) = self.accounts.iter().position(|acc| acc.id == id) else {
            return false;
        };
        self.accounts.remove(index);
        self.validation_errors.remove(id);
        true
    }

    /// Remove the account with `id`. Unknown ids are ignored.
    pub fn delete_account(&mut self, id: &str) {
        if self.remove_account(id) {
            tracing::info!("Deleted account {}", id);
        }
        self.validation_errors.remove(id);
        self.persist();
    }

    /// Remove every listed account, persisting once.
    pub fn bulk_delete_accounts<I, T>(&mut self, ids: I)
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        let removed = ids
            .into_iter()
            .filter(|id| self.remove_account(id.as_ref()))
            .count();
        tracing::info!("Bulk deleted {} accounts", removed);
        self.persist();
    }

    pub fn get_account_by_id(&self, id: &str) -> Option<&Account> {
        self.accounts.iter().find(|acc| acc.id == id)
    }

    /// Flatten an account into its edit form.
    pub fn account_to_form_data(&self, account: &Account) -> AccountFormData {
        AccountFormData {
            id: account.id.clone(),
            label: account.label_text(),
            record_type: account.record_type,
            login: account.login.clone(),
            password: account.password.clone().unwrap_or_default(),
        }
    }

    pub fn clear_validation_errors(&mut self, id: &str) {
        self.validation_errors.remove(id);
    }

    pub fn get_account_stats(&self) -> AccountStats {
        self.accounts
            .iter()
            .fold(AccountStats::default(), |mut stats, acc| {
                stats.total += 1;
                match acc.record_type {
                    RecordType::Local => stats.local += 1,
                    RecordType::Ldap => stats.ldap += 1,
                }
                stats.total_labels += acc.label.len();
                stats
            })
    }

    /// Pretty-printed JSON of the full account list.
    pub fn export_accounts(&self) -> Result<String, StoreError> {
        Ok(serde_json::to_string_pretty(&self.accounts)?)
    }

    /// Append every account in a JSON array, each under a new id.
    ///
    /// Returns the number of imported accounts. Nothing is added unless the
    /// whole input is accepted and the grown list is written to storage.
    pub fn import_accounts(&mut self, json: &str) -> Result<usize, ImportError> {
        let value: serde_json::Value = serde_json::from_str(json).map_err(|e| {
            tracing::error!("Error importing accounts: {}", e);
            ImportError::Parse(e)
        })?;
        let serde_json::Value::Array(items) = value else {
            return Err(ImportError::NotAnArray);
        };

        let imported = items
            .into_iter()
            .enumerate()
            .map(|(index, item)| {
                serde_json::from_value::<Account>(item)
                    .map_err(|source| ImportError::Record { index, source })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let count = imported.len();
        let mut accounts = self.accounts.clone();
        accounts.extend(imported.into_iter().map(|mut account| {
            account.id = generate_id();
            if account.record_type == RecordType::Ldap {
                account.password = None;
            }
            account
        }));

        // The in-memory list only changes once the slot holds the new list.
        if let Some(storage) = self.storage.as_mut() {
            write_slot(storage, &self.storage_key, &accounts)?;
        }
        self.accounts = accounts;
        tracing::info!("Imported {} accounts", count);
        Ok(count)
    }
}

fn write_slot<S: KeyValueStorage>(
    storage: &mut S,
    key: &str,
    accounts: &[Account],
) -> Result<(), StoreError> {
    let json = serde_json::to_string(accounts)?;
    storage.set(key, &json)?;
    Ok(())
}
