//! Core models, validation and the account store for acctkeep.
//!
//! This crate holds everything that does not depend on a frontend: the
//! persisted account shape, the edit-form shape, validation rules, storage
//! backends, and the store that ties them together.

pub mod error;
pub mod models;
pub mod storage;
pub mod store;
pub mod validation;

pub use error::{ImportError, StorageError, StoreError};
pub use models::{Account, AccountFormData, AccountStats, Label, RecordType, ValidationError};
pub use storage::{FileStorage, KeyValueStorage, MemoryStorage};
pub use store::{generate_id, AccountStore, UpdateOutcome, DEFAULT_STORAGE_KEY};
pub use validation::{process_label, validate_account};
