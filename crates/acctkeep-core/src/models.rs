//! Shared data types for the application.

use serde::{Deserialize, Serialize};

/// A free-form tag attached to an account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label {
    pub text: String,
}

impl Label {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// Where the account's credentials live.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RecordType {
    /// Credentials are stored locally; a password is required.
    #[default]
    Local,
    /// Credentials come from a directory; no password is stored.
    #[serde(rename = "LDAP")]
    Ldap,
}

impl RecordType {
    /// Display name, identical to the serialized form.
    pub fn as_str(self) -> &'static str {
        match self {
            RecordType::Local => "Local",
            RecordType::Ldap => "LDAP",
        }
    }

    /// The other record type.
    pub fn toggled(self) -> Self {
        match self {
            RecordType::Local => RecordType::Ldap,
            RecordType::Ldap => RecordType::Local,
        }
    }
}

impl std::fmt::Display for RecordType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

/// Represents a persisted account record.
///
/// Missing fields fall back to their defaults when reading stored or
/// imported JSON.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Account {
    pub id: String,
    pub label: Vec<Label>,
    pub record_type: RecordType,
    pub login: String,
    /// Always `None` for LDAP accounts.
    pub password: Option<String>,
}

impl Account {
    /// Create an empty local account with the given id.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: Vec::new(),
            record_type: RecordType::Local,
            login: String::new(),
            password: Some(String::new()),
        }
    }

    /// Label texts joined for display.
    pub fn label_text(&self) -> String {
        self.label
            .iter()
            .map(|l| l.text.as_str())
            .collect::<Vec<_>>()
            .join(LABEL_JOINER)
    }
}

/// Separator used when flattening labels into a single form field.
pub const LABEL_JOINER: &str = "; ";

/// Flat, string-only shape of an account used while editing.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountFormData {
    pub id: String,
    /// Labels joined by `"; "`.
    pub label: String,
    pub record_type: RecordType,
    pub login: String,
    /// May be empty, never absent.
    pub password: String,
}

/// Field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Aggregate counts over the account list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountStats {
    pub total: usize,
    pub local: usize,
    pub ldap: usize,
    pub total_labels: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn account_serializes_with_camel_case_and_ldap_tag() {
        let account = Account {
            id: "a1".into(),
            label: vec![Label::new("work")],
            record_type: RecordType::Ldap,
            login: "jdoe".into(),
            password: None,
        };

        let json = serde_json::to_value(&account).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "id": "a1",
                "label": [{"text": "work"}],
                "recordType": "LDAP",
                "login": "jdoe",
                "password": null
            })
        );
    }

    #[test]
    fn account_missing_fields_take_defaults() {
        let account: Account = serde_json::from_str(r#"{"login":"x"}"#).unwrap();
        assert_eq!(account.login, "x");
        assert_eq!(account.record_type, RecordType::Local);
        assert!(account.label.is_empty());
        assert_eq!(account.password, None);
        assert_eq!(account.id, "");
    }

    #[test]
    fn unknown_record_type_is_rejected() {
        let result: Result<Account, _> = serde_json::from_str(r#"{"recordType":"Kerberos"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn label_text_joins_with_semicolon() {
        let mut account = Account::new("id");
        account.label = vec![Label::new("a"), Label::new("b")];
        assert_eq!(account.label_text(), "a; b");
    }
}
