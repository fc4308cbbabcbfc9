//! Form validation and label parsing.

use crate::models::{AccountFormData, Label, RecordType, ValidationError};

/// Maximum length of the joined label field.
pub const MAX_LABEL_LEN: usize = 50;
/// Maximum length of the login field.
pub const MAX_LOGIN_LEN: usize = 100;
/// Maximum length of the password field.
pub const MAX_PASSWORD_LEN: usize = 100;

pub const FIELD_LABEL: &str = "label";
pub const FIELD_LOGIN: &str = "login";
pub const FIELD_PASSWORD: &str = "password";

/// Split a `;`-delimited label string into labels.
///
/// Pieces are trimmed and empty pieces dropped, so `"a; b ;; c"` yields
/// `a`, `b`, `c` and a blank string yields nothing.
pub fn process_label(raw: &str) -> Vec<Label> {
    raw.split(';')
        .map(str::trim)
        .filter(|piece| !piece.is_empty())
        .map(Label::new)
        .collect()
}

/// Check a submitted form. Returns every failing rule, empty when valid.
pub fn validate_account(form: &AccountFormData) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if char_len(&form.label) > MAX_LABEL_LEN {
        errors.push(ValidationError::new(
            FIELD_LABEL,
            format!("Label must not exceed {MAX_LABEL_LEN} characters"),
        ));
    }

    if form.login.trim().is_empty() {
        errors.push(ValidationError::new(FIELD_LOGIN, "Login is required"));
    } else if char_len(&form.login) > MAX_LOGIN_LEN {
        errors.push(ValidationError::new(
            FIELD_LOGIN,
            format!("Login must not exceed {MAX_LOGIN_LEN} characters"),
        ));
    }

    // LDAP accounts never carry a password, so there is nothing to check.
    if form.record_type == RecordType::Local {
        if form.password.trim().is_empty() {
            errors.push(ValidationError::new(
                FIELD_PASSWORD,
                "Password is required for local accounts",
            ));
        } else if char_len(&form.password) > MAX_PASSWORD_LEN {
            errors.push(ValidationError::new(
                FIELD_PASSWORD,
                format!("Password must not exceed {MAX_PASSWORD_LEN} characters"),
            ));
        }
    }

    errors
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(label: &str, record_type: RecordType, login: &str, password: &str) -> AccountFormData {
        AccountFormData {
            id: "id".into(),
            label: label.into(),
            record_type,
            login: login.into(),
            password: password.into(),
        }
    }

    fn fields(errors: &[ValidationError]) -> Vec<&str> {
        errors.iter().map(|e| e.field.as_str()).collect()
    }

    #[test]
    fn process_label_splits_and_trims() {
        assert_eq!(
            process_label("a; b ;; c"),
            vec![Label::new("a"), Label::new("b"), Label::new("c")]
        );
    }

    #[test]
    fn process_label_blank_input_is_empty() {
        assert!(process_label("").is_empty());
        assert!(process_label("   ").is_empty());
        assert!(process_label(" ; ;").is_empty());
    }

    #[test]
    fn valid_local_form_passes() {
        assert!(validate_account(&form("work", RecordType::Local, "jdoe", "secret")).is_empty());
    }

    #[test]
    fn ldap_form_ignores_password() {
        assert!(validate_account(&form("", RecordType::Ldap, "jdoe", "")).is_empty());
        let long = "x".repeat(500);
        assert!(validate_account(&form("", RecordType::Ldap, "jdoe", &long)).is_empty());
    }

    #[test]
    fn every_failing_rule_is_reported() {
        let long_label = "l".repeat(MAX_LABEL_LEN + 1);
        let errors = validate_account(&form(&long_label, RecordType::Local, "  ", " "));
        assert_eq!(fields(&errors), vec![FIELD_LABEL, FIELD_LOGIN, FIELD_PASSWORD]);
    }

    #[test]
    fn login_errors_are_mutually_exclusive() {
        let errors = validate_account(&form("", RecordType::Ldap, "", ""));
        assert_eq!(fields(&errors), vec![FIELD_LOGIN]);
        assert_eq!(errors[0].message, "Login is required");

        let long_login = "u".repeat(MAX_LOGIN_LEN + 1);
        let errors = validate_account(&form("", RecordType::Ldap, &long_login, ""));
        assert_eq!(fields(&errors), vec![FIELD_LOGIN]);
        assert!(errors[0].message.contains("100"));
    }

    #[test]
    fn boundary_lengths_are_accepted() {
        let label = "l".repeat(MAX_LABEL_LEN);
        let login = "u".repeat(MAX_LOGIN_LEN);
        let password = "p".repeat(MAX_PASSWORD_LEN);
        assert!(validate_account(&form(&label, RecordType::Local, &login, &password)).is_empty());
    }

    #[test]
    fn overlong_local_password_is_rejected() {
        let password = "p".repeat(MAX_PASSWORD_LEN + 1);
        let errors = validate_account(&form("", RecordType::Local, "jdoe", &password));
        assert_eq!(fields(&errors), vec![FIELD_PASSWORD]);
    }

    #[test]
    fn lengths_count_characters_not_bytes() {
        let label = "é".repeat(MAX_LABEL_LEN);
        assert!(validate_account(&form(&label, RecordType::Ldap, "jdoe", "")).is_empty());
    }
}
