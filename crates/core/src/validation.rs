//! Guest details form validation.
//!
//! Every check runs independently and violations accumulate per field, so a
//! redisplayed form can annotate all offending fields at once.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use validator::ValidateEmail;

/// Minimum length of the guest's first name.
pub const FIRST_NAME_MIN_LENGTH: usize = 4;

pub const MSG_REQUIRED: &str = "This field cannot be blank";
pub const MSG_INVALID_EMAIL: &str = "Invalid email address";

/// Guest fields submitted with the reservation form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuestDetails {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
}

impl GuestDetails {
    /// Run all checks and collect every violation.
    pub fn validate(&self) -> FormErrors {
        let mut errors = FormErrors::default();

        for (field, value) in [
            ("first_name", &self.first_name),
            ("last_name", &self.last_name),
            ("email", &self.email),
            ("phone", &self.phone),
        ] {
            if value.trim().is_empty() {
                errors.add(field, MSG_REQUIRED);
            }
        }

        if self.first_name.trim().chars().count() < FIRST_NAME_MIN_LENGTH {
            errors.add(
                "first_name",
                format!("This field must be at least {FIRST_NAME_MIN_LENGTH} characters long"),
            );
        }

        let email = self.email.trim();
        if !email.is_empty() && !email.validate_email() {
            errors.add("email", MSG_INVALID_EMAIL);
        }

        errors
    }
}

/// Field name to the list of messages recorded against it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FormErrors(BTreeMap<String, Vec<String>>);

impl FormErrors {
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    /// First message for a field, for inline annotation.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0
            .get(field)
            .and_then(|msgs| msgs.first())
            .map(String::as_str)
    }

    pub fn messages(&self, field: &str) -> &[String] {
        self.0.get(field).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn is_valid(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> GuestDetails {
        GuestDetails {
            first_name: "Alice".into(),
            last_name: "Lee".into(),
            email: "alice@example.com".into(),
            phone: "555-1234".into(),
        }
    }

    #[test]
    fn complete_form_is_valid() {
        assert!(valid().validate().is_valid());
    }

    #[test]
    fn short_first_name_fails() {
        let form = GuestDetails {
            first_name: "Bob".into(),
            ..valid()
        };
        let errors = form.validate();
        assert!(!errors.is_valid());
        assert_eq!(
            errors.get("first_name"),
            Some("This field must be at least 4 characters long")
        );

        let form = GuestDetails {
            first_name: "Bobby".into(),
            ..valid()
        };
        assert!(form.validate().is_valid());
    }

    #[test]
    fn email_shape_is_checked() {
        let form = GuestDetails {
            email: "not-an-email".into(),
            ..valid()
        };
        assert_eq!(form.validate().get("email"), Some(MSG_INVALID_EMAIL));

        let form = GuestDetails {
            email: "a@b.com".into(),
            ..valid()
        };
        assert!(form.validate().is_valid());
    }

    #[test]
    fn missing_phone_reported_alongside_other_violations() {
        let form = GuestDetails {
            first_name: "Bob".into(),
            email: "nope".into(),
            phone: String::new(),
            ..valid()
        };
        let errors = form.validate();
        assert_eq!(errors.get("phone"), Some(MSG_REQUIRED));
        assert!(errors.get("first_name").is_some());
        assert_eq!(errors.get("email"), Some(MSG_INVALID_EMAIL));
        assert!(errors.get("last_name").is_none());
        assert_eq!(errors.fields().count(), 3);
    }

    #[test]
    fn missing_phone_only() {
        let form = GuestDetails {
            phone: "   ".into(),
            ..valid()
        };
        let errors = form.validate();
        assert_eq!(errors.fields().collect::<Vec<_>>(), vec!["phone"]);
    }

    #[test]
    fn blank_first_name_collects_both_messages() {
        let form = GuestDetails {
            first_name: String::new(),
            ..valid()
        };
        let errors = form.validate();
        assert_eq!(errors.messages("first_name").len(), 2);
        assert_eq!(errors.get("first_name"), Some(MSG_REQUIRED));
    }

    #[test]
    fn blank_email_only_reports_required() {
        let form = GuestDetails {
            email: String::new(),
            ..valid()
        };
        assert_eq!(form.validate().messages("email"), [MSG_REQUIRED.to_string()]);
    }

    #[test]
    fn errors_serialize_as_field_map() {
        let form = GuestDetails {
            phone: String::new(),
            ..valid()
        };
        let json = serde_json::to_value(form.validate()).unwrap();
        assert_eq!(json, serde_json::json!({ "phone": [MSG_REQUIRED] }));
    }
}
