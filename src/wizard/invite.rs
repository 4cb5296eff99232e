//! Form for inviting an unregistered contributor by name and email

use super::events::{mode_label, track};
use super::validate::{FieldError, validate_email, validate_full_name};

/// Name and email of a person to invite
///
/// The callback passed to [`InviteForm::submit`] only runs when both fields
/// pass validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InviteForm {
    /// Full name, at least three characters
    pub full_name: String,
    /// Email address
    pub username: String,
    /// Whether the wizard is editing an existing draft
    pub edit_mode: bool,
}

impl InviteForm {
    /// Empty form
    pub fn new(edit_mode: bool) -> Self {
        Self {
            edit_mode,
            ..Self::default()
        }
    }

    /// Every failing field check
    pub fn errors(&self) -> Vec<FieldError> {
        [
            validate_full_name(&self.full_name),
            validate_email(&self.username),
        ]
        .into_iter()
        .filter_map(Result::err)
        .collect()
    }

    /// Whether both fields are valid
    pub fn is_valid(&self) -> bool {
        self.errors().is_empty()
    }

    /// Hand the trimmed name and email to `add` if the form is valid
    ///
    /// Returns whether `add` was called.
    pub fn submit<F>(&self, add: F) -> bool
    where
        F: FnOnce(&str, &str),
    {
        track(
            "button",
            "click",
            &format!("{} - Add Author By Email", mode_label(self.edit_mode)),
        );
        if !self.is_valid() {
            return false;
        }
        add(self.full_name.trim(), self.username.trim());
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(name: &str, email: &str) -> InviteForm {
        InviteForm {
            full_name: name.to_string(),
            username: email.to_string(),
            edit_mode: false,
        }
    }

    #[test]
    fn test_callback_fires_when_valid() {
        let mut added = None;
        let fired = form(" Ada Lovelace ", "ada@example.org").submit(|name, email| {
            added = Some((name.to_string(), email.to_string()));
        });
        assert!(fired);
        assert_eq!(
            added,
            Some(("Ada Lovelace".to_string(), "ada@example.org".to_string()))
        );
    }

    #[test]
    fn test_callback_skipped_when_invalid() {
        let mut calls = 0;
        assert!(!form("Al", "al@example.org").submit(|_, _| calls += 1));
        assert!(!form("Ada Lovelace", "not-an-email").submit(|_, _| calls += 1));
        assert!(!InviteForm::new(true).submit(|_, _| calls += 1));
        assert_eq!(calls, 0);
    }

    #[test]
    fn test_errors_report_both_fields() {
        let errors = InviteForm::new(false).errors();
        let fields: Vec<_> = errors.iter().map(|e| e.field).collect();
        assert_eq!(fields, vec!["Full Name", "Email"]);
    }
}
