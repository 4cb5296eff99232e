//! Localizable user-facing messages
//!
//! The wizard never formats text itself; it emits a [`Message`] (a key plus
//! substitutions) and a [`Translator`] turns it into a string.

use std::fmt;

/// Message keys
#[allow(missing_docs)]
pub mod keys {
    pub const BASICS_ERROR: &str = "submit.basics_error";
    pub const DISCIPLINES_ERROR: &str = "submit.disciplines_error";
    pub const COULD_NOT_UPDATE_TITLE: &str = "submit.could_not_update_title";
    pub const COULD_NOT_CREATE_COMPONENT: &str = "submit.could_not_create_component";
    pub const COULD_NOT_CREATE_PROJECT: &str = "submit.could_not_create_project";
    pub const ERROR_COPYING_FILE: &str = "submit.error_copying_file";
    pub const ERROR_UPLOADING_FILE: &str = "submit.error_uploading_file";
    pub const ABANDONED_PREPRINT_ERROR: &str = "submit.abandoned_preprint_error";
    pub const ERROR_INITIATING_PREPRINT: &str = "submit.error_initiating_preprint";
    pub const PREPRINT_FILE_UPLOADED: &str = "submit.preprint_file_uploaded";
    pub const SEARCH_CONTRIBUTORS_ERROR: &str = "submit.search_contributors_error";
    pub const ERROR_LOADING_CONTRIBUTORS: &str = "submit.error_loading_contributors";
    pub const ERROR_ADDING_CONTRIBUTOR: &str = "submit.error_adding_contributor";
    pub const ERROR_REMOVING_CONTRIBUTOR: &str = "submit.error_removing_contributor";
    pub const ERROR_SAVING_PREPRINT: &str = "submit.error_saving_preprint";
    pub const ERROR_COMPLETING_PREPRINT: &str = "submit.error_completing_preprint";
    pub const ROLLBACK_FAILED: &str = "submit.rollback_failed";
    pub const SUCCESSFULLY_SUBMITTED: &str = "submit.successfully_submitted";

    pub const CREATE_HEADING: &str = "submit.create_heading";
    pub const SUBMIT_HEADING: &str = "submit.submit_heading";
    pub const CREATE_BUTTON: &str = "submit.body.submit.create_button";
    pub const SUBMIT_BUTTON: &str = "submit.body.submit.submit_button";
    pub const MODAL_TITLE_CREATE: &str = "components.confirm-share-preprint.title.create";
    pub const MODAL_TITLE_SUBMIT: &str = "components.confirm-share-preprint.title.submit";
    pub const MODAL_TITLE_RESUBMIT: &str = "components.confirm-share-preprint.title.resubmit";
    pub const INFO_DEFAULT: &str = "submit.body.submit.information.line1.default";
    pub const INFO_MODERATION: &str = "submit.body.submit.information.line1.moderation";
    pub const INFO_PERMISSION_CREATE: &str = "submit.body.submit.information.line2.create";
    pub const INFO_PERMISSION_SUBMIT: &str = "submit.body.submit.information.line2.submit";
    pub const INFO_PRE: &str = "submit.body.submit.information.line3.pre";
    pub const INFO_POST: &str = "submit.body.submit.information.line3.post";
    pub const EDIT_LINE1_PRE: &str = "submit.body.edit.information.line1.pre";
    pub const EDIT_LINE1_POST: &str = "submit.body.edit.information.line1.post_rejected";
    pub const EDIT_LINE2_PRE_PENDING: &str = "submit.body.edit.information.line2.pre_pending";
    pub const EDIT_LINE2_PRE_REJECTED: &str = "submit.body.edit.information.line2.pre_rejected";
    pub const EDIT_LINE2_POST_REJECTED: &str = "submit.body.edit.information.line2.post_rejected";
    pub const PRE_MODERATION: &str = "global.pre_moderation";
    pub const POST_MODERATION: &str = "global.post_moderation";
    pub const BRAND_NAME: &str = "global.brand_name";
    pub const PROVIDER_NAME: &str = "global.provider_name";

    pub const WITHDRAW_PRE_NOTICE: &str = "withdraw.pre_moderation_notice";
    pub const WITHDRAW_POST_NOTICE: &str = "withdraw.post_moderation_notice";
    pub const WITHDRAW_NO_MODERATION_NOTICE: &str = "withdraw.no_moderation_notice";
    pub const WITHDRAW_BUTTON_PUBLISHED: &str = "withdraw.withdraw_button_published";
    pub const WITHDRAW_BUTTON_NOT_PUBLISHED: &str = "withdraw.withdraw_button_not_published";
    pub const WITHDRAW_SUCCESS: &str = "withdraw.successfully_withdrawn";
    pub const WITHDRAW_ERROR: &str = "withdraw.error";
}

/// A message key with named substitutions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    /// Catalog key
    pub key: &'static str,
    /// `{name}` substitutions
    pub args: Vec<(&'static str, String)>,
}

impl Message {
    /// Message without substitutions
    pub const fn new(key: &'static str) -> Self {
        Self {
            key,
            args: Vec::new(),
        }
    }

    /// Add a substitution
    #[must_use]
    pub fn with(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.args.push((name, value.into()));
        self
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", EnglishCatalog.t(self))
    }
}

/// Turns messages into display strings
pub trait Translator: Send + Sync {
    /// Render a message
    fn t(&self, message: &Message) -> String;
}

/// Built-in English strings
#[derive(Debug, Clone, Copy, Default)]
pub struct EnglishCatalog;

impl EnglishCatalog {
    fn template(key: &str) -> Option<&'static str> {
        use keys::*;
        let text = match key {
            BASICS_ERROR => "Could not save information in Basics section. Please try again.",
            DISCIPLINES_ERROR => "Could not save information in Discipline section. Please try again.",
            COULD_NOT_UPDATE_TITLE => "Could not update title. Please try again.",
            COULD_NOT_CREATE_COMPONENT => "Could not create component. Please try again.",
            COULD_NOT_CREATE_PROJECT => "Could not create project. Please try again.",
            ERROR_COPYING_FILE => "Error copying file; please try again.",
            ERROR_UPLOADING_FILE => "Error uploading file; please try again.",
            ABANDONED_PREPRINT_ERROR => "Error with abandoned {documentType}.",
            ERROR_INITIATING_PREPRINT => "Could not initiate {documentType}. Please try again.",
            PREPRINT_FILE_UPLOADED => "{documentType} file uploaded!",
            SEARCH_CONTRIBUTORS_ERROR => "Could not perform search query.",
            ERROR_LOADING_CONTRIBUTORS => "Could not load contributors.",
            ERROR_ADDING_CONTRIBUTOR => "Could not add contributor.",
            ERROR_REMOVING_CONTRIBUTOR => "Could not remove contributor.",
            ERROR_SAVING_PREPRINT => "Error saving {documentType}. Please try again.",
            ERROR_COMPLETING_PREPRINT => "Error completing {documentType}. Please try again.",
            ROLLBACK_FAILED => "Your changes were not saved and could not be reverted. Reload before continuing.",
            SUCCESSFULLY_SUBMITTED => "Your {documentType} has been submitted to {provider}.",
            CREATE_HEADING => "Create {documentType}",
            SUBMIT_HEADING => "Submit {documentType}",
            CREATE_BUTTON => "Create",
            SUBMIT_BUTTON => "Submit",
            MODAL_TITLE_CREATE => "Create {documentType}",
            MODAL_TITLE_SUBMIT => "Submit {documentType}",
            MODAL_TITLE_RESUBMIT => "Resubmit {documentType}",
            INFO_DEFAULT => "When you create this {documentType} it will be publicly available on {provider}.",
            INFO_MODERATION => "{provider} uses {workflow}.",
            INFO_PERMISSION_CREATE => "Your project will become public and admins on it can edit the {documentType}.",
            INFO_PERMISSION_SUBMIT => "Your project will become public when the {documentType} is accepted.",
            INFO_PRE => "Your {documentType} will be reviewed by a moderator before it is made public.",
            INFO_POST => "Your {documentType} is public immediately and will be reviewed by a moderator afterwards.",
            EDIT_LINE1_PRE => "This service uses pre-moderation.",
            EDIT_LINE1_POST => "This service uses post-moderation.",
            EDIT_LINE2_PRE_PENDING => "Your {documentType} is still pending review; edits are visible to moderators.",
            EDIT_LINE2_PRE_REJECTED => "Your {documentType} was rejected; edit and resubmit it for review.",
            EDIT_LINE2_POST_REJECTED => "Your {documentType} was rejected and is no longer public.",
            PRE_MODERATION => "pre-moderation",
            POST_MODERATION => "post-moderation",
            BRAND_NAME => "OSF Preprints",
            PROVIDER_NAME => "{name}",
            WITHDRAW_PRE_NOTICE => "Your {documentType} will be withdrawn once a moderator approves the request.",
            WITHDRAW_POST_NOTICE => "Your {documentType} will remain public until a moderator approves the withdrawal.",
            WITHDRAW_NO_MODERATION_NOTICE => "An administrator will review the request to withdraw your {documentType}.",
            WITHDRAW_BUTTON_PUBLISHED => "Request withdrawal",
            WITHDRAW_BUTTON_NOT_PUBLISHED => "Withdraw",
            WITHDRAW_SUCCESS => "Your {documentType} has been withdrawn.",
            WITHDRAW_ERROR => "Withdrawal request failed: {detail}",
            _ => return None,
        };
        Some(text)
    }
}

impl Translator for EnglishCatalog {
    fn t(&self, message: &Message) -> String {
        let Some(template) = Self::template(message.key) else {
            return message.key.to_string();
        };
        message
            .args
            .iter()
            .fold(template.to_string(), |text, (name, value)| {
                text.replace(&format!("{{{name}}}"), value)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_substitution() {
        let message = Message::new(keys::ERROR_SAVING_PREPRINT).with("documentType", "preprint");
        assert_eq!(
            EnglishCatalog.t(&message),
            "Error saving preprint. Please try again."
        );
    }

    #[test]
    fn test_unknown_key_falls_back_to_key() {
        assert_eq!(EnglishCatalog.t(&Message::new("no.such.key")), "no.such.key");
    }

    #[test]
    fn test_display_uses_english_catalog() {
        let message = Message::new(keys::SUCCESSFULLY_SUBMITTED)
            .with("documentType", "paper")
            .with("provider", "engrXiv");
        insta::assert_snapshot!(message.to_string(), @"Your paper has been submitted to engrXiv.");
    }
}
