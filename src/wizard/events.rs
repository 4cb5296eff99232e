//! Notification callback trait and analytics events
//!
//! The wizard reports saves, phases and user-facing messages through a
//! [`Notifier`] so the CLI, a server or a test can each present them.

use crate::wizard::Section;
use crate::wizard::messages::Message;
use async_trait::async_trait;
use std::fmt;
use tracing::info;

/// Long-running step of a commit or submission
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Creating a new container
    CreatingContainer,
    /// Uploading the primary file
    UploadingFile,
    /// Copying the primary file into a new component
    CopyingFile,
    /// Creating the draft record
    StartingDraft,
    /// Saving a section's records
    SavingSection(Section),
    /// Saving the draft during final submission
    SavingDraft,
    /// Saving the container during final submission
    SavingContainer,
    /// Creating the review-submit action
    SubmittingForReview,
    /// Pushing restored values after a failed save
    RollingBack,
    /// Submission complete
    Complete,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CreatingContainer => write!(f, "Creating project"),
            Self::UploadingFile => write!(f, "Uploading file"),
            Self::CopyingFile => write!(f, "Copying file"),
            Self::StartingDraft => write!(f, "Starting draft"),
            Self::SavingSection(section) => write!(f, "Saving {section}"),
            Self::SavingDraft => write!(f, "Saving draft"),
            Self::SavingContainer => write!(f, "Saving project"),
            Self::SubmittingForReview => write!(f, "Submitting for review"),
            Self::RollingBack => write!(f, "Reverting changes"),
            Self::Complete => write!(f, "Done"),
        }
    }
}

/// Notification callback trait
///
/// - CLI implementations print to the terminal
/// - Tests record calls
#[async_trait]
pub trait Notifier: Send + Sync {
    /// A section committed successfully
    async fn on_section_saved(&self, section: Section);

    /// Entering a new phase
    async fn on_phase(&self, phase: Phase);

    /// Informational message
    async fn info(&self, message: &Message);

    /// Success message
    async fn success(&self, message: &Message);

    /// Error message (the wizard stays usable)
    async fn error(&self, message: &Message);
}

/// Notifier that discards everything
pub struct NoopNotifier;

#[async_trait]
impl Notifier for NoopNotifier {
    async fn on_section_saved(&self, _section: Section) {}
    async fn on_phase(&self, _phase: Phase) {}
    async fn info(&self, _message: &Message) {}
    async fn success(&self, _message: &Message) {}
    async fn error(&self, _message: &Message) {}
}

/// Emit an analytics event on the `analytics` tracing target
pub fn track(category: &str, action: &str, label: &str) {
    info!(target: "analytics", category, action, label, "track");
}

/// Label prefix used by analytics events
pub const fn mode_label(edit_mode: bool) -> &'static str {
    if edit_mode { "Edit" } else { "Submit" }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_label() {
        assert_eq!(mode_label(false), "Submit");
        assert_eq!(mode_label(true), "Edit");
    }

    #[test]
    fn test_noop_notifier_accepts_everything() {
        let notifier: &dyn Notifier = &NoopNotifier;
        tokio_test::block_on(async {
            notifier.on_section_saved(Section::Basics).await;
            notifier.on_phase(Phase::Complete).await;
            notifier.error(&Message::new("submit.basics_error")).await;
        });
    }
}
