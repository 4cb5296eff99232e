//! Final submission, resubmission and routing

use super::Wizard;
use super::events::{Phase, track};
use super::messages::{Message, keys};
use super::state::Mode;
use crate::error::{Error, Result};
use crate::types::{ActionTrigger, Branding, Provider, ReviewAction};
use serde::Serialize;
use tracing::{debug, warn};

/// Where the user goes after a submission or withdrawal
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Destination {
    /// The provider's own site
    External {
        /// Absolute URL
        url: String,
    },
    /// Landing page
    Index {
        /// Use the provider-scoped route
        provider_route: bool,
    },
    /// The draft's detail page
    Content {
        /// Use the provider-scoped route
        provider_route: bool,
        /// Draft to show
        draft_id: String,
    },
}

/// Provider-scoped routes are used inside branded sub-route deployments and
/// for every non-default provider outside a branded deployment
pub fn use_provider_route(branding: Branding, provider: &Provider) -> bool {
    if branding.is_provider {
        branding.is_sub_route
    } else {
        !provider.is_default()
    }
}

/// External redirect target, when the provider has its own domain
pub fn external_redirect(branding: Branding, provider: &Provider, draft_id: &str) -> Option<String> {
    if branding.is_provider || !provider.domain_redirect_enabled {
        return None;
    }
    provider
        .domain
        .as_deref()
        .filter(|d| !d.is_empty())
        .map(|domain| format!("{domain}{draft_id}"))
}

impl Wizard<'_> {
    /// Press the final submit button
    ///
    /// Returns `true` when the confirmation dialog should open. Otherwise
    /// validation errors become visible.
    pub fn click_submit(&mut self) -> bool {
        if self.all_sections_valid() {
            track("button", "click", "Submit - Open Share Preprint Modal");
            true
        } else {
            track("button", "click", "Submit - Display validation errors");
            self.state.attempted_submit = true;
            false
        }
    }

    fn submit_error(&self) -> Message {
        let key = match self.state.mode {
            Mode::Create => keys::ERROR_SAVING_PREPRINT,
            Mode::Edit => keys::ERROR_COMPLETING_PREPRINT,
        };
        self.document_message(key)
    }

    /// Publish (unmoderated) or submit for review (moderated)
    ///
    /// Saves the draft, then the container, then (moderated only) the
    /// review-submit action. Any failure re-enables the submit button and
    /// leaves the local records untouched.
    pub async fn save_preprint(&mut self) -> Result<Destination> {
        if self.state.submit_disabled {
            return Err(Error::SubmitInProgress);
        }
        if !self.all_sections_valid() {
            self.state.attempted_submit = true;
            return Err(Error::InvalidTransition(
                "every section must be saved before submitting".to_string(),
            ));
        }

        self.state.begin("save_preprint")?;
        self.state.submit_disabled = true;
        let result = self.save_preprint_inner().await;
        self.state.finish();

        if result.is_err() {
            self.state.submit_disabled = false;
            self.notifier.error(&self.submit_error()).await;
        }
        result
    }

    async fn save_preprint_inner(&mut self) -> Result<Destination> {
        track(
            "button",
            "click",
            if self.is_edit() {
                "Edit - Complete Preprint Edits"
            } else {
                "Submit - Share Preprint"
            },
        );

        let draft_id = self.require_started()?.to_string();
        let mut container = self
            .container
            .clone()
            .ok_or_else(|| Error::InvalidTransition("no project bound".to_string()))?;
        let mut draft = self.draft.clone();
        let moderated = self.moderation().is_moderated();

        draft.provider_id = Some(self.current_provider.id.clone());
        if !moderated {
            draft.is_published = true;
        }
        container.public = true;

        self.notifier.on_phase(Phase::SavingDraft).await;
        let saved_draft = self.store.save_draft(&draft).await?;
        self.notifier.on_phase(Phase::SavingContainer).await;
        let saved_container = self.store.save_container(&container).await?;

        if moderated {
            self.notifier.on_phase(Phase::SubmittingForReview).await;
            let action = ReviewAction {
                id: None,
                trigger: ActionTrigger::Submit,
                target_id: draft_id.clone(),
            };
            self.store.save_review_action(&action).await?;
        }

        self.state.preprint_saved = true;
        self.container = Some(saved_container);
        self.draft = match self.store.reload_draft(&draft_id).await {
            Ok(reloaded) => reloaded,
            Err(e) => {
                warn!("reloading draft {draft_id} failed: {e}");
                saved_draft
            }
        };
        self.notifier.on_phase(Phase::Complete).await;
        debug!(draft = %draft_id, moderated, "submission complete");

        Ok(self.destination_after_submit(&draft_id, moderated).await)
    }

    async fn destination_after_submit(&self, draft_id: &str, moderated: bool) -> Destination {
        let provider = &self.current_provider;
        if let Some(url) = external_redirect(self.branding, provider, draft_id) {
            return Destination::External { url };
        }

        let provider_route = use_provider_route(self.branding, provider);
        if self.state.mode == Mode::Create && !moderated {
            let message = self
                .document_message(keys::SUCCESSFULLY_SUBMITTED)
                .with("provider", super::language::provider_name(provider).to_string());
            self.notifier.success(&message).await;
            return Destination::Index { provider_route };
        }

        Destination::Content {
            provider_route,
            draft_id: draft_id.to_string(),
        }
    }

    /// Send a pending or rejected pre-moderation draft back for review
    ///
    /// Only the review-submit action is saved.
    pub async fn resubmit(&mut self) -> Result<Destination> {
        if !self.can_resubmit() {
            return Err(Error::InvalidTransition(
                "only pending or rejected pre-moderation drafts can be resubmitted".to_string(),
            ));
        }
        if self.state.submit_disabled {
            return Err(Error::SubmitInProgress);
        }
        let draft_id = self.require_started()?.to_string();

        self.state.begin("resubmit")?;
        self.state.submit_disabled = true;
        self.notifier.on_phase(Phase::SubmittingForReview).await;
        let action = ReviewAction {
            id: None,
            trigger: ActionTrigger::Submit,
            target_id: draft_id.clone(),
        };
        let result = self.store.save_review_action(&action).await;
        self.state.finish();

        if let Err(e) = result {
            self.state.submit_disabled = false;
            self.notifier.error(&self.submit_error()).await;
            return Err(e);
        }

        self.state.preprint_saved = true;
        match self.store.reload_draft(&draft_id).await {
            Ok(reloaded) => self.draft = reloaded,
            Err(e) => warn!("reloading draft {draft_id} failed: {e}"),
        }
        Ok(self.return_to_submission())
    }

    /// The draft's detail page
    pub fn return_to_submission(&self) -> Destination {
        Destination::Content {
            provider_route: self.branding.is_sub_route,
            draft_id: self.draft.id.clone().unwrap_or_default(),
        }
    }

    /// Leave the wizard without submitting
    pub const fn cancel(&self) -> Destination {
        Destination::Index {
            provider_route: false,
        }
    }
}
