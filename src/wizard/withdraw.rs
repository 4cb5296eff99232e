//! Withdrawal requests for submitted drafts

use super::events::Notifier;
use super::messages::{Message, keys};
use super::submit::Destination;
use crate::error::Result;
use crate::store::RecordStore;
use crate::types::{Branding, ModerationWorkflow, Provider, PublicationDraft, WithdrawalRequest};
use tracing::debug;

/// Request withdrawal of a draft with an explanation
pub struct WithdrawalForm<'a> {
    store: &'a dyn RecordStore,
    notifier: &'a dyn Notifier,
    branding: Branding,
    draft: PublicationDraft,
    provider: Provider,
    /// Why the authors want the draft withdrawn
    pub explanation: String,
}

impl<'a> WithdrawalForm<'a> {
    /// Form for `draft`, published through `provider`
    pub fn new(
        store: &'a dyn RecordStore,
        notifier: &'a dyn Notifier,
        branding: Branding,
        draft: PublicationDraft,
        provider: Provider,
    ) -> Self {
        Self {
            store,
            notifier,
            branding,
            draft,
            provider,
            explanation: String::new(),
        }
    }

    fn document_message(&self, key: &'static str) -> Message {
        Message::new(key).with("documentType", self.provider.document_type.clone())
    }

    /// What happens after the request, by moderation workflow
    pub fn notice(&self) -> Message {
        self.document_message(match self.provider.moderation {
            ModerationWorkflow::PreModeration => keys::WITHDRAW_PRE_NOTICE,
            ModerationWorkflow::PostModeration => keys::WITHDRAW_POST_NOTICE,
            ModerationWorkflow::None => keys::WITHDRAW_NO_MODERATION_NOTICE,
        })
    }

    /// Button label, by published state
    pub fn button_label(&self) -> Message {
        Message::new(if self.draft.is_published {
            keys::WITHDRAW_BUTTON_PUBLISHED
        } else {
            keys::WITHDRAW_BUTTON_NOT_PUBLISHED
        })
    }

    fn draft_id(&self) -> String {
        self.draft.id.clone().unwrap_or_default()
    }

    /// Back to the draft without withdrawing
    pub fn cancel(&self) -> Destination {
        Destination::Content {
            provider_route: self.branding.is_sub_route,
            draft_id: self.draft_id(),
        }
    }

    /// Save the withdrawal request
    ///
    /// An unpublished pre-moderation draft goes straight back to the index
    /// with a success message; everything else returns to the draft.
    pub async fn submit(&self) -> Result<Destination> {
        let request = WithdrawalRequest {
            target_id: self.draft_id(),
            comment: self.explanation.clone(),
        };

        if let Err(e) = self.store.save_withdrawal_request(&request).await {
            self.notifier
                .error(&Message::new(keys::WITHDRAW_ERROR).with("detail", e.to_string()))
                .await;
            return Err(e);
        }
        debug!(draft = %request.target_id, "withdrawal requested");

        let provider_route = self.branding.is_sub_route;
        if !self.draft.is_published && self.provider.moderation == ModerationWorkflow::PreModeration
        {
            self.notifier
                .success(&self.document_message(keys::WITHDRAW_SUCCESS))
                .await;
            Ok(Destination::Index { provider_route })
        } else {
            Ok(self.cancel())
        }
    }
}
