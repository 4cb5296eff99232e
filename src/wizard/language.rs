//! Wording that depends on the provider's moderation workflow

use crate::types::{ModerationWorkflow, Provider, ReviewsState};
use crate::wizard::messages::{Message, keys};

/// Workflow name, for moderated providers
pub fn workflow_label(workflow: ModerationWorkflow) -> Option<Message> {
    match workflow {
        ModerationWorkflow::None => None,
        ModerationWorkflow::PreModeration => Some(Message::new(keys::PRE_MODERATION)),
        ModerationWorkflow::PostModeration => Some(Message::new(keys::POST_MODERATION)),
    }
}

/// Provider name as shown to users; the default provider uses the brand name
pub fn provider_name(provider: &Provider) -> Message {
    if provider.is_default() {
        Message::new(keys::BRAND_NAME)
    } else {
        Message::new(keys::PROVIDER_NAME).with("name", provider.name.clone())
    }
}

fn document_type(message: Message, provider: &Provider) -> Message {
    message.with("documentType", provider.document_type.clone())
}

/// Page heading
pub fn heading(provider: &Provider) -> Message {
    let key = if provider.moderation == ModerationWorkflow::PreModeration {
        keys::SUBMIT_HEADING
    } else {
        keys::CREATE_HEADING
    };
    document_type(Message::new(key), provider)
}

/// Final button label
pub fn button_label(provider: &Provider) -> Message {
    Message::new(if provider.moderation == ModerationWorkflow::PreModeration {
        keys::SUBMIT_BUTTON
    } else {
        keys::CREATE_BUTTON
    })
}

/// Confirmation dialog title
pub fn modal_title(provider: &Provider, edit_mode: bool) -> Message {
    let key = if edit_mode {
        keys::MODAL_TITLE_RESUBMIT
    } else if provider.moderation == ModerationWorkflow::PreModeration {
        keys::MODAL_TITLE_SUBMIT
    } else {
        keys::MODAL_TITLE_CREATE
    };
    document_type(Message::new(key), provider)
}

/// First information line of the submit section
pub fn general_information(provider: &Provider, provider_display: &str) -> Message {
    let message = match workflow_label(provider.moderation) {
        Some(workflow) => Message::new(keys::INFO_MODERATION).with("workflow", workflow.to_string()),
        None => Message::new(keys::INFO_DEFAULT),
    };
    document_type(message.with("provider", provider_display), provider)
}

/// Who can see and edit the submission
pub fn permission_information(provider: &Provider) -> Message {
    let key = if provider.moderation == ModerationWorkflow::PreModeration {
        keys::INFO_PERMISSION_SUBMIT
    } else {
        keys::INFO_PERMISSION_CREATE
    };
    document_type(Message::new(key), provider)
}

/// What moderation will do, for moderated providers
pub fn moderation_information(provider: &Provider) -> Option<Message> {
    let key = match provider.moderation {
        ModerationWorkflow::None => return None,
        ModerationWorkflow::PreModeration => keys::INFO_PRE,
        ModerationWorkflow::PostModeration => keys::INFO_POST,
    };
    Some(document_type(Message::new(key), provider))
}

/// Whether edit mode shows moderation information at all
pub fn show_information(workflow: ModerationWorkflow, state: ReviewsState) -> bool {
    !(state == ReviewsState::Accepted
        || (workflow == ModerationWorkflow::PostModeration && state == ReviewsState::Pending))
}

/// First edit-mode information line
pub fn edit_information_line1(workflow: ModerationWorkflow) -> Option<Message> {
    match workflow {
        ModerationWorkflow::None => None,
        ModerationWorkflow::PreModeration => Some(Message::new(keys::EDIT_LINE1_PRE)),
        ModerationWorkflow::PostModeration => Some(Message::new(keys::EDIT_LINE1_POST)),
    }
}

/// Second edit-mode information line, by review state
pub fn edit_information_line2(provider: &Provider, state: ReviewsState) -> Option<Message> {
    let key = match (state, provider.moderation) {
        (ReviewsState::Pending, ModerationWorkflow::PreModeration) => keys::EDIT_LINE2_PRE_PENDING,
        (ReviewsState::Rejected, ModerationWorkflow::PreModeration) => keys::EDIT_LINE2_PRE_REJECTED,
        (ReviewsState::Rejected, ModerationWorkflow::PostModeration) => {
            keys::EDIT_LINE2_POST_REJECTED
        }
        _ => return None,
    };
    Some(document_type(Message::new(key), provider))
}
