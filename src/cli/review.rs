//! Status, resubmit and withdraw commands - act on an existing draft

use crate::cli::notify::CliNotifier;
use crate::cli::style::{Stylize, arrow, check};
use crate::cli::{Session, confirm};
use anstream::println;
use preprint_submit::error::{Error, Result};
use preprint_submit::store::RecordStore;
use preprint_submit::types::{ModerationWorkflow, Provider, PublicationDraft, ReviewsState};
use preprint_submit::wizard::{Action, Destination, Outcome, WithdrawalForm, Wizard, language};
use std::path::Path;

async fn draft_and_provider(
    session: &Session,
    draft_id: &str,
) -> Result<(PublicationDraft, Provider)> {
    let draft = session.store.reload_draft(draft_id).await?;
    let provider_id = draft
        .provider_id
        .clone()
        .unwrap_or_else(|| session.config.provider.clone());
    let provider = session
        .store
        .find_providers()
        .await?
        .into_iter()
        .find(|p| p.id == provider_id)
        .ok_or_else(|| Error::NotFound(format!("provider {provider_id}")))?;
    Ok((draft, provider))
}

const fn state_label(state: ReviewsState) -> &'static str {
    match state {
        ReviewsState::Initial => "not submitted",
        ReviewsState::Pending => "pending review",
        ReviewsState::Accepted => "accepted",
        ReviewsState::Rejected => "rejected",
        ReviewsState::Withdrawn => "withdrawn",
    }
}

/// Run the status command
pub async fn run_status(config_path: Option<&Path>, draft_id: &str) -> Result<()> {
    let session = Session::open(config_path)?;
    let (draft, provider) = draft_and_provider(&session, draft_id).await?;

    let title = draft.title.as_deref().unwrap_or("(untitled)");
    println!("{} {}", title.emphasis(), draft_id.muted());
    println!("  Provider:  {}", language::provider_name(&provider).accent());
    println!("  State:     {}", state_label(draft.reviews_state));
    println!(
        "  Published: {}",
        if draft.is_published { "yes" } else { "no" }
    );
    let link = Destination::Content {
        provider_route: session.config.branding.is_sub_route,
        draft_id: draft_id.to_string(),
    };
    println!("  Link:      {}", session.describe(&link));

    if language::show_information(provider.moderation, draft.reviews_state) {
        for line in [
            language::edit_information_line1(provider.moderation),
            language::edit_information_line2(&provider, draft.reviews_state),
        ]
        .into_iter()
        .flatten()
        {
            println!("  {}", line.muted());
        }
    }

    if provider.moderation == ModerationWorkflow::PreModeration
        && matches!(
            draft.reviews_state,
            ReviewsState::Pending | ReviewsState::Rejected
        )
    {
        println!();
        println!(
            "  {} resubmit with: {}",
            arrow(),
            format!("ppsubmit resubmit {draft_id}").accent()
        );
    }
    Ok(())
}

/// Run the resubmit command
pub async fn run_resubmit(config_path: Option<&Path>, draft_id: &str, assume_yes: bool) -> Result<()> {
    let session = Session::open(config_path)?;
    let notifier = CliNotifier::verbose();
    let store = &session.store;
    let mut wizard =
        Wizard::edit(store, store, &notifier, session.config.branding, draft_id).await?;

    if !wizard.can_resubmit() {
        return Err(Error::InvalidTransition(format!(
            "{draft_id} is not a pending or rejected pre-moderation submission"
        )));
    }

    println!(
        "{}",
        language::modal_title(wizard.current_provider(), true).emphasis()
    );
    if !confirm("Send it back for review?", assume_yes)? {
        return Ok(());
    }

    let Outcome::Submitted(destination) = wizard.dispatch(Action::Resubmit).await? else {
        return Err(Error::Internal("resubmission returned no destination".to_string()));
    };
    println!("{} Resubmitted {}", check(), session.describe(&destination));
    Ok(())
}

/// Run the withdraw command
pub async fn run_withdraw(
    config_path: Option<&Path>,
    draft_id: &str,
    reason: &str,
    assume_yes: bool,
) -> Result<()> {
    if reason.trim().is_empty() {
        return Err(Error::Validation(
            "a reason is required to request withdrawal".to_string(),
        ));
    }

    let session = Session::open(config_path)?;
    let notifier = CliNotifier::verbose();
    let (draft, provider) = draft_and_provider(&session, draft_id).await?;
    let title = draft.title.clone().unwrap_or_default();

    let mut form = WithdrawalForm::new(
        &session.store,
        &notifier,
        session.config.branding,
        draft,
        provider,
    );
    form.explanation = reason.trim().to_string();

    println!("{} {}", "Withdraw".emphasis(), title.accent());
    println!("  {}", form.notice().muted());
    if !confirm(&format!("{}?", form.button_label()), assume_yes)? {
        return Ok(());
    }

    let destination = form.submit().await?;
    println!("{} Withdrawal requested {}", check(), session.describe(&destination));
    Ok(())
}
