//! Submit command - drive the whole wizard from a manifest

use crate::cli::check::print_field_errors;
use crate::cli::notify::CliNotifier;
use crate::cli::style::{Stylize, arrow, check};
use crate::cli::{Session, confirm};
use anstream::println;
use chrono::{Datelike, Utc};
use preprint_submit::error::{Error, Result};
use preprint_submit::manifest::SubmissionManifest;
use preprint_submit::store::RecordStore;
use preprint_submit::wizard::{
    Action, FileChoice, Outcome, UploadState, Wizard, language,
};
use std::path::Path;

/// Run the submit command
pub async fn run_submit(
    config_path: Option<&Path>,
    manifest_path: &Path,
    dry_run: bool,
    assume_yes: bool,
) -> Result<()> {
    let manifest = SubmissionManifest::load(manifest_path)?;
    let errors = manifest.validate(Utc::now().date_naive());
    if !errors.is_empty() {
        print_field_errors(&errors);
        return Err(Error::Validation(format!(
            "{} problem{} in {}",
            errors.len(),
            if errors.len() == 1 { "" } else { "s" },
            manifest_path.display()
        )));
    }

    if dry_run {
        print_plan(&manifest);
        println!();
        println!("{}", "Dry run: nothing was submitted".muted());
        return Ok(());
    }

    let session = Session::open(config_path)?;
    let notifier = CliNotifier::compact();
    let result = drive(&session, &notifier, &manifest, assume_yes).await;
    notifier.finish();
    result
}

fn print_plan(manifest: &SubmissionManifest) {
    println!("{}", "Submission plan".emphasis());
    match &manifest.project {
        None => println!("  {} Create project {}", arrow(), manifest.title.accent()),
        Some(project) => println!(
            "  {} Use project {} ({:?})",
            arrow(),
            project.id.accent(),
            project.mode
        ),
    }
    println!("  {} Upload {}", arrow(), manifest.file.display().accent());
    println!(
        "  {} {} subject path{}",
        arrow(),
        manifest.subjects.len(),
        if manifest.subjects.len() == 1 { "" } else { "s" }
    );
    println!(
        "  {} {} additional contributor{}",
        arrow(),
        manifest.contributors.len(),
        if manifest.contributors.len() == 1 { "" } else { "s" }
    );
}

async fn drive(
    session: &Session,
    notifier: &CliNotifier,
    manifest: &SubmissionManifest,
    assume_yes: bool,
) -> Result<()> {
    let store = &session.store;
    let config = &session.config;
    let provider_id = manifest.provider.as_deref().unwrap_or(&config.provider);
    let mut wizard =
        Wizard::new_submission(store, store, notifier, config.branding, provider_id).await?;

    println!("{}", language::heading(wizard.current_provider()).emphasis());

    if !config.branding.is_provider {
        wizard
            .dispatch(Action::SelectProvider(provider_id.to_string()))
            .await?;
        wizard.dispatch(Action::SaveProvider).await?;
    }

    let upload = manifest.pending_upload()?;
    match &manifest.project {
        None => {
            wizard.dispatch(Action::SetUploadState(UploadState::New)).await?;
            wizard.dispatch(Action::StageFile(upload)).await?;
        }
        Some(project) => {
            let container = store.find_container(&project.id).await?;
            wizard
                .dispatch(Action::SetUploadState(UploadState::Existing))
                .await?;
            wizard.dispatch(Action::ChooseContainer(container)).await?;
            wizard.dispatch(Action::SetFileChoice(FileChoice::New)).await?;
            wizard.dispatch(Action::StageFile(upload)).await?;
            wizard
                .dispatch(Action::SetConvertOrCopy(project.mode.into()))
                .await?;
        }
    }
    wizard
        .dispatch(Action::SetTitle(manifest.title.trim().to_string()))
        .await?;
    wizard.dispatch(Action::SaveUpload).await?;

    wizard
        .dispatch(Action::SetSubjects(manifest.subjects.clone()))
        .await?;
    wizard.dispatch(Action::SaveSubjects).await?;

    let license =
        manifest.resolve_license(wizard.available_licenses(), Utc::now().date_naive().year())?;
    wizard
        .dispatch(Action::SetAbstract(manifest.abstract_text.clone()))
        .await?;
    for tag in &manifest.tags {
        wizard.dispatch(Action::AddTag(tag.clone())).await?;
    }
    if let Some(doi) = &manifest.doi {
        wizard.dispatch(Action::SetDoi(doi.clone())).await?;
    }
    wizard
        .dispatch(Action::SetOriginalPublicationDate(
            manifest.original_publication_date,
        ))
        .await?;
    wizard.dispatch(Action::SetLicense(license)).await?;
    wizard.dispatch(Action::SaveBasics).await?;

    for entry in &manifest.contributors {
        wizard.dispatch(Action::AddContributor(entry.into())).await?;
    }
    wizard.dispatch(Action::AuthorsNext).await?;

    if wizard.dispatch(Action::ClickSubmit).await? != Outcome::Confirm {
        return Err(Error::Validation(
            "draft is incomplete; every section must be saved".to_string(),
        ));
    }

    let provider = wizard.current_provider().clone();
    println!();
    println!("{}", language::modal_title(&provider, false).emphasis());
    println!(
        "  {}",
        language::general_information(&provider, &language::provider_name(&provider).to_string())
            .muted()
    );
    if let Some(moderation) = language::moderation_information(&provider) {
        println!("  {}", moderation.muted());
    }
    println!("  {}", language::permission_information(&provider).muted());

    let prompt = format!("{}?", language::button_label(&provider));
    if !confirm(&prompt, assume_yes)? {
        println!("{}", "Left unsubmitted; the draft stays saved".muted());
        return Ok(());
    }

    let Outcome::Submitted(destination) = wizard.dispatch(Action::SavePreprint).await? else {
        return Err(Error::Internal("submission returned no destination".to_string()));
    };
    println!("{} {}", check(), session.describe(&destination));
    Ok(())
}
