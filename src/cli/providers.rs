//! Providers and subjects commands - list what a submission can target

use crate::cli::Session;
use crate::cli::style::{Stylize, bullet};
use anstream::println;
use preprint_submit::error::Result;
use preprint_submit::store::RecordStore;
use preprint_submit::taxonomy::load_top_level_subjects;
use preprint_submit::wizard::{language, order_providers};
use std::path::Path;

/// Run the providers command
pub async fn run_providers(config_path: Option<&Path>) -> Result<()> {
    let session = Session::open(config_path)?;
    let providers = order_providers(session.store.find_providers().await?);

    if providers.is_empty() {
        println!("{}", "No providers found".muted());
        return Ok(());
    }

    println!("{}", "Providers".emphasis());
    for provider in &providers {
        let workflow = language::workflow_label(provider.moderation)
            .map_or_else(|| "no moderation".to_string(), |m| m.to_string());
        let marker = if provider.id == session.config.provider {
            " (configured)"
        } else {
            ""
        };
        println!(
            "  {} {} {} {}{}",
            bullet(),
            provider.id.accent(),
            language::provider_name(provider),
            format!("[{workflow}]").muted(),
            marker.muted()
        );
    }
    Ok(())
}

/// Run the subjects command
pub async fn run_subjects(config_path: Option<&Path>, provider_id: Option<&str>) -> Result<()> {
    let session = Session::open(config_path)?;
    let provider_id = provider_id.unwrap_or(&session.config.provider);
    let subjects = load_top_level_subjects(&session.store, provider_id).await?;

    if subjects.is_empty() {
        println!("{}", format!("No subjects for {provider_id}").muted());
        return Ok(());
    }

    println!("{} {}", "Top-level subjects for".emphasis(), provider_id.accent());
    for subject in &subjects {
        println!("  {} {} {}", bullet(), subject.text, subject.id.muted());
    }
    Ok(())
}
