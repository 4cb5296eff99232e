//! CLI commands
//!
//! Command implementations for the `ppsubmit` binary.

mod auth;
mod check;
mod notify;
mod providers;
mod review;
pub mod style;
mod submit;

pub use auth::run_auth;
pub use check::run_check;
pub use providers::{run_providers, run_subjects};
pub use review::{run_resubmit, run_status, run_withdraw};
pub use submit::run_submit;

use crate::cli::style::{Stream, Stylize, hyperlink_url};
use preprint_submit::auth::get_api_auth;
use preprint_submit::config::Config;
use preprint_submit::error::{Error, Result};
use preprint_submit::store::HttpRecordStore;
use preprint_submit::wizard::Destination;
use std::path::Path;

/// Resolved configuration plus an authenticated store
pub struct Session {
    /// Configuration
    pub config: Config,
    /// Record store and file transfer
    pub store: HttpRecordStore,
}

impl Session {
    /// Load configuration and credentials
    pub fn open(config_path: Option<&Path>) -> Result<Self> {
        let config = Config::load(config_path)?;
        let auth = get_api_auth(&config)?;
        let store = HttpRecordStore::new(&config, Some(auth.token));
        Ok(Self { config, store })
    }

    /// Human-readable link for a destination
    pub fn describe(&self, destination: &Destination) -> String {
        let url = match destination {
            Destination::External { url } => url.clone(),
            Destination::Index { .. } => self.config.web_url.clone(),
            Destination::Content { draft_id, .. } => self.config.draft_url(draft_id),
        };
        hyperlink_url(Stream::Stdout, &url)
    }
}

/// Ask for confirmation unless `assume_yes` is set
pub fn confirm(prompt: &str, assume_yes: bool) -> Result<bool> {
    if assume_yes {
        return Ok(true);
    }
    dialoguer::Confirm::new()
        .with_prompt(prompt.emphasis().to_string())
        .default(false)
        .interact()
        .map_err(|e| Error::Internal(format!("prompt failed: {e}")))
}
