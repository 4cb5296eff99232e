//! Configuration from environment variables and an optional config file

use crate::error::{Error, Result};
use crate::types::{Branding, DEFAULT_PROVIDER_ID};
use serde::Deserialize;
use std::env;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Default API base URL
pub const DEFAULT_API_URL: &str = "https://api.osf.io/v2";
/// Default file service base URL
pub const DEFAULT_FILES_URL: &str = "https://files.osf.io";
/// Default web URL (used for links to submitted drafts)
pub const DEFAULT_WEB_URL: &str = "https://osf.io";

/// Resolved configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// JSON:API base URL
    pub api_url: String,
    /// File service base URL
    pub files_url: String,
    /// Web front-end URL
    pub web_url: String,
    /// Provider submissions go to unless overridden
    pub provider: String,
    /// Deployment branding
    pub branding: Branding,
    /// Token stored in the config file, if any
    pub token: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            files_url: DEFAULT_FILES_URL.to_string(),
            web_url: DEFAULT_WEB_URL.to_string(),
            provider: DEFAULT_PROVIDER_ID.to_string(),
            branding: Branding::default(),
            token: None,
        }
    }
}

/// On-disk config file; every field optional
#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    api_url: Option<String>,
    files_url: Option<String>,
    web_url: Option<String>,
    provider: Option<String>,
    #[serde(default)]
    branding: Option<Branding>,
    token: Option<String>,
}

/// Default config file location (`<config dir>/ppsubmit/config.json`)
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("ppsubmit").join("config.json"))
}

impl Config {
    /// Load configuration
    ///
    /// Priority (highest first):
    /// 1. `PPSUBMIT_*` environment variables
    /// 2. Config file (`path`, or the default location if it exists)
    /// 3. Built-in defaults
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let file = match path {
            Some(p) => Some(read_config_file(p)?),
            None => match default_config_path() {
                Some(p) if p.exists() => Some(read_config_file(&p)?),
                _ => None,
            },
        }
        .unwrap_or_default();

        let defaults = Self::default();
        let config = Self {
            api_url: env::var("PPSUBMIT_API_URL")
                .ok()
                .or(file.api_url)
                .unwrap_or(defaults.api_url),
            files_url: env::var("PPSUBMIT_FILES_URL")
                .ok()
                .or(file.files_url)
                .unwrap_or(defaults.files_url),
            web_url: env::var("PPSUBMIT_WEB_URL")
                .ok()
                .or(file.web_url)
                .unwrap_or(defaults.web_url),
            provider: env::var("PPSUBMIT_PROVIDER")
                .ok()
                .or(file.provider)
                .unwrap_or(defaults.provider),
            branding: file.branding.unwrap_or_default(),
            token: file.token,
        };

        config.validate()?;
        debug!(api = %config.api_url, provider = %config.provider, "configuration loaded");
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("api_url", &self.api_url),
            ("files_url", &self.files_url),
            ("web_url", &self.web_url),
        ] {
            let url = url::Url::parse(value)
                .map_err(|e| Error::Config(format!("{name} '{value}' is not a URL: {e}")))?;
            if !matches!(url.scheme(), "http" | "https") {
                return Err(Error::Config(format!("{name} must be http(s): {value}")));
            }
        }
        if self.provider.trim().is_empty() {
            return Err(Error::Config("provider must not be empty".to_string()));
        }
        Ok(())
    }

    /// Web link to a draft
    pub fn draft_url(&self, draft_id: &str) -> String {
        format!("{}/{}", self.web_url.trim_end_matches('/'), draft_id)
    }
}

fn read_config_file(path: &Path) -> Result<ConfigFile> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("cannot read {}: {e}", path.display())))?;
    serde_json::from_str(&text)
        .map_err(|e| Error::Config(format!("invalid config file {}: {e}", path.display())))
}
