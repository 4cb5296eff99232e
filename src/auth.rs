//! API authentication
//!
//! Supports environment variables and the config file.

use crate::config::Config;
use crate::error::{Error, Result};
use reqwest::Client;
use serde::Deserialize;
use std::env;

/// Source of authentication token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthSource {
    /// Token from environment variable
    EnvVar,
    /// Token from the config file
    ConfigFile,
}

/// API authentication configuration
#[derive(Debug, Clone)]
pub struct ApiAuthConfig {
    /// Personal access token
    pub token: String,
    /// Where the token was obtained from
    pub source: AuthSource,
}

/// Get API authentication
///
/// Priority:
/// 1. `PPSUBMIT_TOKEN` environment variable
/// 2. `OSF_TOKEN` environment variable
/// 3. `token` in the config file
pub fn get_api_auth(config: &Config) -> Result<ApiAuthConfig> {
    for var in ["PPSUBMIT_TOKEN", "OSF_TOKEN"] {
        if let Ok(token) = env::var(var) {
            if !token.trim().is_empty() {
                return Ok(ApiAuthConfig {
                    token: token.trim().to_string(),
                    source: AuthSource::EnvVar,
                });
            }
        }
    }

    if let Some(token) = config.token.as_ref().filter(|t| !t.trim().is_empty()) {
        return Ok(ApiAuthConfig {
            token: token.trim().to_string(),
            source: AuthSource::ConfigFile,
        });
    }

    Err(Error::Auth(
        "No API token found. Set PPSUBMIT_TOKEN or add \"token\" to the config file".to_string(),
    ))
}

#[derive(Deserialize)]
struct MeDocument {
    data: MeResource,
}

#[derive(Deserialize)]
struct MeResource {
    attributes: MeAttributes,
}

#[derive(Deserialize)]
struct MeAttributes {
    full_name: String,
}

/// Test API authentication, returning the user's full name
pub async fn test_api_auth(config: &Config, auth: &ApiAuthConfig) -> Result<String> {
    let url = format!("{}/users/me/", config.api_url.trim_end_matches('/'));

    let me: MeDocument = Client::new()
        .get(&url)
        .bearer_auth(&auth.token)
        .send()
        .await?
        .error_for_status()
        .map_err(|e| Error::Auth(format!("Invalid token: {e}")))?
        .json()
        .await?;

    Ok(me.data.attributes.full_name)
}
