//! Auth command - test and explain API authentication

use anstream::println;
use crate::cli::style::{Stylize, check};
use preprint_submit::auth::{get_api_auth, test_api_auth};
use preprint_submit::config::{Config, default_config_path};
use preprint_submit::error::Result;
use std::path::Path;

/// Run the auth test command
pub async fn run_auth_test(config_path: Option<&Path>) -> Result<()> {
    let config = Config::load(config_path)?;
    println!("Testing authentication against {}...", config.api_url.accent());
    let auth = get_api_auth(&config)?;
    let name = test_api_auth(&config, &auth).await?;
    println!("{} Authenticated as: {}", check(), name.emphasis());
    println!("Token source: {:?}", auth.source);
    Ok(())
}

/// Run the auth setup command (show instructions)
pub fn run_auth_setup() {
    let config_file = default_config_path().map_or_else(
        || "<config dir>/ppsubmit/config.json".to_string(),
        |p| p.display().to_string(),
    );
    println!("{}", "Authentication Setup".emphasis());
    println!("====================");
    println!();
    println!("Create a personal access token in your account settings");
    println!("with the scopes needed to create projects and preprints.");
    println!();
    println!("Option 1: Environment variable");
    println!("  Set PPSUBMIT_TOKEN (or OSF_TOKEN)");
    println!();
    println!("Option 2: Config file");
    println!("  Add {} to {}", r#""token": "<token>""#.accent(), config_file);
    println!();
    println!("For a test server:");
    println!("  Set PPSUBMIT_API_URL and PPSUBMIT_FILES_URL");
}

/// Wrapper for auth commands
pub async fn run_auth(config_path: Option<&Path>, action: &str) -> Result<()> {
    match action {
        "test" => run_auth_test(config_path).await,
        "setup" => {
            run_auth_setup();
            Ok(())
        }
        _ => {
            println!("Unknown action: {action}. Use 'test' or 'setup'.");
            Ok(())
        }
    }
}
