//! ppsubmit - Preprint submission wizard
//!
//! CLI binary for submitting, resubmitting and withdrawing preprints.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod cli;

#[derive(Parser)]
#[command(name = "ppsubmit")]
#[command(about = "Preprint submission wizard - stage, save and publish preprints")]
#[command(version)]
struct Cli {
    /// Path to a config file (defaults to <config dir>/ppsubmit/config.json)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Submit a preprint described by a manifest
    Submit {
        /// Path to the manifest JSON
        manifest: PathBuf,

        /// Dry run - validate and show the plan without contacting the server
        #[arg(long)]
        dry_run: bool,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Validate a manifest offline
    Check {
        /// Path to the manifest JSON
        manifest: PathBuf,
    },

    /// Show the review state of a submitted draft
    Status {
        /// Draft id
        id: String,
    },

    /// Send a pending or rejected draft back for review
    Resubmit {
        /// Draft id
        id: String,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Request withdrawal of a draft
    Withdraw {
        /// Draft id
        id: String,

        /// Why the draft should be withdrawn
        #[arg(long)]
        reason: String,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// List providers
    Providers,

    /// List a provider's top-level subjects
    Subjects {
        /// Provider id (defaults to the configured provider)
        provider: Option<String>,
    },

    /// Authentication management
    Auth {
        #[command(subcommand)]
        action: AuthAction,
    },
}

#[derive(Subcommand)]
enum AuthAction {
    /// Test authentication
    Test,
    /// Show authentication setup instructions
    Setup,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = cli.config.as_deref();

    match cli.command {
        Commands::Submit {
            manifest,
            dry_run,
            yes,
        } => {
            cli::run_submit(config, &manifest, dry_run, yes).await?;
        }
        Commands::Check { manifest } => {
            cli::run_check(&manifest)?;
        }
        Commands::Status { id } => {
            cli::run_status(config, &id).await?;
        }
        Commands::Resubmit { id, yes } => {
            cli::run_resubmit(config, &id, yes).await?;
        }
        Commands::Withdraw { id, reason, yes } => {
            cli::run_withdraw(config, &id, &reason, yes).await?;
        }
        Commands::Providers => {
            cli::run_providers(config).await?;
        }
        Commands::Subjects { provider } => {
            cli::run_subjects(config, provider.as_deref()).await?;
        }
        Commands::Auth { action } => {
            let action_str = match action {
                AuthAction::Test => "test",
                AuthAction::Setup => "setup",
            };
            cli::run_auth(config, action_str).await?;
        }
    }

    Ok(())
}
