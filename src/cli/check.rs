//! Check command - validate a manifest without touching the server

use crate::cli::style::{Stylize, check, cross};
use anstream::{eprintln, println};
use chrono::Utc;
use preprint_submit::error::{Error, Result};
use preprint_submit::manifest::SubmissionManifest;
use preprint_submit::wizard::FieldError;
use std::path::Path;

/// Print each field error on stderr
pub fn print_field_errors(errors: &[FieldError]) {
    for error in errors {
        eprintln!("  {} {}", cross(), error.to_string().error());
    }
}

/// Run the check command
pub fn run_check(manifest_path: &Path) -> Result<()> {
    let manifest = SubmissionManifest::load(manifest_path)?;
    let errors = manifest.validate(Utc::now().date_naive());

    if errors.is_empty() {
        println!(
            "{} {} is ready to submit",
            check(),
            manifest_path.display().accent()
        );
        return Ok(());
    }

    print_field_errors(&errors);
    Err(Error::Validation(format!(
        "{} problem{} in {}",
        errors.len(),
        if errors.len() == 1 { "" } else { "s" },
        manifest_path.display()
    )))
}
