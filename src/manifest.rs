//! Submission manifests
//!
//! A manifest is a JSON file describing everything the wizard would ask
//! for, so a submission can run non-interactively:
//!
//! ```json
//! {
//!   "title": "Bridges of Königsberg revisited",
//!   "file": "paper.pdf",
//!   "abstract": "We revisit a classic problem ...",
//!   "tags": ["graphs"],
//!   "license": { "name": "CC-By Attribution 4.0 International", "year": "2024" },
//!   "subjects": [["engineering-id", "civil-id"]],
//!   "contributors": [{ "full_name": "Ada Lovelace", "email": "ada@example.org" }]
//! }
//! ```

use crate::error::{Error, Result};
use crate::types::{License, NewContributor, SubjectPath};
use crate::wizard::{
    ConvertOrCopy, FieldError, FieldIssue, PendingLicense, PendingUpload, default_license,
    validate_abstract, validate_doi, validate_email, validate_full_name, validate_license,
    validate_original_publication_date,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Existing project to attach the submission to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExistingProject {
    /// Container id
    pub id: String,
    /// Convert the project itself, or copy the file into a new component
    #[serde(default = "default_project_mode")]
    pub mode: ProjectMode,
}

/// How an existing project is used
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectMode {
    /// Turn the project into the submission
    Convert,
    /// Create a component under the project
    Copy,
}

const fn default_project_mode() -> ProjectMode {
    ProjectMode::Convert
}

impl From<ProjectMode> for ConvertOrCopy {
    fn from(mode: ProjectMode) -> Self {
        match mode {
            ProjectMode::Convert => Self::Convert,
            ProjectMode::Copy => Self::Copy,
        }
    }
}

/// License selection by name or id
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ManifestLicense {
    /// License name or id, matched case-insensitively
    pub name: String,
    /// Copyright year
    pub year: Option<String>,
    /// Copyright holders
    #[serde(default)]
    pub copyright_holders: Vec<String>,
}

/// Contributor entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ManifestContributor {
    /// A registered user
    Registered {
        /// User id
        user_id: String,
    },
    /// Someone to invite
    Unregistered {
        /// Full name
        full_name: String,
        /// Email address
        email: String,
    },
}

impl From<&ManifestContributor> for NewContributor {
    fn from(entry: &ManifestContributor) -> Self {
        match entry {
            ManifestContributor::Registered { user_id } => Self::Registered {
                user_id: user_id.clone(),
            },
            ManifestContributor::Unregistered { full_name, email } => Self::Unregistered {
                full_name: full_name.trim().to_string(),
                email: email.trim().to_string(),
            },
        }
    }
}

/// Everything needed to run a submission end to end
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionManifest {
    /// Provider id; the configured provider when absent
    pub provider: Option<String>,
    /// Title of the new project (or of the converted one)
    pub title: String,
    /// File to upload, relative to the manifest
    pub file: PathBuf,
    /// Attach to an existing project instead of creating one
    pub project: Option<ExistingProject>,
    /// Abstract
    #[serde(rename = "abstract")]
    pub abstract_text: String,
    /// Tags
    #[serde(default)]
    pub tags: Vec<String>,
    /// DOI of the peer-reviewed article
    pub doi: Option<String>,
    /// Date of original publication
    pub original_publication_date: Option<NaiveDate>,
    /// License; the provider's first accepted license when absent
    pub license: Option<ManifestLicense>,
    /// Subject paths (ids, top level first)
    #[serde(default)]
    pub subjects: Vec<SubjectPath>,
    /// Contributors to add besides the submitting user
    #[serde(default)]
    pub contributors: Vec<ManifestContributor>,
}

impl SubmissionManifest {
    /// Read a manifest; `file` is resolved against the manifest's directory
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let mut manifest: Self = serde_json::from_str(&text)
            .map_err(|e| Error::Parse(format!("{}: {e}", path.display())))?;

        if manifest.file.is_relative() {
            if let Some(dir) = path.parent() {
                manifest.file = dir.join(&manifest.file);
            }
        }
        debug!(manifest = %path.display(), file = %manifest.file.display(), "manifest loaded");
        Ok(manifest)
    }

    /// Checks that need no server round trip
    pub fn validate(&self, today: NaiveDate) -> Vec<FieldError> {
        let mut errors: Vec<FieldError> = [
            validate_abstract(Some(&self.abstract_text)),
            validate_doi(self.doi.as_deref()),
            validate_original_publication_date(self.original_publication_date, today),
        ]
        .into_iter()
        .filter_map(std::result::Result::err)
        .collect();

        if self.title.trim().is_empty() {
            errors.insert(0, FieldError::new("Title", FieldIssue::Missing));
        }
        if self.subjects.is_empty() {
            errors.push(FieldError::new("Discipline", FieldIssue::Missing));
        }
        if !self.file.is_file() {
            errors.push(FieldError::new("File", FieldIssue::Missing));
        }
        for entry in &self.contributors {
            if let ManifestContributor::Unregistered { full_name, email } = entry {
                errors.extend(validate_full_name(full_name).err());
                errors.extend(validate_email(email).err());
            }
        }
        errors
    }

    /// Match the requested license against what the provider accepts
    pub fn resolve_license(&self, available: &[License], year: i32) -> Result<PendingLicense> {
        let Some(wanted) = &self.license else {
            return Ok(default_license(available, year));
        };
        let needle = wanted.name.trim();
        let license_type = available
            .iter()
            .find(|l| l.name.eq_ignore_ascii_case(needle) || l.id.eq_ignore_ascii_case(needle))
            .cloned()
            .ok_or_else(|| {
                let names: Vec<_> = available.iter().map(|l| l.name.as_str()).collect();
                Error::Validation(format!(
                    "license '{needle}' is not accepted; choose one of: {}",
                    names.join(", ")
                ))
            })?;

        let pending = PendingLicense {
            license_type: Some(license_type),
            year: wanted.year.clone().or_else(|| Some(year.to_string())),
            copyright_holders: wanted.copyright_holders.join(", "),
        };
        validate_license(&pending).map_err(|e| Error::Validation(e.to_string()))?;
        Ok(pending)
    }

    /// Read the file to upload
    pub fn pending_upload(&self) -> Result<PendingUpload> {
        let name = self
            .file
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| Error::Parse(format!("{} has no file name", self.file.display())))?;
        let bytes = std::fs::read(&self.file)?;
        Ok(PendingUpload { name, bytes })
    }
}
