//! Locally edited, unsaved field values

use crate::types::{Container, FileRef, License, PublicationDraft, SubjectPath};
use crate::wizard::dirty::fix_special_char;
use crate::wizard::upload::{ConvertOrCopy, FileChoice, UploadState};
use chrono::NaiveDate;

/// A file picked from disk but not yet uploaded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingUpload {
    /// File name
    pub name: String,
    /// File contents
    pub bytes: Vec<u8>,
}

/// License as edited in the Basics section
///
/// `copyright_holders` is the comma-joined text the user edits.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PendingLicense {
    /// Selected license
    pub license_type: Option<License>,
    /// Copyright year
    pub year: Option<String>,
    /// Copyright holders, comma separated
    pub copyright_holders: String,
}

impl PendingLicense {
    /// Pending license mirroring what the draft has committed
    pub fn from_committed(draft: &PublicationDraft) -> Self {
        let record = draft.license_record.as_ref();
        Self {
            license_type: draft.license.clone(),
            year: record.and_then(|r| r.year.clone()),
            copyright_holders: record
                .map(|r| r.copyright_holders.join(", "))
                .unwrap_or_default(),
        }
    }

    /// Holders split back into a list
    pub fn holders(&self) -> Vec<String> {
        split_holders(&self.copyright_holders)
    }
}

/// Split comma-joined copyright holders
pub fn split_holders(text: &str) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
        .collect()
}

/// Upload-section pending values
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PendingUploadFields {
    /// New project or existing project
    pub state: UploadState,
    /// New file or existing file (existing-project flow)
    pub file_choice: FileChoice,
    /// Container chosen to hold the draft
    pub container: Option<Container>,
    /// Existing file chosen as the primary file
    pub selected_file: Option<FileRef>,
    /// File staged for upload
    pub file_upload: Option<PendingUpload>,
    /// Use the container as-is or copy into a new component
    pub convert_or_copy: Option<ConvertOrCopy>,
    /// Pending title
    pub title: Option<String>,
}

/// Basics-section pending values
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PendingBasics {
    /// Abstract; `None` when never edited
    pub abstract_text: Option<String>,
    /// Tags
    pub tags: Vec<String>,
    /// DOI as typed
    pub doi: Option<String>,
    /// Original publication date
    pub original_publication_date: Option<NaiveDate>,
    /// License
    pub license: PendingLicense,
}

impl PendingBasics {
    /// Pending basics mirroring the committed draft
    pub fn from_committed(draft: &PublicationDraft) -> Self {
        Self {
            abstract_text: draft.description.clone(),
            tags: draft.tags.iter().map(|t| fix_special_char(t)).collect(),
            doi: draft.doi.clone(),
            original_publication_date: draft.original_publication_date,
            license: PendingLicense::from_committed(draft),
        }
    }
}

/// Every pending value of the wizard
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PendingFields {
    /// Provider selected in the Provider section
    pub selected_provider: Option<String>,
    /// Upload section
    pub upload: PendingUploadFields,
    /// Basics section
    pub basics: PendingBasics,
    /// Discipline section
    pub subjects: Vec<SubjectPath>,
}

impl PendingFields {
    /// Pending values equal to the committed record (nothing dirty)
    pub fn from_committed(draft: &PublicationDraft, container: Option<&Container>) -> Self {
        Self {
            selected_provider: draft.provider_id.clone(),
            upload: PendingUploadFields {
                container: container.cloned(),
                selected_file: draft.primary_file.clone(),
                title: draft.title.clone(),
                ..PendingUploadFields::default()
            },
            basics: PendingBasics::from_committed(draft),
            subjects: draft.subjects.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::LicenseRecord;

    #[test]
    fn test_split_holders() {
        assert_eq!(
            split_holders("Ada Lovelace,  Charles Babbage ,"),
            vec!["Ada Lovelace", "Charles Babbage"]
        );
        assert!(split_holders("").is_empty());
    }

    #[test]
    fn test_pending_license_from_committed() {
        let draft = PublicationDraft {
            license_record: Some(LicenseRecord {
                year: Some("2019".to_string()),
                copyright_holders: vec!["A".to_string(), "B".to_string()],
            }),
            ..PublicationDraft::default()
        };
        let license = PendingLicense::from_committed(&draft);
        assert_eq!(license.year.as_deref(), Some("2019"));
        assert_eq!(license.copyright_holders, "A, B");
        assert_eq!(license.holders(), vec!["A", "B"]);
    }

    #[test]
    fn test_pending_tags_are_normalized() {
        let draft = PublicationDraft {
            tags: vec!["R&amp;D".to_string(), "plain".to_string()],
            ..PublicationDraft::default()
        };
        let basics = PendingBasics::from_committed(&draft);
        assert_eq!(basics.tags, vec!["R&D", "plain"]);
    }
}
