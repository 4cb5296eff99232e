//! Upload sub-flow states and cascading invalidation

use crate::types::{Container, FileRef};
use crate::wizard::pending::PendingUploadFields;
use serde::{Deserialize, Serialize};
use std::fmt;

/// New project or existing project
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UploadState {
    /// Nothing chosen yet
    #[default]
    Start,
    /// Create a new container for the file
    New,
    /// Attach to a container the user already has
    Existing,
}

/// New file or existing file, inside the existing-project flow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileChoice {
    /// Not chosen yet
    #[default]
    Choose,
    /// A file already stored in the container
    Existing,
    /// A file uploaded from disk
    New,
}

/// Steps of the existing-project flow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ExistingStep {
    /// Pick a container
    #[default]
    ChooseProject,
    /// Pick or upload a file
    ChooseFile,
    /// Convert the container or copy into a new component
    Organize,
    /// Confirm the title and start the draft
    Finalize,
}

impl ExistingStep {
    /// Following step; `Finalize` is terminal
    pub const fn next(self) -> Self {
        match self {
            Self::ChooseProject => Self::ChooseFile,
            Self::ChooseFile => Self::Organize,
            Self::Organize | Self::Finalize => Self::Finalize,
        }
    }
}

/// What to do with an existing container
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConvertOrCopy {
    /// Attach the draft to the container itself
    Convert,
    /// Create a child component and copy the file into it
    Copy,
}

/// What an unfinished upload already created on the server
///
/// Kept until the draft starts, so a retry reuses the container and the
/// transferred file instead of creating them again.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadAttempt {
    /// Project or component created for the draft
    pub container: Option<Container>,
    /// File uploaded or copied into the target container
    pub file: Option<FileRef>,
}

/// How far down the upload flow to clear when an earlier choice changes
///
/// Levels nest: clearing a level clears every level below it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ClearLevel {
    /// Everything, including the chosen container
    AllUpload,
    /// Selected and staged file
    BelowNode,
    /// Convert-or-copy choice
    BelowFile,
    /// Pending title
    BelowConvertOrCopy,
}

impl fmt::Display for ClearLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::AllUpload => "allUpload",
            Self::BelowNode => "belowNode",
            Self::BelowFile => "belowFile",
            Self::BelowConvertOrCopy => "belowConvertOrCopy",
        };
        write!(f, "{s}")
    }
}

/// Clear pending upload fields at `level` and every level below it
///
/// No-op once the upload is locked.
pub fn clear_downstream(fields: &mut PendingUploadFields, level: ClearLevel, locked: bool) {
    if locked {
        return;
    }
    if level <= ClearLevel::AllUpload {
        fields.container = None;
    }
    if level <= ClearLevel::BelowNode {
        fields.selected_file = None;
        fields.file_upload = None;
    }
    if level <= ClearLevel::BelowFile {
        fields.convert_or_copy = None;
    }
    fields.title = None;
}
