//! Core types for preprint-submit

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Identifier of the default (unbranded) provider
pub const DEFAULT_PROVIDER_ID: &str = "osf";

/// Moderation workflow configured on a provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ModerationWorkflow {
    /// Published immediately, never reviewed
    #[default]
    #[serde(rename = "none")]
    None,
    /// Reviewed before it becomes public
    #[serde(rename = "pre-moderation")]
    PreModeration,
    /// Public immediately, reviewed afterwards
    #[serde(rename = "post-moderation")]
    PostModeration,
}

impl ModerationWorkflow {
    /// Whether submissions go through a review queue
    pub const fn is_moderated(self) -> bool {
        !matches!(self, Self::None)
    }

    /// Parse the wire representation (`null` means no moderation)
    pub fn from_wire(value: Option<&str>) -> Self {
        match value {
            Some("pre-moderation") => Self::PreModeration,
            Some("post-moderation") => Self::PostModeration,
            _ => Self::None,
        }
    }

    /// Wire representation; `None` for unmoderated providers
    pub const fn as_wire(self) -> Option<&'static str> {
        match self {
            Self::None => None,
            Self::PreModeration => Some("pre-moderation"),
            Self::PostModeration => Some("post-moderation"),
        }
    }
}

/// Review state of a draft
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewsState {
    /// Never submitted
    #[default]
    Initial,
    /// Waiting in the moderation queue
    Pending,
    /// Accepted by a moderator
    Accepted,
    /// Rejected by a moderator
    Rejected,
    /// Withdrawn by its authors
    Withdrawn,
}

/// Permission held by the current user on a container
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Permission {
    /// Read access
    Read,
    /// Write access
    Write,
    /// Administrative access
    Admin,
}

/// A publishing venue
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Provider {
    /// Provider identifier (e.g., "osf")
    pub id: String,
    /// Display name
    pub name: String,
    /// Moderation workflow
    pub moderation: ModerationWorkflow,
    /// Word used for submissions ("preprint", "paper", ...)
    pub document_type: String,
    /// External domain, e.g. `https://engrxiv.org/`
    pub domain: Option<String>,
    /// Whether finished submissions redirect to `domain`
    pub domain_redirect_enabled: bool,
}

impl Provider {
    /// Whether this is the default, unbranded provider
    pub fn is_default(&self) -> bool {
        self.id == DEFAULT_PROVIDER_ID
    }
}

/// A license a provider accepts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct License {
    /// License identifier
    pub id: String,
    /// License name
    pub name: String,
    /// Fields the license text requires ("year", "copyrightHolders")
    #[serde(default)]
    pub required_fields: Vec<String>,
}

impl License {
    /// Whether the license requires a year
    pub fn requires_year(&self) -> bool {
        self.required_fields.iter().any(|f| f == "year")
    }

    /// Whether the license requires copyright holders
    pub fn requires_copyright_holders(&self) -> bool {
        self.required_fields
            .iter()
            .any(|f| f == "copyrightHolders" || f == "copyright_holders")
    }
}

/// Year and copyright holders filled into a license
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LicenseRecord {
    /// Copyright year
    pub year: Option<String>,
    /// Copyright holders
    #[serde(default)]
    pub copyright_holders: Vec<String>,
}

/// A stored file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRef {
    /// File identifier
    pub id: String,
    /// File name
    pub name: String,
}

/// A taxonomy node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    /// Subject identifier
    pub id: String,
    /// Display text
    pub text: String,
}

/// Subject ids from a top-level taxonomy down to the selected node
pub type SubjectPath = Vec<String>;

/// A project or component holding the uploaded file
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Container {
    /// Container identifier
    pub id: String,
    /// Title
    pub title: String,
    /// Description
    pub description: Option<String>,
    /// Tags
    #[serde(default)]
    pub tags: Vec<String>,
    /// License
    pub license: Option<License>,
    /// License year/holders
    pub license_record: Option<LicenseRecord>,
    /// Publicly visible
    pub public: bool,
    /// Parent container, for components
    pub parent_id: Option<String>,
    /// Immutable registration snapshot
    pub registration: bool,
    /// Permissions of the current user
    #[serde(default)]
    pub current_user_permissions: Vec<Permission>,
}

impl Container {
    /// Whether the current user administers this container
    pub fn is_admin(&self) -> bool {
        self.current_user_permissions.contains(&Permission::Admin)
    }

    /// Whether a draft may be attached to this container
    pub fn can_edit(&self) -> bool {
        self.is_admin() && !self.registration
    }

    /// Whether this container has no parent
    pub const fn is_top_level(&self) -> bool {
        self.parent_id.is_none()
    }
}

/// The preprint record being created or edited
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PublicationDraft {
    /// Identifier; `None` until first saved
    pub id: Option<String>,
    /// Title
    pub title: Option<String>,
    /// Abstract
    pub description: Option<String>,
    /// Tags
    #[serde(default)]
    pub tags: Vec<String>,
    /// DOI of the peer-reviewed article
    pub doi: Option<String>,
    /// Date of original publication
    pub original_publication_date: Option<NaiveDate>,
    /// License
    pub license: Option<License>,
    /// License year/holders
    pub license_record: Option<LicenseRecord>,
    /// Subject paths
    #[serde(default)]
    pub subjects: Vec<SubjectPath>,
    /// Primary file
    pub primary_file: Option<FileRef>,
    /// Container holding the primary file
    pub container_id: Option<String>,
    /// Provider the draft is submitted to
    pub provider_id: Option<String>,
    /// Published flag
    pub is_published: bool,
    /// Moderation review state
    #[serde(default)]
    pub reviews_state: ReviewsState,
}

/// Contributor listed on a container
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contributor {
    /// Contributor identifier
    pub id: String,
    /// Full name
    pub full_name: String,
    /// Email, for unregistered contributors
    pub email: Option<String>,
    /// Listed as an author
    pub bibliographic: bool,
}

/// Contributor to add to a container
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NewContributor {
    /// An existing user
    Registered {
        /// User identifier
        user_id: String,
    },
    /// Someone invited by email
    Unregistered {
        /// Full name
        full_name: String,
        /// Email address
        email: String,
    },
}

/// A registered user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// User identifier
    pub id: String,
    /// Full name
    pub full_name: String,
}

/// Trigger of a review action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionTrigger {
    /// Submit a draft into the moderation queue
    Submit,
}

/// Record representing the submission of a draft into moderation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewAction {
    /// Identifier; `None` until saved
    pub id: Option<String>,
    /// Trigger
    pub trigger: ActionTrigger,
    /// Draft the action targets
    pub target_id: String,
}

/// Request to withdraw a draft
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WithdrawalRequest {
    /// Draft to withdraw
    pub target_id: String,
    /// Explanation given by the authors
    pub comment: String,
}

/// One page of a paginated listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    /// Items on this page
    pub items: Vec<T>,
    /// Number of the next page, if any
    pub next: Option<u32>,
}

impl<T> Page<T> {
    /// A page with no successor
    pub const fn last(items: Vec<T>) -> Self {
        Self { items, next: None }
    }
}

/// Deployment branding (which provider-themed site the wizard runs in)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Branding {
    /// Running inside a provider-branded site
    pub is_provider: bool,
    /// Branded site is mounted under a provider sub-route
    pub is_sub_route: bool,
}
