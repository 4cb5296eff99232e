//! Record persistence and file transfer
//!
//! The wizard never talks HTTP directly; it goes through these traits so
//! the same commit logic runs against the REST backend or a test mock.

mod http;
mod paginate;

pub use http::HttpRecordStore;
pub use paginate::{load_all, paginate};

use crate::error::Result;
use crate::types::{
    Container, Contributor, FileRef, License, NewContributor, Page, Provider, PublicationDraft,
    ReviewAction, Subject, User, WithdrawalRequest,
};
use async_trait::async_trait;

/// Page size used when listing a provider's accepted licenses
pub const LICENSE_PAGE_SIZE: u32 = 20;

/// Remote record store
///
/// Every method is one request/response round trip. Saves return the
/// server's representation of the record, which replaces the caller's
/// committed copy.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// All providers
    async fn find_providers(&self) -> Result<Vec<Provider>>;

    /// One page of licenses accepted by a provider
    async fn acceptable_licenses(&self, provider_id: &str, page: u32) -> Result<Page<License>>;

    /// One page of a provider's top-level subjects
    async fn top_level_subjects(&self, provider_id: &str, page: u32) -> Result<Page<Subject>>;

    /// Create a draft (first save)
    async fn create_draft(&self, draft: &PublicationDraft) -> Result<PublicationDraft>;

    /// Save an existing draft
    async fn save_draft(&self, draft: &PublicationDraft) -> Result<PublicationDraft>;

    /// Re-fetch a draft
    async fn reload_draft(&self, draft_id: &str) -> Result<PublicationDraft>;

    /// Delete a draft
    async fn destroy_draft(&self, draft_id: &str) -> Result<()>;

    /// Fetch a container
    async fn find_container(&self, container_id: &str) -> Result<Container>;

    /// Create a top-level container
    async fn create_container(&self, title: &str) -> Result<Container>;

    /// Create a child container under `parent_id`
    async fn create_child_container(&self, parent_id: &str, title: &str) -> Result<Container>;

    /// Save a container
    async fn save_container(&self, container: &Container) -> Result<Container>;

    /// Drafts attached to a container
    async fn container_drafts(&self, container_id: &str) -> Result<Vec<PublicationDraft>>;

    /// One page of a container's contributors
    async fn container_contributors(&self, container_id: &str, page: u32)
    -> Result<Page<Contributor>>;

    /// Add a contributor to a container
    async fn add_contributor(
        &self,
        container_id: &str,
        contributor: &NewContributor,
    ) -> Result<Contributor>;

    /// Remove a contributor from a container
    async fn remove_contributor(&self, container_id: &str, contributor_id: &str) -> Result<()>;

    /// One page of containers the current user can access
    async fn user_containers(&self, page: u32) -> Result<Page<Container>>;

    /// One page of users matching a name query
    async fn search_users(&self, query: &str, page: u32) -> Result<Page<User>>;

    /// Save a review action
    async fn save_review_action(&self, action: &ReviewAction) -> Result<ReviewAction>;

    /// Save a withdrawal request
    async fn save_withdrawal_request(&self, request: &WithdrawalRequest) -> Result<()>;
}

/// File storage operations
#[async_trait]
pub trait FileTransfer: Send + Sync {
    /// Upload a new file into a container's storage
    async fn upload(&self, container_id: &str, name: &str, bytes: Vec<u8>) -> Result<FileRef>;

    /// Copy a file into another container's storage
    async fn copy(&self, file: &FileRef, destination_container_id: &str) -> Result<FileRef>;
}
