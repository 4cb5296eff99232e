//! preprint-submit - Preprint submission wizard
//!
//! Library for staging preprint edits against a remote record store,
//! committing them one wizard section at a time, and publishing the
//! result according to the provider's moderation workflow.
//!
//! The [`wizard::Wizard`] owns all transient state. Collaborators
//! (persistence, file transfer, notifications) are traits so the same
//! wizard can run behind the CLI, a server, or a test mock.

pub mod auth;
pub mod config;
pub mod error;
pub mod manifest;
pub mod store;
pub mod taxonomy;
pub mod types;
pub mod wizard;
