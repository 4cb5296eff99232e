//! Test data factories for preprint-submit types
//!
//! These are test utilities - not all may be used in current tests but are
//! available for future test development.

#![allow(dead_code)]

use super::mock_store::MockStore;
use chrono::NaiveDate;
use preprint_submit::types::{
    Container, Contributor, FileRef, License, ModerationWorkflow, Permission, Provider,
    PublicationDraft, ReviewsState, Subject, User,
};
use preprint_submit::wizard::PendingUpload;

/// Abstract long enough to pass validation
pub const ABSTRACT: &str = "We revisit the seven bridges of Königsberg with new data.";

/// Fixed "today" for date validation
pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
}

/// Create a provider with the given workflow
pub fn make_provider(id: &str, moderation: ModerationWorkflow) -> Provider {
    Provider {
        id: id.to_string(),
        name: format!("{id} preprints"),
        moderation,
        document_type: "preprint".to_string(),
        domain: None,
        domain_redirect_enabled: false,
    }
}

/// Create a license
pub fn make_license(id: &str, name: &str, required: &[&str]) -> License {
    License {
        id: id.to_string(),
        name: name.to_string(),
        required_fields: required.iter().map(ToString::to_string).collect(),
    }
}

/// Licenses accepted by every seeded provider
pub fn licenses() -> Vec<License> {
    vec![
        make_license("cc0", "CC0 1.0 Universal", &[]),
        make_license("ccby", "CC-By Attribution 4.0 International", &[]),
        make_license("mit", "MIT License", &["year", "copyrightHolders"]),
    ]
}

/// Create a contributor
pub fn contributor(id: &str, full_name: &str) -> Contributor {
    Contributor {
        id: id.to_string(),
        full_name: full_name.to_string(),
        email: None,
        bibliographic: true,
    }
}

/// Create a container the current user administers
pub fn make_container(id: &str, title: &str) -> Container {
    Container {
        id: id.to_string(),
        title: title.to_string(),
        description: Some("Existing project description.".to_string()),
        current_user_permissions: vec![Permission::Read, Permission::Write, Permission::Admin],
        ..Container::default()
    }
}

/// Create a draft bound to a container and provider
pub fn make_draft(id: &str, container_id: &str, provider_id: &str) -> PublicationDraft {
    PublicationDraft {
        id: Some(id.to_string()),
        title: Some("Seven bridges".to_string()),
        description: Some(ABSTRACT.to_string()),
        subjects: vec![vec!["eng".to_string()]],
        primary_file: Some(FileRef {
            id: "file-existing".to_string(),
            name: "paper.pdf".to_string(),
        }),
        container_id: Some(container_id.to_string()),
        provider_id: Some(provider_id.to_string()),
        license: Some(licenses()[0].clone()),
        ..PublicationDraft::default()
    }
}

/// Create a draft in a given review state
pub fn make_reviewed_draft(
    id: &str,
    container_id: &str,
    provider_id: &str,
    state: ReviewsState,
) -> PublicationDraft {
    PublicationDraft {
        reviews_state: state,
        is_published: state == ReviewsState::Accepted,
        ..make_draft(id, container_id, provider_id)
    }
}

/// A staged file
pub fn pdf() -> PendingUpload {
    PendingUpload {
        name: "paper.pdf".to_string(),
        bytes: b"%PDF-1.7".to_vec(),
    }
}

/// Create a user
pub fn make_user(id: &str, full_name: &str) -> User {
    User {
        id: id.to_string(),
        full_name: full_name.to_string(),
    }
}

/// Store seeded with an unmoderated default provider, a pre-moderated and
/// a post-moderated provider, and a few subjects
pub fn seeded_store() -> MockStore {
    let store = MockStore::new();
    store.add_provider(make_provider("osf", ModerationWorkflow::None), licenses());
    store.add_provider(
        make_provider("engrxiv", ModerationWorkflow::PreModeration),
        licenses(),
    );
    store.add_provider(
        make_provider("psyarxiv", ModerationWorkflow::PostModeration),
        licenses()[1..].to_vec(),
    );
    store.set_subjects(
        "osf",
        vec![
            Subject {
                id: "soc".to_string(),
                text: "Social and Behavioral Sciences".to_string(),
            },
            Subject {
                id: "eng".to_string(),
                text: "Engineering".to_string(),
            },
        ],
    );
    store.add_user(make_user("u-grace", "Grace Hopper"));
    store
}
