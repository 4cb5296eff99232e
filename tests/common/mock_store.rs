//! Mock record store and notifier for testing
//!
//! These are test utilities - not all may be used in current tests but are
//! available for future test development.

#![allow(dead_code)]

use async_trait::async_trait;
use preprint_submit::error::{Error, Result};
use preprint_submit::store::{FileTransfer, RecordStore};
use preprint_submit::types::{
    Container, Contributor, FileRef, License, NewContributor, Page, Permission, Provider,
    PublicationDraft, ReviewAction, ReviewsState, Subject, User, WithdrawalRequest,
};
use preprint_submit::wizard::{Message, Notifier, Phase, Section};
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

/// Licenses are served this many per page so pagination is exercised
const LICENSES_PER_PAGE: usize = 2;

/// Contributor every new container starts with
pub const CREATOR_ID: &str = "creator";

/// A recorded write
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    CreateContainer(String),
    CreateChildContainer { parent: String, title: String },
    SaveContainer(Container),
    CreateDraft(PublicationDraft),
    SaveDraft(PublicationDraft),
    DestroyDraft(String),
    Upload { container: String, name: String },
    Copy { file: String, container: String },
    AddContributor(NewContributor),
    RemoveContributor(String),
    SaveReviewAction(ReviewAction),
    SaveWithdrawal(WithdrawalRequest),
}

impl Call {
    /// Short name used in order assertions
    pub const fn name(&self) -> &'static str {
        match self {
            Self::CreateContainer(_) => "create_container",
            Self::CreateChildContainer { .. } => "create_child_container",
            Self::SaveContainer(_) => "save_container",
            Self::CreateDraft(_) => "create_draft",
            Self::SaveDraft(_) => "save_draft",
            Self::DestroyDraft(_) => "destroy_draft",
            Self::Upload { .. } => "upload",
            Self::Copy { .. } => "copy",
            Self::AddContributor(_) => "add_contributor",
            Self::RemoveContributor(_) => "remove_contributor",
            Self::SaveReviewAction(_) => "save_review_action",
            Self::SaveWithdrawal(_) => "save_withdrawal_request",
        }
    }
}

/// In-memory record store
///
/// This manually implements `RecordStore` and `FileTransfer` rather than
/// using a mocking crate, so the store keeps real state between calls.
///
/// Features:
/// - Auto-incrementing ids
/// - Write tracking for order verification
/// - Scripted failures per operation
pub struct MockStore {
    next_id: AtomicU64,
    providers: Mutex<Vec<Provider>>,
    licenses: Mutex<HashMap<String, Vec<License>>>,
    subjects: Mutex<HashMap<String, Vec<Subject>>>,
    drafts: Mutex<HashMap<String, PublicationDraft>>,
    containers: Mutex<HashMap<String, Container>>,
    contributors: Mutex<HashMap<String, Vec<Contributor>>>,
    users: Mutex<Vec<User>>,
    calls: Mutex<Vec<Call>>,
    failures: Mutex<HashMap<&'static str, VecDeque<bool>>>,
}

impl MockStore {
    /// Empty store
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            providers: Mutex::new(Vec::new()),
            licenses: Mutex::new(HashMap::new()),
            subjects: Mutex::new(HashMap::new()),
            drafts: Mutex::new(HashMap::new()),
            containers: Mutex::new(HashMap::new()),
            contributors: Mutex::new(HashMap::new()),
            users: Mutex::new(Vec::new()),
            calls: Mutex::new(Vec::new()),
            failures: Mutex::new(HashMap::new()),
        }
    }

    fn id(&self, prefix: &str) -> String {
        format!("{prefix}{}", self.next_id.fetch_add(1, Ordering::SeqCst))
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn check(&self, op: &'static str) -> Result<()> {
        let mut failures = self.failures.lock().unwrap();
        let fail = failures
            .get_mut(op)
            .and_then(VecDeque::pop_front)
            .unwrap_or(false);
        if fail {
            Err(Error::Store(format!("{op} failed")))
        } else {
            Ok(())
        }
    }

    // === Seeding ===

    pub fn add_provider(&self, provider: Provider, licenses: Vec<License>) {
        self.licenses
            .lock()
            .unwrap()
            .insert(provider.id.clone(), licenses);
        self.providers.lock().unwrap().push(provider);
    }

    pub fn set_subjects(&self, provider_id: &str, subjects: Vec<Subject>) {
        self.subjects
            .lock()
            .unwrap()
            .insert(provider_id.to_string(), subjects);
    }

    pub fn insert_container(&self, container: Container) {
        self.contributors.lock().unwrap().insert(
            container.id.clone(),
            vec![super::fixtures::contributor(CREATOR_ID, "Ada Lovelace")],
        );
        self.containers
            .lock()
            .unwrap()
            .insert(container.id.clone(), container);
    }

    pub fn insert_draft(&self, draft: PublicationDraft) {
        let id = draft.id.clone().expect("seeded drafts need an id");
        self.drafts.lock().unwrap().insert(id, draft);
    }

    pub fn add_user(&self, user: User) {
        self.users.lock().unwrap().push(user);
    }

    // === Error injection ===

    /// Fail the next call of `op`
    pub fn fail_next(&self, op: &'static str) {
        self.script(op, &[true]);
    }

    /// Succeed or fail the next calls of `op` in order
    pub fn script(&self, op: &'static str, outcomes: &[bool]) {
        self.failures
            .lock()
            .unwrap()
            .entry(op)
            .or_default()
            .extend(outcomes.iter().copied());
    }

    // === Call verification ===

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_names(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().iter().map(Call::name).collect()
    }

    /// Names of calls recorded after the first `skip`
    pub fn call_names_since(&self, skip: usize) -> Vec<&'static str> {
        self.call_names().into_iter().skip(skip).collect()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn stored_draft(&self, id: &str) -> Option<PublicationDraft> {
        self.drafts.lock().unwrap().get(id).cloned()
    }

    pub fn stored_container(&self, id: &str) -> Option<Container> {
        self.containers.lock().unwrap().get(id).cloned()
    }
}

impl Default for MockStore {
    fn default() -> Self {
        Self::new()
    }
}

fn admin_container(id: String, title: &str, parent_id: Option<String>) -> Container {
    Container {
        id,
        title: title.to_string(),
        parent_id,
        current_user_permissions: vec![Permission::Read, Permission::Write, Permission::Admin],
        ..Container::default()
    }
}

#[async_trait]
impl RecordStore for MockStore {
    async fn find_providers(&self) -> Result<Vec<Provider>> {
        self.check("find_providers")?;
        Ok(self.providers.lock().unwrap().clone())
    }

    async fn acceptable_licenses(&self, provider_id: &str, page: u32) -> Result<Page<License>> {
        self.check("acceptable_licenses")?;
        let licenses = self.licenses.lock().unwrap();
        let all = licenses.get(provider_id).cloned().unwrap_or_default();
        let start = (page as usize - 1) * LICENSES_PER_PAGE;
        let items: Vec<_> = all.iter().skip(start).take(LICENSES_PER_PAGE).cloned().collect();
        let next = (start + LICENSES_PER_PAGE < all.len()).then_some(page + 1);
        Ok(Page { items, next })
    }

    async fn top_level_subjects(&self, provider_id: &str, _page: u32) -> Result<Page<Subject>> {
        self.check("top_level_subjects")?;
        let subjects = self.subjects.lock().unwrap();
        Ok(Page::last(subjects.get(provider_id).cloned().unwrap_or_default()))
    }

    async fn create_draft(&self, draft: &PublicationDraft) -> Result<PublicationDraft> {
        self.record(Call::CreateDraft(draft.clone()));
        self.check("create_draft")?;
        let mut created = draft.clone();
        let id = self.id("draft");
        created.id = Some(id.clone());
        self.drafts.lock().unwrap().insert(id, created.clone());
        Ok(created)
    }

    async fn save_draft(&self, draft: &PublicationDraft) -> Result<PublicationDraft> {
        self.record(Call::SaveDraft(draft.clone()));
        self.check("save_draft")?;
        let id = draft
            .id
            .clone()
            .ok_or_else(|| Error::Store("draft has no id".to_string()))?;
        self.drafts.lock().unwrap().insert(id, draft.clone());
        Ok(draft.clone())
    }

    async fn reload_draft(&self, draft_id: &str) -> Result<PublicationDraft> {
        self.check("reload_draft")?;
        self.drafts
            .lock()
            .unwrap()
            .get(draft_id)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("draft {draft_id}")))
    }

    async fn destroy_draft(&self, draft_id: &str) -> Result<()> {
        self.record(Call::DestroyDraft(draft_id.to_string()));
        self.check("destroy_draft")?;
        self.drafts.lock().unwrap().remove(draft_id);
        Ok(())
    }

    async fn find_container(&self, container_id: &str) -> Result<Container> {
        self.check("find_container")?;
        self.containers
            .lock()
            .unwrap()
            .get(container_id)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("container {container_id}")))
    }

    async fn create_container(&self, title: &str) -> Result<Container> {
        self.record(Call::CreateContainer(title.to_string()));
        self.check("create_container")?;
        let container = admin_container(self.id("node"), title, None);
        self.insert_container(container.clone());
        Ok(container)
    }

    async fn create_child_container(&self, parent_id: &str, title: &str) -> Result<Container> {
        self.record(Call::CreateChildContainer {
            parent: parent_id.to_string(),
            title: title.to_string(),
        });
        self.check("create_child_container")?;
        let container = admin_container(self.id("node"), title, Some(parent_id.to_string()));
        self.insert_container(container.clone());
        Ok(container)
    }

    async fn save_container(&self, container: &Container) -> Result<Container> {
        self.record(Call::SaveContainer(container.clone()));
        self.check("save_container")?;
        self.containers
            .lock()
            .unwrap()
            .insert(container.id.clone(), container.clone());
        Ok(container.clone())
    }

    async fn container_drafts(&self, container_id: &str) -> Result<Vec<PublicationDraft>> {
        self.check("container_drafts")?;
        Ok(self
            .drafts
            .lock()
            .unwrap()
            .values()
            .filter(|d| d.container_id.as_deref() == Some(container_id))
            .cloned()
            .collect())
    }

    async fn container_contributors(
        &self,
        container_id: &str,
        _page: u32,
    ) -> Result<Page<Contributor>> {
        self.check("container_contributors")?;
        let contributors = self.contributors.lock().unwrap();
        Ok(Page::last(
            contributors.get(container_id).cloned().unwrap_or_default(),
        ))
    }

    async fn add_contributor(
        &self,
        container_id: &str,
        contributor: &NewContributor,
    ) -> Result<Contributor> {
        self.record(Call::AddContributor(contributor.clone()));
        self.check("add_contributor")?;
        let added = match contributor {
            NewContributor::Registered { user_id } => Contributor {
                id: format!("{container_id}-{user_id}"),
                full_name: self
                    .users
                    .lock()
                    .unwrap()
                    .iter()
                    .find(|u| &u.id == user_id)
                    .map(|u| u.full_name.clone())
                    .unwrap_or_default(),
                email: None,
                bibliographic: true,
            },
            NewContributor::Unregistered { full_name, email } => Contributor {
                id: self.id("contrib"),
                full_name: full_name.clone(),
                email: Some(email.clone()),
                bibliographic: true,
            },
        };
        self.contributors
            .lock()
            .unwrap()
            .entry(container_id.to_string())
            .or_default()
            .push(added.clone());
        Ok(added)
    }

    async fn remove_contributor(&self, container_id: &str, contributor_id: &str) -> Result<()> {
        self.record(Call::RemoveContributor(contributor_id.to_string()));
        self.check("remove_contributor")?;
        if let Some(list) = self.contributors.lock().unwrap().get_mut(container_id) {
            list.retain(|c| c.id != contributor_id);
        }
        Ok(())
    }

    async fn user_containers(&self, _page: u32) -> Result<Page<Container>> {
        self.check("user_containers")?;
        Ok(Page::last(
            self.containers.lock().unwrap().values().cloned().collect(),
        ))
    }

    async fn search_users(&self, query: &str, _page: u32) -> Result<Page<User>> {
        self.check("search_users")?;
        let query = query.to_lowercase();
        Ok(Page::last(
            self.users
                .lock()
                .unwrap()
                .iter()
                .filter(|u| u.full_name.to_lowercase().contains(&query))
                .cloned()
                .collect(),
        ))
    }

    async fn save_review_action(&self, action: &ReviewAction) -> Result<ReviewAction> {
        self.record(Call::SaveReviewAction(action.clone()));
        self.check("save_review_action")?;
        if let Some(draft) = self.drafts.lock().unwrap().get_mut(&action.target_id) {
            draft.reviews_state = ReviewsState::Pending;
        }
        Ok(ReviewAction {
            id: Some(self.id("action")),
            ..action.clone()
        })
    }

    async fn save_withdrawal_request(&self, request: &WithdrawalRequest) -> Result<()> {
        self.record(Call::SaveWithdrawal(request.clone()));
        self.check("save_withdrawal_request")
    }
}

#[async_trait]
impl FileTransfer for MockStore {
    async fn upload(&self, container_id: &str, name: &str, _bytes: Vec<u8>) -> Result<FileRef> {
        self.record(Call::Upload {
            container: container_id.to_string(),
            name: name.to_string(),
        });
        self.check("upload")?;
        Ok(FileRef {
            id: self.id("file"),
            name: name.to_string(),
        })
    }

    async fn copy(&self, file: &FileRef, destination_container_id: &str) -> Result<FileRef> {
        self.record(Call::Copy {
            file: file.id.clone(),
            container: destination_container_id.to_string(),
        });
        self.check("copy")?;
        Ok(FileRef {
            id: self.id("file"),
            name: file.name.clone(),
        })
    }
}

/// A recorded notification
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Note {
    SectionSaved(Section),
    Phase(Phase),
    Info(&'static str),
    Success(&'static str),
    Error(&'static str),
}

/// Notifier that records every call
#[derive(Default)]
pub struct RecordingNotifier {
    notes: Mutex<Vec<Note>>,
}

impl RecordingNotifier {
    pub fn notes(&self) -> Vec<Note> {
        self.notes.lock().unwrap().clone()
    }

    /// Message keys passed to `error`
    pub fn errors(&self) -> Vec<&'static str> {
        self.notes()
            .into_iter()
            .filter_map(|n| match n {
                Note::Error(key) => Some(key),
                _ => None,
            })
            .collect()
    }

    /// Message keys passed to `success`
    pub fn successes(&self) -> Vec<&'static str> {
        self.notes()
            .into_iter()
            .filter_map(|n| match n {
                Note::Success(key) => Some(key),
                _ => None,
            })
            .collect()
    }

    pub fn sections_saved(&self) -> Vec<Section> {
        self.notes()
            .into_iter()
            .filter_map(|n| match n {
                Note::SectionSaved(section) => Some(section),
                _ => None,
            })
            .collect()
    }

    fn push(&self, note: Note) {
        self.notes.lock().unwrap().push(note);
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn on_section_saved(&self, section: Section) {
        self.push(Note::SectionSaved(section));
    }

    async fn on_phase(&self, phase: Phase) {
        self.push(Note::Phase(phase));
    }

    async fn info(&self, message: &Message) {
        self.push(Note::Info(message.key));
    }

    async fn success(&self, message: &Message) {
        self.push(Note::Success(message.key));
    }

    async fn error(&self, message: &Message) {
        self.push(Note::Error(message.key));
    }
}
