//! Submission wizard
//!
//! The [`Wizard`] owns the committed records, the pending (unsaved) edits
//! and the transient [`WizardState`]. Every `changed`/`valid` predicate is
//! recomputed from those on demand; nothing is cached.
//!
//! Navigation order is Provider → Upload → Discipline → Basics → Authors,
//! then the review position where the final submission happens.

mod commit;
mod contributors;
mod dirty;
mod events;
mod fields;
mod invite;
pub mod language;
mod messages;
mod pending;
mod section;
mod state;
mod submit;
mod upload;
mod validate;
mod withdraw;

pub use dirty::{
    abstract_changed, doi_changed, fix_special_char, license_changed, tags_changed,
    title_changed,
};
pub use events::{NoopNotifier, Notifier, Phase, track};
pub use invite::InviteForm;
pub use messages::{EnglishCatalog, Message, Translator, keys};
pub use pending::{
    PendingBasics, PendingFields, PendingLicense, PendingUpload, PendingUploadFields,
    split_holders,
};
pub use section::{Position, Section};
pub use state::{FLASH_DURATION, Mode, WizardState};
pub use submit::Destination;
pub use upload::{
    ClearLevel, ConvertOrCopy, ExistingStep, FileChoice, UploadAttempt, UploadState, clear_downstream,
};
pub use validate::{
    FieldCheck, FieldError, FieldIssue, extract_doi, validate_abstract, validate_doi,
    validate_email, validate_full_name, validate_license, validate_original_publication_date,
};
pub use withdraw::WithdrawalForm;

use crate::error::{Error, Result};
use crate::store::{FileTransfer, LICENSE_PAGE_SIZE, RecordStore, load_all};
use crate::types::{
    Branding, Container, Contributor, DEFAULT_PROVIDER_ID, FileRef, License, ModerationWorkflow,
    NewContributor, Provider, PublicationDraft, ReviewsState, SubjectPath, User,
};
use chrono::{Datelike, NaiveDate, Utc};
use tracing::debug;

/// A user intent the wizard can apply
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Open a section
    Open(Section),
    /// Pick a provider (pending)
    SelectProvider(String),
    /// Commit the Provider section
    SaveProvider,
    /// Revert the provider choice
    DiscardProvider,
    /// New project or existing project
    SetUploadState(UploadState),
    /// Pick an existing container
    ChooseContainer(Container),
    /// New file or existing file
    SetFileChoice(FileChoice),
    /// Pick a file already in the container
    SelectExistingFile(FileRef),
    /// Stage a file from disk
    StageFile(PendingUpload),
    /// Convert the container or copy into a component
    SetConvertOrCopy(ConvertOrCopy),
    /// Edit the title
    SetTitle(String),
    /// Run the upload flow matching the pending choices
    SaveUpload,
    /// Revert upload edits
    DiscardUploadChanges,
    /// Edit the abstract
    SetAbstract(String),
    /// Append a tag
    AddTag(String),
    /// Remove the tag at an index
    RemoveTag(usize),
    /// Edit the DOI
    SetDoi(String),
    /// Replace the DOI text with the bare DOI
    StripDoi,
    /// Edit the original publication date
    SetOriginalPublicationDate(Option<NaiveDate>),
    /// Edit the license
    SetLicense(PendingLicense),
    /// Toggle copying the license onto the container
    SetApplyLicense(bool),
    /// Commit the Basics section
    SaveBasics,
    /// Revert basics edits
    DiscardBasics,
    /// Replace the pending subjects
    SetSubjects(Vec<SubjectPath>),
    /// Commit the Discipline section
    SaveSubjects,
    /// Revert subject edits
    DiscardSubjects,
    /// Search users to add as contributors
    SearchContributors {
        /// Name query
        query: String,
        /// Result page
        page: u32,
    },
    /// Add a contributor
    AddContributor(NewContributor),
    /// Remove a contributor
    RemoveContributor(String),
    /// Leave the Authors section
    AuthorsNext,
    /// Press the final submit button
    ClickSubmit,
    /// Confirm the final submission
    SavePreprint,
    /// Resubmit a pending or rejected draft
    Resubmit,
}

/// Result of applying an [`Action`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Pending state updated, nothing saved
    Updated,
    /// A section was committed
    Saved(Section),
    /// The confirmation dialog should open
    Confirm,
    /// Submission blocked; validation errors should be shown
    ValidationErrors,
    /// Submission finished; go here next
    Submitted(Destination),
}

/// The submission wizard
pub struct Wizard<'a> {
    store: &'a dyn RecordStore,
    files: &'a dyn FileTransfer,
    notifier: &'a dyn Notifier,
    branding: Branding,
    today: NaiveDate,
    providers: Vec<Provider>,
    current_provider: Provider,
    available_licenses: Vec<License>,
    draft: PublicationDraft,
    container: Option<Container>,
    parent_container: Option<Container>,
    abandoned_draft: Option<PublicationDraft>,
    attempt: UploadAttempt,
    user_containers: Vec<Container>,
    contributors: Vec<Contributor>,
    parent_contributors: Vec<Contributor>,
    search_results: Vec<User>,
    pending: PendingFields,
    state: WizardState,
}

/// Default provider first, the rest in server order
pub fn order_providers(providers: Vec<Provider>) -> Vec<Provider> {
    let (mut ordered, rest): (Vec<_>, Vec<_>) =
        providers.into_iter().partition(Provider::is_default);
    ordered.extend(rest);
    ordered
}

/// License the user inherits when nothing has been committed
pub fn default_license(available: &[License], year: i32) -> PendingLicense {
    PendingLicense {
        license_type: available.first().cloned(),
        year: Some(year.to_string()),
        copyright_holders: String::new(),
    }
}

/// Whether a container's license should be overwritten by default
fn container_needs_license(container: &Container) -> bool {
    container
        .license
        .as_ref()
        .is_none_or(|l| l.name.contains("No license"))
}

async fn load_licenses(store: &dyn RecordStore, provider_id: &str) -> Result<Vec<License>> {
    debug!(provider = provider_id, page_size = LICENSE_PAGE_SIZE, "loading licenses");
    load_all(move |page| store.acceptable_licenses(provider_id, page)).await
}

impl<'a> Wizard<'a> {
    /// Start a new submission
    ///
    /// `provider_id` is the configured provider; branded deployments skip
    /// the Provider section and start at Upload.
    pub async fn new_submission(
        store: &'a dyn RecordStore,
        files: &'a dyn FileTransfer,
        notifier: &'a dyn Notifier,
        branding: Branding,
        provider_id: &str,
    ) -> Result<Self> {
        let providers = order_providers(store.find_providers().await?);
        let current_provider = providers
            .iter()
            .find(|p| p.id == provider_id)
            .or_else(|| providers.first())
            .cloned()
            .ok_or_else(|| Error::NotFound("no providers available".to_string()))?;
        let available_licenses = load_licenses(store, &current_provider.id).await?;

        let position = if branding.is_provider {
            Position::Section(Section::Upload)
        } else {
            Position::Section(Section::Provider)
        };
        let mut state = WizardState::new(Mode::Create, position);
        state.provider_saved = branding.is_provider;

        let today = Utc::now().date_naive();
        let draft = PublicationDraft::default();
        let mut pending = PendingFields::from_committed(&draft, None);
        pending.selected_provider = Some(current_provider.id.clone());
        pending.basics.license = default_license(&available_licenses, today.year());

        debug!(provider = %current_provider.id, branded = branding.is_provider, "new submission");
        Ok(Self {
            store,
            files,
            notifier,
            branding,
            today,
            providers,
            current_provider,
            available_licenses,
            draft,
            container: None,
            parent_container: None,
            abandoned_draft: None,
            attempt: UploadAttempt::default(),
            user_containers: Vec::new(),
            contributors: Vec::new(),
            parent_contributors: Vec::new(),
            search_results: Vec::new(),
            pending,
            state,
        })
    }

    /// Open an existing draft for editing
    ///
    /// The upload is locked from the start; editing begins at Discipline.
    pub async fn edit(
        store: &'a dyn RecordStore,
        files: &'a dyn FileTransfer,
        notifier: &'a dyn Notifier,
        branding: Branding,
        draft_id: &str,
    ) -> Result<Self> {
        let draft = store.reload_draft(draft_id).await?;
        let providers = order_providers(store.find_providers().await?);
        let provider_id = draft.provider_id.as_deref().unwrap_or(DEFAULT_PROVIDER_ID);
        let current_provider = providers
            .iter()
            .find(|p| p.id == provider_id)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("provider {provider_id}")))?;
        let container_id = draft
            .container_id
            .clone()
            .ok_or_else(|| Error::NotFound(format!("container of draft {draft_id}")))?;
        let container = store.find_container(&container_id).await?;
        let available_licenses = load_licenses(store, &current_provider.id).await?;

        let contributors = {
            let id: &str = &container.id;
            load_all(move |page| store.container_contributors(id, page)).await?
        };

        let today = Utc::now().date_naive();
        let mut pending = PendingFields::from_committed(&draft, Some(&container));
        if draft.license.is_none() {
            pending.basics.license = default_license(&available_licenses, today.year());
        }
        pending.upload.state = UploadState::Existing;
        pending.upload.file_choice = FileChoice::New;

        let mut state = WizardState::new(Mode::Edit, Position::Section(Section::Discipline));
        state.apply_license = container_needs_license(&container);

        debug!(draft = draft_id, provider = %current_provider.id, "editing draft");
        Ok(Self {
            store,
            files,
            notifier,
            branding,
            today,
            providers,
            current_provider,
            available_licenses,
            draft,
            container: Some(container),
            parent_container: None,
            abandoned_draft: None,
            attempt: UploadAttempt::default(),
            user_containers: Vec::new(),
            contributors,
            parent_contributors: Vec::new(),
            search_results: Vec::new(),
            pending,
            state,
        })
    }

    /// Override today's date (validation of the original publication date)
    #[must_use]
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = today;
        if self.draft.license.is_none() {
            self.pending.basics.license.year = Some(today.year().to_string());
        }
        self
    }

    // ==================== Accessors ====================

    /// Committed draft
    pub const fn draft(&self) -> &PublicationDraft {
        &self.draft
    }

    /// Committed container
    pub const fn container(&self) -> Option<&Container> {
        self.container.as_ref()
    }

    /// Parent of a freshly created component
    pub const fn parent_container(&self) -> Option<&Container> {
        self.parent_container.as_ref()
    }

    /// Unpublished draft found on the chosen container
    pub const fn abandoned_draft(&self) -> Option<&PublicationDraft> {
        self.abandoned_draft.as_ref()
    }

    /// Container and file left behind by a failed upload, reused on retry
    pub const fn upload_attempt(&self) -> &UploadAttempt {
        &self.attempt
    }

    /// Providers, default first
    pub fn providers(&self) -> &[Provider] {
        &self.providers
    }

    /// Committed provider
    pub const fn current_provider(&self) -> &Provider {
        &self.current_provider
    }

    /// Licenses the current provider accepts
    pub fn available_licenses(&self) -> &[License] {
        &self.available_licenses
    }

    /// Containers loaded by [`Self::load_user_containers`]
    pub fn user_containers(&self) -> &[Container] {
        &self.user_containers
    }

    /// Contributors of the container
    pub fn contributors(&self) -> &[Contributor] {
        &self.contributors
    }

    /// Contributors of the parent container
    pub fn parent_contributors(&self) -> &[Contributor] {
        &self.parent_contributors
    }

    /// Latest user search results
    pub fn search_results(&self) -> &[User] {
        &self.search_results
    }

    /// Pending edits
    pub const fn pending(&self) -> &PendingFields {
        &self.pending
    }

    /// Transient state
    pub const fn state(&self) -> &WizardState {
        &self.state
    }

    /// Deployment branding
    pub const fn branding(&self) -> Branding {
        self.branding
    }

    /// Moderation workflow of the current provider
    pub const fn moderation(&self) -> ModerationWorkflow {
        self.current_provider.moderation
    }

    /// Whether the wizard edits an existing draft
    pub const fn is_edit(&self) -> bool {
        self.state.mode.is_edit()
    }

    /// Whether the container has no parent
    pub fn is_top_level_container(&self) -> bool {
        self.container.as_ref().is_none_or(Container::is_top_level)
    }

    /// Release an in-flight token left behind by a dropped future
    pub fn abandon_operation(&mut self) {
        self.state.finish();
    }

    // ==================== Predicates ====================

    fn current_year(&self) -> i32 {
        self.today.year()
    }

    /// Whether a section has unsaved changes
    pub fn changed(&self, section: Section) -> bool {
        match section {
            Section::Provider => {
                self.pending.selected_provider.as_deref() != Some(self.current_provider.id.as_str())
            }
            Section::Upload => dirty::upload_changed(&self.pending.upload, &self.draft),
            Section::Discipline => {
                dirty::discipline_changed(&self.pending.subjects, &self.draft.subjects)
            }
            Section::Basics => dirty::basics_changed(
                &self.pending.basics,
                &self.draft,
                &self.available_licenses,
                self.current_year(),
            ),
            Section::Authors => false,
        }
    }

    /// Field errors of the pending Basics values
    pub fn basics_errors(&self) -> Vec<FieldError> {
        let basics = &self.pending.basics;
        [
            validate_abstract(basics.abstract_text.as_deref()),
            validate_doi(basics.doi.as_deref()),
            validate_original_publication_date(basics.original_publication_date, self.today),
            validate_license(&basics.license),
        ]
        .into_iter()
        .filter_map(std::result::Result::err)
        .collect()
    }

    /// Whether a section's pending values allow committing it
    pub fn valid(&self, section: Section) -> bool {
        match section {
            Section::Provider => self.pending.selected_provider.is_some(),
            Section::Upload => self.state.is_locked(),
            Section::Discipline => !self.pending.subjects.is_empty(),
            Section::Basics => self.basics_errors().is_empty(),
            Section::Authors => !self.contributors.is_empty(),
        }
    }

    /// Whether the committed records are complete enough to submit
    ///
    /// Only committed values count; pending edits never satisfy this.
    pub fn all_sections_valid(&self) -> bool {
        let draft = &self.draft;
        draft.title.as_deref().is_some_and(|t| !t.trim().is_empty())
            && draft.primary_file.is_some()
            && draft.description.as_deref().is_some_and(|d| !d.trim().is_empty())
            && !draft.subjects.is_empty()
            && !self.contributors.is_empty()
    }

    /// Whether a file is staged or selected
    pub const fn has_file(&self) -> bool {
        self.pending.upload.file_upload.is_some() || self.pending.upload.selected_file.is_some()
    }

    /// Whether leaving now would lose work
    pub fn has_dirty_fields(&self) -> bool {
        let started = if self.branding.is_provider {
            self.has_file()
        } else {
            self.state.provider_saved
        };
        !self.state.preprint_saved
            && ((!self.is_edit() && started)
                || self.changed(Section::Upload)
                || self.changed(Section::Basics)
                || self.changed(Section::Discipline))
    }

    /// Whether the draft can be sent back to moderation
    pub fn can_resubmit(&self) -> bool {
        self.moderation() == ModerationWorkflow::PreModeration
            && matches!(
                self.draft.reviews_state,
                ReviewsState::Pending | ReviewsState::Rejected
            )
    }

    /// Whether validation errors should be displayed now
    pub fn show_validation_errors(&self) -> bool {
        self.state.attempted_submit && !self.all_sections_valid()
    }

    /// Whether a section is showing its "changes saved" flash
    pub fn is_flashing(&self, section: Section) -> bool {
        self.state.is_flashing(section)
    }

    // ==================== Navigation ====================

    /// Open a section
    ///
    /// Before the upload is locked only Provider and Upload can be opened.
    pub fn open(&mut self, section: Section) -> Result<()> {
        let reachable = match section {
            Section::Provider => true,
            Section::Upload => self.state.provider_saved,
            _ => self.state.is_locked(),
        };
        if !reachable {
            return Err(Error::InvalidTransition(format!(
                "{section} is not reachable yet"
            )));
        }
        self.state.position = Position::Section(section);
        Ok(())
    }

    /// Commit succeeded: flash, notify and move on
    async fn advance(&mut self, section: Section) {
        self.state.flash(section);
        self.notifier.on_section_saved(section).await;
        self.state.position = Position::after(section);
        debug!(%section, position = %self.state.position, "section saved");
    }

    fn mode_label(&self) -> &'static str {
        events::mode_label(self.is_edit())
    }

    fn document_message(&self, key: &'static str) -> Message {
        Message::new(key).with("documentType", self.current_provider.document_type.clone())
    }

    // ==================== Reducer ====================

    /// Apply an action
    #[allow(clippy::too_many_lines)]
    pub async fn dispatch(&mut self, action: Action) -> Result<Outcome> {
        debug!(?action, "dispatch");
        match action {
            Action::Open(section) => self.open(section)?,
            Action::SelectProvider(id) => self.select_provider(&id)?,
            Action::SaveProvider => {
                self.save_provider().await?;
                return Ok(Outcome::Saved(Section::Provider));
            }
            Action::DiscardProvider => self.discard_provider(),
            Action::SetUploadState(state) => self.set_upload_state(state)?,
            Action::ChooseContainer(container) => self.choose_container(container).await?,
            Action::SetFileChoice(choice) => self.set_file_choice(choice)?,
            Action::SelectExistingFile(file) => self.select_existing_file(file)?,
            Action::StageFile(upload) => self.stage_file(upload)?,
            Action::SetConvertOrCopy(choice) => self.set_convert_or_copy(choice)?,
            Action::SetTitle(title) => self.set_title(title)?,
            Action::SaveUpload => {
                self.save_upload().await?;
                return Ok(Outcome::Saved(Section::Upload));
            }
            Action::DiscardUploadChanges => self.discard_upload_changes(),
            Action::SetAbstract(text) => self.set_abstract(text),
            Action::AddTag(tag) => self.add_tag(tag),
            Action::RemoveTag(index) => self.remove_tag(index),
            Action::SetDoi(doi) => self.set_doi(doi),
            Action::StripDoi => self.strip_doi(),
            Action::SetOriginalPublicationDate(date) => self.set_original_publication_date(date),
            Action::SetLicense(license) => self.set_license(license),
            Action::SetApplyLicense(apply) => self.set_apply_license(apply),
            Action::SaveBasics => {
                self.save_basics().await?;
                return Ok(Outcome::Saved(Section::Basics));
            }
            Action::DiscardBasics => self.discard_basics(),
            Action::SetSubjects(subjects) => self.set_subjects(subjects),
            Action::SaveSubjects => {
                self.save_subjects().await?;
                return Ok(Outcome::Saved(Section::Discipline));
            }
            Action::DiscardSubjects => self.discard_subjects(),
            Action::SearchContributors { query, page } => {
                self.search_contributors(&query, page).await?;
            }
            Action::AddContributor(contributor) => self.add_contributor(&contributor).await?,
            Action::RemoveContributor(id) => self.remove_contributor(&id).await?,
            Action::AuthorsNext => {
                self.authors_next().await?;
                return Ok(Outcome::Saved(Section::Authors));
            }
            Action::ClickSubmit => {
                return Ok(if self.click_submit() {
                    Outcome::Confirm
                } else {
                    Outcome::ValidationErrors
                });
            }
            Action::SavePreprint => return Ok(Outcome::Submitted(self.save_preprint().await?)),
            Action::Resubmit => return Ok(Outcome::Submitted(self.resubmit().await?)),
        }
        Ok(Outcome::Updated)
    }
}
