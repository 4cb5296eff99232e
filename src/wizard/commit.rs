//! Section commits
//!
//! Each commit snapshots what it may mutate, applies only the changed
//! pending values, saves, and on failure restores the snapshot.

use super::Wizard;
use super::dirty;
use super::events::{Phase, track};
use super::messages::{Message, keys};
use super::pending::PendingUpload;
use super::section::Section;
use super::upload::{ConvertOrCopy, FileChoice, UploadAttempt, UploadState};
use super::validate::extract_doi;
use crate::error::{Error, Result};
use crate::types::{Container, FileRef, LicenseRecord, PublicationDraft};
use tracing::{debug, warn};

impl Wizard<'_> {
    pub(super) fn require_started(&self) -> Result<&str> {
        self.draft
            .id
            .as_deref()
            .ok_or_else(|| Error::InvalidTransition("the draft has not been started".to_string()))
    }

    // ==================== Provider ====================

    /// Commit the Provider section
    ///
    /// Loads the new provider's licenses, resets the pending license type
    /// to the first of them and discards pending subjects.
    pub async fn save_provider(&mut self) -> Result<()> {
        if self.state.is_locked() {
            return Err(Error::Locked);
        }
        let selected = self
            .pending
            .selected_provider
            .clone()
            .ok_or(Error::SectionInvalid(Section::Provider))?;
        let provider = self
            .providers
            .iter()
            .find(|p| p.id == selected)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("provider {selected}")))?;

        self.state.begin("save_provider")?;
        let licenses = super::load_licenses(self.store, &provider.id).await;
        self.state.finish();
        let licenses = licenses?;

        self.current_provider = provider;
        self.available_licenses = licenses;
        self.pending.basics.license.license_type = self.available_licenses.first().cloned();
        self.state.provider_saved = true;
        self.pending.subjects = self.draft.subjects.clone();
        self.advance(Section::Provider).await;

        track(
            "button",
            "click",
            &format!(
                "Submit - Save and continue, Select {} preprint service",
                self.current_provider.name
            ),
        );
        Ok(())
    }

    // ==================== Upload ====================

    /// Run the upload flow matching the pending choices
    pub async fn save_upload(&mut self) -> Result<()> {
        if self.state.is_locked() {
            return Err(Error::Locked);
        }
        match (
            self.pending.upload.state,
            self.pending.upload.convert_or_copy,
        ) {
            (UploadState::New, _) => self.upload_new_project().await,
            (UploadState::Existing, Some(ConvertOrCopy::Convert)) => self.convert_existing().await,
            (UploadState::Existing, Some(ConvertOrCopy::Copy)) => self.copy_into_component().await,
            _ => Err(Error::InvalidTransition(
                "choose a project and what to do with it first".to_string(),
            )),
        }
    }

    fn pending_title(&self) -> Result<String> {
        self.pending
            .upload
            .title
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(ToString::to_string)
            .ok_or_else(|| Error::Validation("a title is required".to_string()))
    }

    fn begin_upload(&mut self, operation: &str) -> Result<()> {
        if self.state.is_locked() {
            return Err(Error::Locked);
        }
        self.state.begin(operation)?;
        self.state.upload_in_progress = true;
        Ok(())
    }

    fn end_upload(&mut self) {
        self.state.upload_in_progress = false;
        self.state.finish();
    }

    async fn upload_file(&self, container_id: &str, upload: PendingUpload) -> Result<FileRef> {
        self.notifier.on_phase(Phase::UploadingFile).await;
        let PendingUpload { name, bytes } = upload;
        match self.files.upload(container_id, &name, bytes).await {
            Ok(file) => Ok(file),
            Err(e) => {
                self.notifier
                    .error(&Message::new(keys::ERROR_UPLOADING_FILE))
                    .await;
                Err(e)
            }
        }
    }

    /// New project: create a container, upload the staged file, start the draft
    ///
    /// A retry after a failure reuses the container and file it already made.
    pub async fn upload_new_project(&mut self) -> Result<()> {
        let title = self.pending_title()?;
        let upload = self
            .pending
            .upload
            .file_upload
            .clone()
            .ok_or_else(|| Error::Validation("choose a file to upload".to_string()))?;

        self.begin_upload("upload_new_project")?;
        let result = self.upload_new_project_inner(title, upload).await;
        self.end_upload();
        result
    }

    async fn upload_new_project_inner(&mut self, title: String, upload: PendingUpload) -> Result<()> {
        let container = if let Some(created) = self.reuse_created_container(&title).await? {
            created
        } else {
            self.notifier.on_phase(Phase::CreatingContainer).await;
            let created = match self.store.create_container(&title).await {
                Ok(c) => c,
                Err(e) => {
                    self.notifier
                        .error(&Message::new(keys::COULD_NOT_CREATE_PROJECT))
                        .await;
                    return Err(e);
                }
            };
            debug!(container = %created.id, "project created");
            self.attempt.container = Some(created.clone());
            created
        };

        let file = self.upload_once(&container.id, upload).await?;
        self.container = Some(container);
        self.draft.title = Some(title);
        self.start_draft(file, None).await?;
        self.state.new_container = true;
        Ok(())
    }

    /// Existing project, used as-is
    ///
    /// A staged file is uploaded into the container first. A changed title
    /// is saved to the container before the draft starts, and reverted if
    /// that save fails.
    pub async fn convert_existing(&mut self) -> Result<()> {
        let container = self
            .pending
            .upload
            .container
            .clone()
            .ok_or_else(|| Error::InvalidTransition("no project chosen".to_string()))?;
        let title = self.pending_title()?;

        self.begin_upload("convert_existing")?;
        let result = self.convert_existing_inner(container, title).await;
        self.end_upload();
        result
    }

    async fn convert_existing_inner(&mut self, container: Container, title: String) -> Result<()> {
        track(
            "button",
            "click",
            "Submit - Save and Continue, Existing Node Existing File",
        );

        let staged = if self.pending.upload.file_choice == FileChoice::New {
            self.pending.upload.file_upload.clone()
        } else {
            None
        };
        let file = match staged {
            Some(upload) => self.upload_once(&container.id, upload).await?,
            None => self
                .pending
                .upload
                .selected_file
                .clone()
                .ok_or_else(|| Error::Validation("choose a file first".to_string()))?,
        };

        // The chosen container keeps its title if the rename fails
        let container = self.retitle(container, &title).await?;

        self.container = Some(container);
        self.draft.title = Some(title);
        if self.abandoned_draft.is_some() {
            self.resume_abandoned_draft(file).await
        } else {
            self.start_draft(file, None).await
        }
    }

    /// Existing project, copied into a new child component
    ///
    /// A retry after a failure reuses the component and file it already made.
    pub async fn copy_into_component(&mut self) -> Result<()> {
        let parent = self
            .pending
            .upload
            .container
            .clone()
            .ok_or_else(|| Error::InvalidTransition("no project chosen".to_string()))?;
        let title = self.pending_title()?;

        self.begin_upload("copy_into_component")?;
        let result = self.copy_into_component_inner(parent, title).await;
        self.end_upload();
        result
    }

    async fn copy_into_component_inner(&mut self, parent: Container, title: String) -> Result<()> {
        track(
            "button",
            "click",
            "Submit - Save and Continue, New Component, Copy File",
        );

        let child = if let Some(created) = self.reuse_created_container(&title).await? {
            created
        } else {
            self.notifier.on_phase(Phase::CreatingContainer).await;
            let created = match self.store.create_child_container(&parent.id, &title).await {
                Ok(c) => c,
                Err(e) => {
                    self.notifier
                        .error(&Message::new(keys::COULD_NOT_CREATE_COMPONENT))
                        .await;
                    return Err(e);
                }
            };
            debug!(parent = %parent.id, child = %created.id, "component created");
            self.attempt.container = Some(created.clone());
            created
        };

        let file = if let Some(upload) = self.pending.upload.file_upload.clone() {
            self.upload_once(&child.id, upload).await?
        } else if let Some(copied) = self.attempt.file.clone() {
            copied
        } else {
            let source = self
                .pending
                .upload
                .selected_file
                .clone()
                .ok_or_else(|| Error::Validation("choose a file first".to_string()))?;
            self.notifier.on_phase(Phase::CopyingFile).await;
            let copied = match self.files.copy(&source, &child.id).await {
                Ok(f) => f,
                Err(e) => {
                    self.notifier
                        .error(&Message::new(keys::ERROR_COPYING_FILE))
                        .await;
                    return Err(e);
                }
            };
            self.attempt.file = Some(copied.clone());
            copied
        };

        self.pending.basics.abstract_text = child.description.clone();
        self.parent_container = Some(parent.clone());
        self.container = Some(child);
        self.draft.title = Some(title);
        if let Err(e) = self.load_parent_contributors().await {
            warn!("could not load parent contributors: {e}");
        }
        self.start_draft(file, Some(parent)).await?;
        self.state.apply_license = true;
        self.state.new_container = true;
        Ok(())
    }

    /// Container created by an earlier failed attempt, renamed to `title`
    async fn reuse_created_container(&mut self, title: &str) -> Result<Option<Container>> {
        let Some(created) = self.attempt.container.clone() else {
            return Ok(None);
        };
        debug!(container = %created.id, "reusing container from failed attempt");
        let created = self.retitle(created, title).await?;
        self.attempt.container = Some(created.clone());
        Ok(Some(created))
    }

    /// Save `title` onto `container` when it differs
    async fn retitle(&self, container: Container, title: &str) -> Result<Container> {
        if container.title == title {
            return Ok(container);
        }
        let mut renamed = container;
        renamed.title = title.to_string();
        match self.store.save_container(&renamed).await {
            Ok(saved) => Ok(saved),
            Err(e) => {
                self.notifier
                    .error(&Message::new(keys::COULD_NOT_UPDATE_TITLE))
                    .await;
                Err(e)
            }
        }
    }

    /// Upload the staged file unless an earlier attempt already did
    async fn upload_once(&mut self, container_id: &str, upload: PendingUpload) -> Result<FileRef> {
        if let Some(file) = self.attempt.file.clone() {
            return Ok(file);
        }
        let file = self.upload_file(container_id, upload).await?;
        self.attempt.file = Some(file.clone());
        Ok(file)
    }

    /// Delete the unpublished draft found on the container, then start fresh
    async fn resume_abandoned_draft(&mut self, file: FileRef) -> Result<()> {
        let Some(abandoned_id) = self.abandoned_draft.as_ref().and_then(|d| d.id.clone()) else {
            return self.start_draft(file, None).await;
        };
        if let Err(e) = self.store.destroy_draft(&abandoned_id).await {
            self.container = None;
            self.notifier
                .error(&self.document_message(keys::ABANDONED_PREPRINT_ERROR))
                .await;
            return Err(e);
        }
        debug!(draft = %abandoned_id, "abandoned draft removed");
        self.abandoned_draft = None;
        self.start_draft(file, None).await
    }

    /// Create the draft bound to the container, file and provider, then lock
    ///
    /// The staged file and any created container stay pending until this
    /// succeeds. On failure the committed container falls back to `parent`.
    async fn start_draft(&mut self, file: FileRef, parent: Option<Container>) -> Result<()> {
        let container = self
            .container
            .clone()
            .ok_or_else(|| Error::Internal("start_draft without a container".to_string()))?;
        if super::container_needs_license(&container) {
            self.state.apply_license = true;
        }

        let snapshot = self.draft.clone();
        self.draft.primary_file = Some(file);
        self.draft.container_id = Some(container.id.clone());
        self.draft.provider_id = Some(self.current_provider.id.clone());

        self.notifier.on_phase(Phase::StartingDraft).await;
        let saved = if self.draft.id.is_some() {
            self.store.save_draft(&self.draft).await
        } else {
            self.store.create_draft(&self.draft).await
        };

        match saved {
            Ok(draft) => {
                debug!(draft = ?draft.id, "draft started");
                self.draft = draft;
                self.attempt = UploadAttempt::default();
                self.pending.upload.state = UploadState::Existing;
                self.pending.upload.file_choice = FileChoice::New;
                self.pending.upload.file_upload = None;
                self.pending.upload.selected_file = self.draft.primary_file.clone();
                self.pending.upload.title = self.draft.title.clone();
                if self.pending.basics.abstract_text.is_none() {
                    self.pending.basics.abstract_text = container.description.clone();
                }
                self.notifier
                    .info(&self.document_message(keys::PREPRINT_FILE_UPLOADED))
                    .await;
                self.finish_upload().await;
                Ok(())
            }
            Err(e) => {
                self.draft = snapshot;
                self.state.upload_in_progress = false;
                self.container = parent;
                self.parent_container = None;
                self.notifier
                    .error(&self.document_message(keys::ERROR_INITIATING_PREPRINT))
                    .await;
                Err(e)
            }
        }
    }

    /// Lock the upload and move on; container and file are fixed from here
    async fn finish_upload(&mut self) {
        self.state.lock();
        self.pending.upload.file_upload = None;
        if let Err(e) = self.load_contributors().await {
            warn!("could not load contributors: {e}");
        }
        self.advance(Section::Upload).await;
    }

    // ==================== Discipline ====================

    /// Commit the Discipline section
    pub async fn save_subjects(&mut self) -> Result<()> {
        track(
            "button",
            "click",
            &format!("{} - Discipline Save and Continue", self.mode_label()),
        );
        if !self.valid(Section::Discipline) {
            return Err(Error::SectionInvalid(Section::Discipline));
        }
        self.require_started()?;
        if !self.changed(Section::Discipline) {
            self.advance(Section::Discipline).await;
            return Ok(());
        }

        self.state.begin("save_subjects")?;
        let snapshot = std::mem::replace(&mut self.draft.subjects, self.pending.subjects.clone());
        self.notifier
            .on_phase(Phase::SavingSection(Section::Discipline))
            .await;
        let result = self.store.save_draft(&self.draft).await;
        self.state.finish();

        match result {
            Ok(draft) => {
                self.draft = draft;
                self.pending.subjects = self.draft.subjects.clone();
                self.advance(Section::Discipline).await;
                Ok(())
            }
            Err(e) => {
                warn!("saving subjects failed: {e}");
                self.draft.subjects = snapshot;
                self.notifier
                    .error(&Message::new(keys::DISCIPLINES_ERROR))
                    .await;
                Err(e)
            }
        }
    }

    // ==================== Basics ====================

    /// Commit the Basics section
    ///
    /// Abstract and tags go to both draft and container; DOI, date and
    /// license go to the draft; the license is mirrored onto the container
    /// when requested. The container is saved first, then the draft.
    pub async fn save_basics(&mut self) -> Result<()> {
        track(
            "button",
            "click",
            &format!("{} - Save and Continue Basics Section", self.mode_label()),
        );
        if !self.valid(Section::Basics) {
            return Err(Error::SectionInvalid(Section::Basics));
        }
        self.require_started()?;
        let container = self
            .container
            .clone()
            .ok_or_else(|| Error::InvalidTransition("no project bound".to_string()))?;

        self.state.begin("save_basics")?;
        let result = self.save_basics_inner(container).await;
        self.state.finish();
        result
    }

    async fn save_basics_inner(&mut self, mut container: Container) -> Result<()> {
        let draft_snapshot = self.draft.clone();
        let container_snapshot = container.clone();
        let basics = &self.pending.basics;
        let mut draft = self.draft.clone();
        let holders = basics.license.holders();

        if dirty::abstract_changed(basics.abstract_text.as_deref(), draft.description.as_deref()) {
            let text = basics
                .abstract_text
                .as_deref()
                .map(|t| t.trim().to_string());
            draft.description.clone_from(&text);
            container.description = text;
        }

        if dirty::tags_changed(&basics.tags, &draft.tags) {
            draft.tags.clone_from(&basics.tags);
            container.tags.clone_from(&basics.tags);
        }

        if self.state.apply_license {
            if dirty::container_license_record_changed(&container, &basics.license) {
                container.license_record = Some(LicenseRecord {
                    year: basics.license.year.clone(),
                    copyright_holders: holders.clone(),
                });
            }
            if dirty::container_license_changed(&container, &basics.license) {
                container.license.clone_from(&basics.license.license_type);
            }
        }

        if dirty::doi_changed(basics.doi.as_deref(), draft.doi.as_deref()) {
            draft.doi = basics.doi.as_deref().and_then(extract_doi);
        }

        if dirty::original_publication_date_changed(
            basics.original_publication_date,
            draft.original_publication_date,
        ) {
            draft.original_publication_date = basics.original_publication_date;
        }

        if self.changed_license() || draft.license.is_none() {
            draft.license_record = Some(LicenseRecord {
                year: basics.license.year.clone(),
                copyright_holders: holders,
            });
            draft.license.clone_from(&basics.license.license_type);
            track(
                "dropdown",
                "select",
                &format!("{} - Edit License", self.mode_label()),
            );
        }

        self.notifier
            .on_phase(Phase::SavingSection(Section::Basics))
            .await;
        let saved = match self.store.save_container(&container).await {
            Ok(saved_container) => self
                .store
                .save_draft(&draft)
                .await
                .map(|saved_draft| (saved_container, saved_draft)),
            Err(e) => Err(e),
        };

        match saved {
            Ok((saved_container, saved_draft)) => {
                self.container = Some(saved_container);
                self.draft = saved_draft;
                self.pending.basics = self.committed_basics();
                self.advance(Section::Basics).await;
                Ok(())
            }
            Err(e) => {
                warn!("saving basics failed, rolling back: {e}");
                self.notifier
                    .error(&Message::new(keys::BASICS_ERROR))
                    .await;
                self.rollback(draft_snapshot, container_snapshot, e).await
            }
        }
    }

    fn changed_license(&self) -> bool {
        dirty::license_changed(
            &self.pending.basics.license,
            &self.draft,
            &self.available_licenses,
            self.current_year(),
        )
    }

    /// Restore the snapshots locally and push them back to the store
    async fn rollback(
        &mut self,
        draft: PublicationDraft,
        container: Container,
        original: Error,
    ) -> Result<()> {
        self.draft = draft;
        self.container = Some(container);
        self.notifier.on_phase(Phase::RollingBack).await;

        let Some(container) = self.container.as_ref() else {
            return Err(original);
        };
        let pushed = match self.store.save_container(container).await {
            Ok(_) => self.store.save_draft(&self.draft).await.map(|_| ()),
            Err(e) => Err(e),
        };

        match pushed {
            Ok(()) => Err(original),
            Err(rollback) => {
                warn!("rollback failed: {rollback}");
                self.notifier
                    .error(&Message::new(keys::ROLLBACK_FAILED))
                    .await;
                Err(Error::RollbackFailed {
                    original: original.to_string(),
                    rollback: rollback.to_string(),
                })
            }
        }
    }

    // ==================== Authors ====================

    /// Leave the Authors section
    pub async fn authors_next(&mut self) -> Result<()> {
        track(
            "button",
            "click",
            &format!("{} - Authors Next Button", self.mode_label()),
        );
        if !self.valid(Section::Authors) {
            return Err(Error::SectionInvalid(Section::Authors));
        }
        self.advance(Section::Authors).await;
        Ok(())
    }
}
