//! Pending-value edits and discards
//!
//! Nothing here talks to the store except [`Wizard::choose_container`],
//! which looks up drafts already attached to the chosen container.

use super::Wizard;
use super::events::track;
use super::pending::{PendingBasics, PendingLicense, PendingUpload};
use super::upload::{
    ClearLevel, ConvertOrCopy, ExistingStep, FileChoice, UploadAttempt, UploadState, clear_downstream,
};
use super::validate::extract_doi;
use crate::error::{Error, Result};
use crate::store::load_all;
use crate::types::{Container, FileRef, SubjectPath};
use chrono::NaiveDate;
use tracing::debug;

impl Wizard<'_> {
    fn ensure_unlocked(&self) -> Result<()> {
        if self.state.is_locked() {
            Err(Error::Locked)
        } else {
            Ok(())
        }
    }

    fn clear(&mut self, level: ClearLevel) {
        debug!(%level, "clearing downstream upload fields");
        clear_downstream(&mut self.pending.upload, level, self.state.is_locked());
    }

    // ==================== Provider ====================

    /// Pick a provider; committed by [`Wizard::save_provider`]
    pub fn select_provider(&mut self, provider_id: &str) -> Result<()> {
        self.ensure_unlocked()?;
        if !self.providers.iter().any(|p| p.id == provider_id) {
            return Err(Error::NotFound(format!("provider {provider_id}")));
        }
        self.pending.selected_provider = Some(provider_id.to_string());
        Ok(())
    }

    /// Revert the provider choice to the committed provider
    pub fn discard_provider(&mut self) {
        self.pending.selected_provider = Some(self.current_provider.id.clone());
    }

    // ==================== Upload ====================

    /// Choose between a new project and an existing one
    pub fn set_upload_state(&mut self, state: UploadState) -> Result<()> {
        self.ensure_unlocked()?;
        self.pending.upload.state = state;
        self.state.existing_step = ExistingStep::ChooseProject;
        self.clear(ClearLevel::AllUpload);
        self.attempt = UploadAttempt::default();

        let label = match state {
            UploadState::New => "Submit - Upload new preprint",
            UploadState::Existing => "Submit - Connect preprint to existing OSF Project",
            UploadState::Start => "Submit - Back Button, Upload Section",
        };
        track("button", "click", label);
        Ok(())
    }

    /// Load every container the user can access
    pub async fn load_user_containers(&mut self) -> Result<&[Container]> {
        let store = self.store;
        self.user_containers = load_all(move |page| store.user_containers(page)).await?;
        Ok(&self.user_containers)
    }

    /// Pick an existing container for the draft
    ///
    /// The user must administer it and it must not be a registration. An
    /// unpublished draft already attached to it is remembered so it can be
    /// replaced instead of duplicated.
    pub async fn choose_container(&mut self, container: Container) -> Result<()> {
        self.ensure_unlocked()?;
        if !container.can_edit() {
            return Err(Error::Validation(format!(
                "cannot attach a draft to '{}': admin permission on a non-registration project is required",
                container.title
            )));
        }

        let drafts = self.store.container_drafts(&container.id).await?;
        let provider_id = self.current_provider.id.as_str();
        self.abandoned_draft = drafts.into_iter().find(|d| {
            !d.is_published && d.provider_id.as_deref().is_none_or(|p| p == provider_id)
        });

        self.clear(ClearLevel::BelowNode);
        self.attempt = UploadAttempt::default();
        debug!(container = %container.id, abandoned = self.abandoned_draft.is_some(), "container chosen");
        self.pending.upload.container = Some(container);
        self.state.existing_step = ExistingStep::ChooseFile;
        Ok(())
    }

    /// Choose between an existing file and a new upload
    pub fn set_file_choice(&mut self, choice: FileChoice) -> Result<()> {
        self.ensure_unlocked()?;
        self.clear(ClearLevel::BelowNode);
        self.attempt.file = None;
        self.pending.upload.file_choice = choice;
        Ok(())
    }

    /// Pick a file already stored in the container
    pub fn select_existing_file(&mut self, file: FileRef) -> Result<()> {
        self.ensure_unlocked()?;
        self.clear(ClearLevel::BelowFile);
        self.attempt.file = None;
        self.pending.upload.file_upload = None;
        self.pending.upload.selected_file = Some(file);
        if self.pending.upload.state == UploadState::Existing {
            self.state.existing_step = ExistingStep::Organize;
        }
        Ok(())
    }

    /// Stage a file from disk for upload
    pub fn stage_file(&mut self, upload: PendingUpload) -> Result<()> {
        self.ensure_unlocked()?;
        self.clear(ClearLevel::BelowFile);
        self.attempt.file = None;
        self.pending.upload.selected_file = None;
        self.pending.upload.file_upload = Some(upload);
        if self.pending.upload.state == UploadState::Existing {
            self.state.existing_step = ExistingStep::Organize;
        }
        Ok(())
    }

    /// Use the container itself or copy into a new component
    ///
    /// Converting prefills the title with the container's title.
    pub fn set_convert_or_copy(&mut self, choice: ConvertOrCopy) -> Result<()> {
        self.ensure_unlocked()?;
        self.clear(ClearLevel::BelowConvertOrCopy);
        if self.pending.upload.convert_or_copy != Some(choice) {
            self.attempt = UploadAttempt::default();
        }
        self.pending.upload.convert_or_copy = Some(choice);
        if choice == ConvertOrCopy::Convert {
            self.pending.upload.title = self.pending.upload.container.as_ref().map(|c| c.title.clone());
        }
        self.state.existing_step = ExistingStep::Finalize;
        Ok(())
    }

    /// Edit the pending title
    pub fn set_title(&mut self, title: String) -> Result<()> {
        self.ensure_unlocked()?;
        self.pending.upload.title = Some(title);
        Ok(())
    }

    /// Restore the committed file and title
    pub fn discard_upload_changes(&mut self) {
        track(
            "button",
            "click",
            &format!("{} - Discard Upload Changes", self.mode_label()),
        );
        self.pending.upload.file_upload = None;
        self.pending.upload.selected_file = self.draft.primary_file.clone();
        self.pending.upload.title = self.draft.title.clone();
    }

    // ==================== Basics ====================

    /// Edit the abstract
    pub fn set_abstract(&mut self, text: String) {
        self.pending.basics.abstract_text = Some(text);
    }

    /// Append a tag
    pub fn add_tag(&mut self, tag: String) {
        track("input", "onchange", &format!("{} - Add Tag", self.mode_label()));
        self.pending.basics.tags.push(tag);
    }

    /// Remove the tag at `index`; out-of-range indexes are ignored
    pub fn remove_tag(&mut self, index: usize) {
        track("button", "click", &format!("{} - Remove Tag", self.mode_label()));
        if index < self.pending.basics.tags.len() {
            self.pending.basics.tags.remove(index);
        }
    }

    /// Edit the DOI text
    pub fn set_doi(&mut self, doi: String) {
        self.pending.basics.doi = Some(doi);
    }

    /// Replace the DOI text with the bare DOI it contains
    pub fn strip_doi(&mut self) {
        track("input", "onchange", &format!("{} - DOI Text Change", self.mode_label()));
        self.pending.basics.doi = self.pending.basics.doi.as_deref().and_then(extract_doi);
    }

    /// Edit the original publication date
    pub fn set_original_publication_date(&mut self, date: Option<NaiveDate>) {
        self.pending.basics.original_publication_date = date;
    }

    /// Edit the license
    pub fn set_license(&mut self, license: PendingLicense) {
        self.pending.basics.license = license;
    }

    /// Toggle writing the license to the container as well
    pub fn set_apply_license(&mut self, apply: bool) {
        track(
            "radio-button",
            "select",
            &format!("{} - Apply License: {apply}", self.mode_label()),
        );
        self.state.apply_license = apply;
    }

    /// Restore every Basics field to its committed value
    pub fn discard_basics(&mut self) {
        track(
            "button",
            "click",
            &format!("{} - Discard Basics Changes", self.mode_label()),
        );
        self.pending.basics = self.committed_basics();
    }

    /// Pending basics equal to the committed draft, with the default
    /// license filled in when none has been committed
    pub(super) fn committed_basics(&self) -> PendingBasics {
        let mut basics = PendingBasics::from_committed(&self.draft);
        if self.draft.license.is_none() {
            basics.license.license_type = self.available_licenses.first().cloned();
        }
        if self.draft.license_record.is_none() {
            basics.license.year = Some(self.current_year().to_string());
        }
        basics
    }

    // ==================== Discipline ====================

    /// Replace the pending subject paths
    pub fn set_subjects(&mut self, subjects: Vec<SubjectPath>) {
        self.pending.subjects = subjects;
    }

    /// Restore the committed subjects
    pub fn discard_subjects(&mut self) {
        track(
            "button",
            "click",
            &format!("{} - Discard Discipline Changes", self.mode_label()),
        );
        self.pending.subjects = self.draft.subjects.clone();
    }
}
