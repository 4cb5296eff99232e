//! Transient wizard state: position, flags, flash timers, in-flight token

use crate::error::{Error, Result};
use crate::wizard::section::{Position, Section};
use crate::wizard::upload::ExistingStep;
use std::collections::HashMap;
use std::time::Duration;
use tokio::time::Instant;

/// How long a section shows its "changes saved" flash
pub const FLASH_DURATION: Duration = Duration::from_secs(3);

/// Creating a new draft or editing an existing one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// New submission
    #[default]
    Create,
    /// Editing an existing draft
    Edit,
}

impl Mode {
    /// Whether this is edit mode
    pub const fn is_edit(self) -> bool {
        matches!(self, Self::Edit)
    }
}

/// Flags and bookkeeping that are not part of any record
#[derive(Debug, Clone)]
pub struct WizardState {
    /// Current position
    pub position: Position,
    /// Create or edit
    pub mode: Mode,
    /// Upload lock; once set it never clears
    locked: bool,
    /// The user tried to submit with invalid sections
    pub attempted_submit: bool,
    /// The Provider section has been committed
    pub provider_saved: bool,
    /// Step inside the existing-project upload flow
    pub existing_step: ExistingStep,
    /// Mirror the draft license onto the container
    pub apply_license: bool,
    /// The container was created during this session
    pub new_container: bool,
    /// Upload or draft creation is running
    pub upload_in_progress: bool,
    /// Final submit button disabled
    pub submit_disabled: bool,
    /// Final submission succeeded
    pub preprint_saved: bool,
    saved_at: HashMap<Section, Instant>,
    in_flight: Option<String>,
}

impl WizardState {
    /// Fresh state positioned at `position`
    pub fn new(mode: Mode, position: Position) -> Self {
        Self {
            position,
            mode,
            locked: mode.is_edit(),
            attempted_submit: false,
            provider_saved: mode.is_edit(),
            existing_step: ExistingStep::default(),
            apply_license: false,
            new_container: false,
            upload_in_progress: false,
            submit_disabled: false,
            preprint_saved: false,
            saved_at: HashMap::new(),
            in_flight: None,
        }
    }

    /// Whether the upload is locked
    pub const fn is_locked(&self) -> bool {
        self.locked
    }

    /// Lock the upload; there is no way back
    pub fn lock(&mut self) {
        self.locked = true;
    }

    /// Mark `section` as just saved
    pub fn flash(&mut self, section: Section) {
        self.saved_at.insert(section, Instant::now());
    }

    /// Whether `section` is still showing its "saved" flash
    pub fn is_flashing(&self, section: Section) -> bool {
        self.saved_at
            .get(&section)
            .is_some_and(|at| at.elapsed() < FLASH_DURATION)
    }

    /// Name of the operation currently in flight
    pub fn in_flight(&self) -> Option<&str> {
        self.in_flight.as_deref()
    }

    /// Claim the in-flight token for `operation`
    pub fn begin(&mut self, operation: &str) -> Result<()> {
        if let Some(running) = &self.in_flight {
            return Err(Error::OperationInFlight(running.clone()));
        }
        self.in_flight = Some(operation.to_string());
        Ok(())
    }

    /// Release the in-flight token
    pub fn finish(&mut self) {
        self.in_flight = None;
    }
}
