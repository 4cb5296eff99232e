//! Terminal notifier with styled output and a phase spinner

use crate::cli::style::{Stylize, check, cross, phase_line, saved_line, spinner_style};
use anstream::{eprintln, println};
use async_trait::async_trait;
use indicatif::ProgressBar;
use preprint_submit::wizard::{Message, Notifier, Phase, Section};
use std::time::Duration;

/// Prints wizard notifications; long phases show a spinner
pub struct CliNotifier {
    spinner: ProgressBar,
    verbose: bool,
}

impl CliNotifier {
    /// Notifier printing every phase on its own line
    pub fn verbose() -> Self {
        Self {
            spinner: ProgressBar::hidden(),
            verbose: true,
        }
    }

    /// Notifier showing phases on a single spinner line
    pub fn compact() -> Self {
        let spinner = ProgressBar::new_spinner().with_style(spinner_style());
        spinner.enable_steady_tick(Duration::from_millis(80));
        Self {
            spinner,
            verbose: false,
        }
    }

    /// Clear the spinner line
    pub fn finish(&self) {
        self.spinner.finish_and_clear();
    }

    fn print(&self, line: &str) {
        self.spinner.suspend(|| println!("{line}"));
    }

    fn eprint(&self, line: &str) {
        self.spinner.suspend(|| eprintln!("{line}"));
    }
}

#[async_trait]
impl Notifier for CliNotifier {
    async fn on_section_saved(&self, section: Section) {
        self.print(&saved_line(section));
    }

    async fn on_phase(&self, phase: Phase) {
        if self.verbose {
            self.print(&phase_line(phase));
        } else if phase == Phase::Complete {
            self.spinner.finish_and_clear();
        } else {
            self.spinner.set_message(format!("{phase}..."));
        }
    }

    async fn info(&self, message: &Message) {
        self.print(&format!("  {}", message.muted()));
    }

    async fn success(&self, message: &Message) {
        self.print(&format!("{} {}", check(), message.success()));
    }

    async fn error(&self, message: &Message) {
        self.eprint(&format!("{} {}", cross(), message.error()));
    }
}
