//! Terminal styling for ppsubmit output
//!
//! Every colored string goes through [`Stylize`], so color detection
//! (`NO_COLOR`, `CLICOLOR`, TTY) lives in one place, `owo-colors`.
//!
//! # What gets which style
//!
//! | Method        | Color  | Stream | Used for                                   |
//! |---------------|--------|--------|--------------------------------------------|
//! | `.accent()`   | Cyan   | stdout | Draft ids, provider ids, project ids, URLs |
//! | `.success()`  | Green  | stdout | Submitted, withdrawn, resubmitted          |
//! | `.error()`    | Red    | stderr | Failed saves, manifest problems            |
//! | `.muted()`    | Dim    | stdout | Store notes, moderation notices, dry runs  |
//! | `.emphasis()` | Bold   | stdout | Section names, phases, headings            |
//!
//! # Output shapes
//!
//! ```text
//! Uploading file...
//!   ✓ Upload saved
//!   ✓ Discipline saved
//! ✓ Submitted draft-42 to engrXiv
//! ✗ Could not save basics; changes were rolled back
//! ```
//!
//! ```ignore
//! use crate::cli::style::{Stylize, phase_line, saved_line};
//!
//! println!("{}", phase_line(Phase::UploadingFile));
//! println!("{}", saved_line(Section::Basics));
//! println!("Draft: {}", draft_id.accent());
//! ```

use indicatif::ProgressStyle;
use std::fmt::{self, Display};
use std::sync::OnceLock;

pub use owo_colors::Stream;
use owo_colors::{OwoColorize, Style};

const ACCENT: Style = Style::new().cyan();
const SUCCESS: Style = Style::new().green();
const ERROR: Style = Style::new().red();
const MUTED: Style = Style::new().dimmed();
const EMPHASIS: Style = Style::new().bold();

/// Marks a saved section or finished submission
pub const CHECK: &str = "✓";
/// Marks a failed save or a manifest problem
pub const CROSS: &str = "✗";
/// Leads a planned step in a dry run
pub const ARROW: &str = "→";
/// Leads a provider or subject in a listing
pub const BULLET: &str = "○";

/// A value rendered with a style when the target stream supports color
#[derive(Clone, Debug)]
pub struct Styled<T> {
    value: T,
    style: Style,
    stream: Stream,
}

impl<T> Styled<T> {
    const fn new(value: T, style: Style, stream: Stream) -> Self {
        Self {
            value,
            style,
            stream,
        }
    }
}

impl<T: Display> Display for Styled<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            self.value
                .if_supports_color(self.stream, |v| v.style(self.style))
        )
    }
}

/// Semantic styles for anything printable
///
/// Methods borrow, so ids and titles can be styled in place.
pub trait Stylize: Display {
    /// Identifiers the user may copy: draft, provider and project ids
    fn accent(&self) -> Styled<&Self> {
        Styled::new(self, ACCENT, Stream::Stdout)
    }

    /// Final outcomes: submitted, withdrawn, resubmitted
    fn success(&self) -> Styled<&Self> {
        Styled::new(self, SUCCESS, Stream::Stdout)
    }

    /// Failures; detected against stderr
    fn error(&self) -> Styled<&Self> {
        Styled::new(self, ERROR, Stream::Stderr)
    }

    /// Secondary text
    fn muted(&self) -> Styled<&Self> {
        Styled::new(self, MUTED, Stream::Stdout)
    }

    /// Section names, phases and headings
    fn emphasis(&self) -> Styled<&Self> {
        Styled::new(self, EMPHASIS, Stream::Stdout)
    }
}

impl<T: Display + ?Sized> Stylize for T {}

/// Green check
#[inline]
pub const fn check() -> Styled<&'static str> {
    Styled::new(CHECK, SUCCESS, Stream::Stdout)
}

/// Red cross, detected against stderr
#[inline]
pub const fn cross() -> Styled<&'static str> {
    Styled::new(CROSS, ERROR, Stream::Stderr)
}

/// Cyan arrow
#[inline]
pub const fn arrow() -> Styled<&'static str> {
    Styled::new(ARROW, ACCENT, Stream::Stdout)
}

/// Dim bullet
#[inline]
pub const fn bullet() -> Styled<&'static str> {
    Styled::new(BULLET, MUTED, Stream::Stdout)
}

/// Indented line announcing a committed section
pub fn saved_line(section: impl Display) -> String {
    format!("  {} {} saved", check(), section.emphasis())
}

/// Line announcing a long-running phase
pub fn phase_line(phase: impl Display) -> String {
    format!("{}...", phase.emphasis())
}

const fn to_hyperlink_stream(stream: Stream) -> supports_hyperlinks::Stream {
    match stream {
        Stream::Stdout => supports_hyperlinks::Stream::Stdout,
        Stream::Stderr => supports_hyperlinks::Stream::Stderr,
    }
}

/// Clickable link to a submitted draft, or the bare URL without OSC 8 support
pub fn hyperlink_url(stream: Stream, url: &str) -> String {
    if supports_hyperlinks::on(to_hyperlink_stream(stream)) {
        terminal_link::Link::new(url, url).to_string()
    } else {
        url.to_string()
    }
}

/// Spinner shown while a phase runs in compact mode
pub fn spinner_style() -> ProgressStyle {
    static STYLE: OnceLock<ProgressStyle> = OnceLock::new();
    STYLE
        .get_or_init(|| {
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
        })
        .clone()
}

#[cfg(test)]
mod tests {
    use super::*;
    use preprint_submit::wizard::{Phase, Section};

    #[test]
    fn test_output_lines_without_color() {
        owo_colors::set_override(false);
        assert_eq!("draft-42".accent().to_string(), "draft-42");
        assert_eq!(saved_line(Section::Basics), format!("  {CHECK} Basics saved"));
        assert_eq!(phase_line(Phase::StartingDraft), "Starting draft...");
        owo_colors::unset_override();
    }
}
