//! Wizard sections and navigation order

use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the five wizard sections, in navigation order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Section {
    /// Choose the publishing provider
    Provider,
    /// Bind a container and primary file
    Upload,
    /// Select subjects
    Discipline,
    /// Abstract, tags, DOI, license, original publication date
    Basics,
    /// Manage contributors
    Authors,
}

impl Section {
    /// All sections in navigation order
    pub const ALL: [Self; 5] = [
        Self::Provider,
        Self::Upload,
        Self::Discipline,
        Self::Basics,
        Self::Authors,
    ];

    /// Position in navigation order
    pub fn index(self) -> usize {
        Self::ALL.iter().position(|s| *s == self).unwrap_or_default()
    }

    /// Section following this one, if any
    pub fn next(self) -> Option<Self> {
        Self::ALL.get(self.index() + 1).copied()
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Provider => "Provider",
            Self::Upload => "Upload",
            Self::Discipline => "Discipline",
            Self::Basics => "Basics",
            Self::Authors => "Authors",
        };
        write!(f, "{s}")
    }
}

/// Where the wizard currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Position {
    /// Editing a section
    Section(Section),
    /// All sections passed; reviewing before final submission
    Review,
}

impl Position {
    /// Position after finishing `section`
    pub fn after(section: Section) -> Self {
        section.next().map_or(Self::Review, Self::Section)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Section(s) => write!(f, "{s}"),
            Self::Review => write!(f, "Review"),
        }
    }
}
