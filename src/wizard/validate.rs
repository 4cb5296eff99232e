//! Per-field validators
//!
//! Each validator is pure and returns a [`FieldCheck`]; the wizard combines
//! them into per-section validity.

use crate::wizard::pending::PendingLicense;
use chrono::NaiveDate;
use lazy_static::lazy_static;
use regex::Regex;
use std::fmt;

/// Minimum abstract length in characters
pub const ABSTRACT_MIN_LEN: usize = 20;
/// Maximum abstract length in characters
pub const ABSTRACT_MAX_LEN: usize = 5000;
/// Minimum length of an invited contributor's full name
pub const FULL_NAME_MIN_LEN: usize = 3;

lazy_static! {
    /// DOI shape accepted by the backend; the last character may not be
    /// a quote, ampersand or angle bracket
    static ref DOI_REGEX: Regex =
        Regex::new(r#"\b(10\.\d{4,}(?:\.\d+)*/\S+[^\s"&'<>])\b"#).expect("valid DOI regex");

    static ref EMAIL_REGEX: Regex = Regex::new(concat!(
        r"(?i)^[-a-z0-9~!$%^\&*_=+}{'?]+(\.[-a-z0-9~!$%^\&*_=+}{'?]+)*@",
        r"([a-z0-9_][-a-z0-9_]*(\.[-a-z0-9_]+)*\.",
        r"(aero|arpa|biz|com|coop|edu|gov|info|int|mil|museum|name|net|org|pro|travel|mobi|swiss|[a-z][a-z])",
        r"|([0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}))(:[0-9]{1,5})?$",
    ))
    .expect("valid email regex");
}

/// Pull the bare DOI out of free text such as `https://doi.org/10.1234/x`
///
/// Returns `None` for blank input or text without a DOI.
pub fn extract_doi(text: &str) -> Option<String> {
    DOI_REGEX.find(text).map(|m| m.as_str().to_string())
}

/// Why a field failed validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldIssue {
    /// Required and blank
    Missing,
    /// Fewer characters than allowed
    TooShort {
        /// Minimum length
        min: usize,
        /// Actual length
        actual: usize,
    },
    /// More characters than allowed
    TooLong {
        /// Maximum length
        max: usize,
        /// Actual length
        actual: usize,
    },
    /// Does not match the expected format
    BadFormat,
    /// Date lies after today
    InFuture,
    /// The license requires a copyright year
    MissingYear,
    /// The license requires copyright holders
    MissingCopyrightHolders,
}

/// A failed field check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    /// Human-readable field name
    pub field: &'static str,
    /// What went wrong
    pub issue: FieldIssue,
}

impl FieldError {
    /// Error for `field`
    pub const fn new(field: &'static str, issue: FieldIssue) -> Self {
        Self { field, issue }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let field = self.field;
        match &self.issue {
            FieldIssue::Missing => write!(f, "{field} can't be blank"),
            FieldIssue::TooShort { min, actual } => {
                write!(f, "{field} is too short ({actual} characters, minimum is {min})")
            }
            FieldIssue::TooLong { max, actual } => {
                write!(f, "{field} is too long ({actual} characters, maximum is {max})")
            }
            FieldIssue::BadFormat => write!(f, "Please use a valid {field}"),
            FieldIssue::InFuture => write!(f, "{field} must be on or before today"),
            FieldIssue::MissingYear => write!(f, "{field} requires a copyright year"),
            FieldIssue::MissingCopyrightHolders => {
                write!(f, "{field} requires copyright holders")
            }
        }
    }
}

/// Outcome of a single field check
pub type FieldCheck = std::result::Result<(), FieldError>;

/// Abstract: not blank, 20..=5000 characters
///
/// Length counts the text as typed, surrounding whitespace included.
pub fn validate_abstract(text: Option<&str>) -> FieldCheck {
    let text = text.unwrap_or_default();
    if text.trim().is_empty() {
        return Err(FieldError::new("Abstract", FieldIssue::Missing));
    }
    let actual = text.chars().count();
    if actual < ABSTRACT_MIN_LEN {
        return Err(FieldError::new(
            "Abstract",
            FieldIssue::TooShort {
                min: ABSTRACT_MIN_LEN,
                actual,
            },
        ));
    }
    if actual > ABSTRACT_MAX_LEN {
        return Err(FieldError::new(
            "Abstract",
            FieldIssue::TooLong {
                max: ABSTRACT_MAX_LEN,
                actual,
            },
        ));
    }
    Ok(())
}

/// DOI: blank, or contains a DOI
pub fn validate_doi(text: Option<&str>) -> FieldCheck {
    match text.map(str::trim) {
        None | Some("") => Ok(()),
        Some(t) if DOI_REGEX.is_match(t) => Ok(()),
        Some(_) => Err(FieldError::new("DOI", FieldIssue::BadFormat)),
    }
}

/// Original publication date: absent, or on/before `today`
pub fn validate_original_publication_date(date: Option<NaiveDate>, today: NaiveDate) -> FieldCheck {
    match date {
        Some(d) if d > today => Err(FieldError::new(
            "Original publication date",
            FieldIssue::InFuture,
        )),
        _ => Ok(()),
    }
}

/// License: selected, with every field the license requires
pub fn validate_license(license: &PendingLicense) -> FieldCheck {
    let Some(kind) = &license.license_type else {
        return Err(FieldError::new("License", FieldIssue::Missing));
    };
    if kind.requires_year() && license.year.as_deref().is_none_or(|y| y.trim().is_empty()) {
        return Err(FieldError::new("License", FieldIssue::MissingYear));
    }
    if kind.requires_copyright_holders() && license.holders().is_empty() {
        return Err(FieldError::new(
            "License",
            FieldIssue::MissingCopyrightHolders,
        ));
    }
    Ok(())
}

/// Invited contributor name: not blank, at least three characters as typed
pub fn validate_full_name(name: &str) -> FieldCheck {
    if name.trim().is_empty() {
        return Err(FieldError::new("Full Name", FieldIssue::Missing));
    }
    let actual = name.chars().count();
    if actual < FULL_NAME_MIN_LEN {
        return Err(FieldError::new(
            "Full Name",
            FieldIssue::TooShort {
                min: FULL_NAME_MIN_LEN,
                actual,
            },
        ));
    }
    Ok(())
}

/// Invited contributor email: present and email-shaped
pub fn validate_email(email: &str) -> FieldCheck {
    let email = email.trim();
    if email.is_empty() {
        return Err(FieldError::new("Email", FieldIssue::Missing));
    }
    if !EMAIL_REGEX.is_match(email) {
        return Err(FieldError::new("Email", FieldIssue::BadFormat));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::License;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_extract_doi() {
        assert_eq!(
            extract_doi("https://doi.org/10.1234/abcd.5").as_deref(),
            Some("10.1234/abcd.5")
        );
        assert_eq!(
            extract_doi("doi:10.12345.6/xyz").as_deref(),
            Some("10.12345.6/xyz")
        );
        assert_eq!(extract_doi(""), None);
        assert_eq!(extract_doi("not a doi"), None);
        // Registrant code needs at least four digits
        assert_eq!(extract_doi("10.123/abc"), None);
    }

    #[test]
    fn test_validate_doi() {
        assert!(validate_doi(None).is_ok());
        assert!(validate_doi(Some("  ")).is_ok());
        assert!(validate_doi(Some("10.1234/abcd")).is_ok());
        assert_eq!(
            validate_doi(Some("abcd")).unwrap_err().issue,
            FieldIssue::BadFormat
        );
    }

    #[test]
    fn test_validate_abstract_bounds() {
        assert_eq!(
            validate_abstract(None).unwrap_err().issue,
            FieldIssue::Missing
        );
        assert!(matches!(
            validate_abstract(Some("too short")).unwrap_err().issue,
            FieldIssue::TooShort { min: 20, actual: 9 }
        ));
        assert!(validate_abstract(Some(&"a".repeat(20))).is_ok());
        assert!(validate_abstract(Some(&"a".repeat(5000))).is_ok());
        assert!(matches!(
            validate_abstract(Some(&"a".repeat(5001))).unwrap_err().issue,
            FieldIssue::TooLong { .. }
        ));
    }

    #[test]
    fn test_lengths_count_surrounding_whitespace() {
        let padded = format!("  {}  ", "a".repeat(16));
        assert!(validate_abstract(Some(&padded)).is_ok());
        assert!(matches!(
            validate_abstract(Some(&format!(" {} ", "a".repeat(4999))))
                .unwrap_err()
                .issue,
            FieldIssue::TooLong { max: 5000, actual: 5001 }
        ));
        assert_eq!(
            validate_abstract(Some(&" ".repeat(30))).unwrap_err().issue,
            FieldIssue::Missing
        );

        assert!(validate_full_name(" Al").is_ok());
        assert!(matches!(
            validate_full_name("Al").unwrap_err().issue,
            FieldIssue::TooShort { min: 3, actual: 2 }
        ));
        assert_eq!(
            validate_full_name("    ").unwrap_err().issue,
            FieldIssue::Missing
        );
    }

    #[test]
    fn test_original_publication_date() {
        let today = date(2024, 5, 1);
        assert!(validate_original_publication_date(None, today).is_ok());
        assert!(validate_original_publication_date(Some(today), today).is_ok());
        assert!(validate_original_publication_date(Some(date(2024, 5, 2)), today).is_err());
    }

    #[test]
    fn test_validate_license_required_fields() {
        let mit = License {
            id: "mit".to_string(),
            name: "MIT License".to_string(),
            required_fields: vec!["year".to_string(), "copyrightHolders".to_string()],
        };
        let mut pending = PendingLicense {
            license_type: Some(mit),
            year: Some("2024".to_string()),
            copyright_holders: String::new(),
        };
        assert_eq!(
            validate_license(&pending).unwrap_err().issue,
            FieldIssue::MissingCopyrightHolders
        );

        pending.copyright_holders = "Ada".to_string();
        assert!(validate_license(&pending).is_ok());

        pending.year = None;
        assert_eq!(
            validate_license(&pending).unwrap_err().issue,
            FieldIssue::MissingYear
        );

        assert_eq!(
            validate_license(&PendingLicense::default())
                .unwrap_err()
                .issue,
            FieldIssue::Missing
        );
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("ada@example.org").is_ok());
        assert!(validate_email("First.Last@Sub.Example.CO").is_ok());
        assert!(validate_email("someone@10.0.0.1").is_ok());
        assert!(validate_email("").is_err());
        assert!(validate_email("no-at-sign").is_err());
        assert!(validate_email("a@b").is_err());
    }

    #[test]
    fn test_validate_full_name() {
        assert!(validate_full_name("Ada").is_ok());
        assert!(validate_full_name("Al").is_err());
        assert!(validate_full_name("   ").is_err());
    }

    #[test]
    fn test_field_error_display() {
        let err = validate_abstract(Some("short")).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Abstract is too short (5 characters, minimum is 20)"
        );
    }
}
