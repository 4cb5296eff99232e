//! Change predicates: pending values vs. last-committed values
//!
//! All functions here are pure; the wizard recomputes them on demand.

use crate::types::{Container, License, PublicationDraft, SubjectPath};
use crate::wizard::pending::{PendingBasics, PendingLicense, PendingUploadFields};
use crate::wizard::validate::extract_doi;
use chrono::NaiveDate;

/// Undo HTML escaping the API applies to tags
pub fn fix_special_char(input: &str) -> String {
    input.replace("&amp;", "&")
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

/// Pending title differs from the committed title
pub fn title_changed(pending: Option<&str>, committed: Option<&str>) -> bool {
    non_blank(pending).map(str::trim) != non_blank(committed).map(str::trim)
}

/// A different existing file was picked, or a new file is staged
pub fn file_changed(upload: &PendingUploadFields, draft: &PublicationDraft) -> bool {
    let picked_other = upload.selected_file.as_ref().is_some_and(|selected| {
        draft.primary_file.as_ref().map(|f| f.id.as_str()) != Some(selected.id.as_str())
    });
    picked_other || upload.file_upload.is_some()
}

/// Any unsaved change in the Upload section
pub fn upload_changed(upload: &PendingUploadFields, draft: &PublicationDraft) -> bool {
    file_changed(upload, draft) || title_changed(upload.title.as_deref(), draft.title.as_deref())
}

/// Pending abstract (trimmed) differs from the committed description
pub fn abstract_changed(pending: Option<&str>, committed: Option<&str>) -> bool {
    pending.is_some_and(|text| Some(text.trim()) != committed)
}

/// Tag lists differ in length or in any normalized element
pub fn tags_changed(pending: &[String], committed: &[String]) -> bool {
    pending.len() != committed.len()
        || pending
            .iter()
            .zip(committed)
            .any(|(p, c)| fix_special_char(p) != fix_special_char(c))
}

/// DOI extracted from the pending text differs from the committed DOI
///
/// Both blank counts as unchanged.
pub fn doi_changed(pending: Option<&str>, committed: Option<&str>) -> bool {
    let pending = pending.and_then(extract_doi);
    let committed = non_blank(committed);
    (pending.is_some() || committed.is_some()) && pending.as_deref() != committed
}

/// Original publication date differs; both absent counts as unchanged
pub fn original_publication_date_changed(
    pending: Option<NaiveDate>,
    committed: Option<NaiveDate>,
) -> bool {
    pending != committed
}

/// Pending license differs from the committed one
///
/// With nothing committed, the pending license is compared to the default
/// the user would silently inherit: first accepted license, current year,
/// no copyright holders. Any difference counts as a change.
pub fn license_changed(
    pending: &PendingLicense,
    draft: &PublicationDraft,
    available: &[License],
    current_year: i32,
) -> bool {
    let pending_name = pending.license_type.as_ref().map(|l| l.name.as_str());

    if draft.license.is_some() || draft.license_record.is_some() {
        let committed_name = draft.license.as_ref().map(|l| l.name.as_str());
        let record = draft.license_record.as_ref();
        let committed_year = record.and_then(|r| r.year.as_deref());
        let committed_holders = record
            .map(|r| r.copyright_holders.join(", "))
            .unwrap_or_default();

        committed_name != pending_name
            || committed_year != pending.year.as_deref()
            || committed_holders != pending.copyright_holders
    } else {
        let default_name = available.first().map(|l| l.name.as_str());
        let default_year = current_year.to_string();

        default_name != pending_name
            || pending.year.as_deref() != Some(default_year.as_str())
            || !pending.copyright_holders.trim().is_empty()
    }
}

/// Any unsaved change in the Basics section
pub fn basics_changed(
    basics: &PendingBasics,
    draft: &PublicationDraft,
    available: &[License],
    current_year: i32,
) -> bool {
    tags_changed(&basics.tags, &draft.tags)
        || abstract_changed(basics.abstract_text.as_deref(), draft.description.as_deref())
        || doi_changed(basics.doi.as_deref(), draft.doi.as_deref())
        || license_changed(&basics.license, draft, available, current_year)
        || original_publication_date_changed(
            basics.original_publication_date,
            draft.original_publication_date,
        )
}

/// Subject id paths differ
pub fn discipline_changed(pending: &[SubjectPath], committed: &[SubjectPath]) -> bool {
    pending != committed
}

/// Container license record differs from what the pending license would write
pub fn container_license_record_changed(container: &Container, pending: &PendingLicense) -> bool {
    let record = container.license_record.as_ref();
    record.and_then(|r| r.year.as_deref()) != pending.year.as_deref()
        || record.map(|r| r.copyright_holders.clone()).unwrap_or_default() != pending.holders()
}

/// Container license differs from the pending license type
pub fn container_license_changed(container: &Container, pending: &PendingLicense) -> bool {
    container.license.as_ref().map(|l| l.name.as_str())
        != pending.license_type.as_ref().map(|l| l.name.as_str())
}
