//! Subject taxonomy and provider facet helpers

use crate::error::Result;
use crate::store::{RecordStore, load_all};
use crate::types::Subject;
use std::collections::HashMap;

/// Order subjects alphabetically by display text
pub fn sort_subjects(subjects: &mut [Subject]) {
    subjects.sort_by(|a, b| a.text.cmp(&b.text));
}

/// Every top-level subject of a provider, sorted by text
pub async fn load_top_level_subjects(
    store: &dyn RecordStore,
    provider_id: &str,
) -> Result<Vec<Subject>> {
    let mut subjects = load_all(move |page| store.top_level_subjects(provider_id, page)).await?;
    sort_subjects(&mut subjects);
    Ok(subjects)
}

/// Facet label for a provider: `"<name> (<count>)"`
///
/// Names with an entry in `replacements` are shown under the replacement.
pub fn provider_facet_label(
    name: &str,
    count: usize,
    replacements: &HashMap<String, String>,
) -> String {
    let shown = replacements.get(name).map_or(name, String::as_str);
    format!("{shown} ({count})")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn subject(id: &str, text: &str) -> Subject {
        Subject {
            id: id.to_string(),
            text: text.to_string(),
        }
    }

    #[test]
    fn test_sort_subjects_by_text() {
        let mut subjects = vec![
            subject("3", "Social and Behavioral Sciences"),
            subject("1", "Engineering"),
            subject("2", "Arts and Humanities"),
        ];
        sort_subjects(&mut subjects);
        let texts: Vec<_> = subjects.iter().map(|s| s.text.as_str()).collect();
        assert_eq!(
            texts,
            vec![
                "Arts and Humanities",
                "Engineering",
                "Social and Behavioral Sciences"
            ]
        );
    }

    #[test]
    fn test_provider_facet_label() {
        let mut replacements = HashMap::new();
        replacements.insert("Open Science Framework".to_string(), "OSF Preprints".to_string());

        assert_eq!(
            provider_facet_label("Open Science Framework", 12, &replacements),
            "OSF Preprints (12)"
        );
        assert_eq!(provider_facet_label("engrXiv", 0, &replacements), "engrXiv (0)");
    }
}
