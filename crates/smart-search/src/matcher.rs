//! Case-insensitive substring matching over record fields

use crate::record::{FieldPath, Record};

/// Decide whether `record` matches `query` on any of `field_paths`
///
/// A field contributes a match only when it resolves to a string whose
/// lowercase form contains the lowercase query. An empty query matches
/// nothing.
pub fn matches(record: &Record, field_paths: &[FieldPath], query: &str) -> bool {
    if query.is_empty() {
        return false;
    }
    matches_folded(record, field_paths, &query.to_lowercase())
}

/// Same as [`matches`] with an already lowercased, non-empty needle
pub(crate) fn matches_folded(record: &Record, field_paths: &[FieldPath], needle: &str) -> bool {
    field_paths.iter().any(|path| {
        record
            .get(path)
            .and_then(|value| value.as_str())
            .is_some_and(|text| text.to_lowercase().contains(needle))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn paths(raw: &[&str]) -> Vec<FieldPath> {
        raw.iter().map(|p| FieldPath::new(*p)).collect()
    }

    #[test]
    fn test_case_insensitive_substring() {
        let record = Record::new(json!({"label": "Green Apple"}));
        assert!(matches(&record, &paths(&["label"]), "apple"));
        assert!(matches(&record, &paths(&["label"]), "EN AP"));
        assert!(!matches(&record, &paths(&["label"]), "pear"));
    }

    #[test]
    fn test_empty_query_matches_nothing() {
        let record = Record::new(json!({"label": "Apple"}));
        assert!(!matches(&record, &paths(&["label"]), ""));
    }

    #[test]
    fn test_any_field_matches() {
        let record = Record::new(json!({"name": "Jane Smith", "email": "j.smith@example.com"}));
        assert!(matches(&record, &paths(&["name", "email"]), "example"));
        assert!(matches(&record, &paths(&["name", "email"]), "jane"));
        assert!(!matches(&record, &paths(&["name"]), "example"));
    }

    #[test]
    fn test_nested_field() {
        let record = Record::new(json!({"address": {"city": "Lisbon"}}));
        assert!(matches(&record, &paths(&["address.city"]), "lis"));
        assert!(!matches(&record, &paths(&["address.street"]), "lis"));
    }

    #[test]
    fn test_non_string_values_never_match() {
        let record = Record::new(json!({"count": 42, "ok": true, "tags": ["42"], "none": null}));
        let fields = paths(&["count", "ok", "tags", "none"]);
        assert!(!matches(&record, &fields, "42"));
        assert!(!matches(&record, &fields, "true"));
        assert!(!matches(&record, &fields, "null"));
    }

    #[test]
    fn test_odd_record_shapes_are_total() {
        let fields = paths(&["label", "a.b.c", ""]);
        for value in [json!(null), json!("label"), json!(7), json!([1, 2]), json!({})] {
            assert!(!matches(&Record::new(value), &fields, "label"));
        }
    }

    #[test]
    fn test_no_field_paths_matches_nothing() {
        let record = Record::new(json!({"label": "Apple"}));
        assert!(!matches(&record, &[], "apple"));
    }
}
