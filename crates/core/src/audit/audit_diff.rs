//! Structural diffs between two field maps.

use serde_json::Value;

use super::audit_model::{FieldChange, FieldChanges, FieldMap};

/// Compares `old` and `new` over `fields` and returns only the fields whose
/// values differ. Comparison is deep JSON equality; a missing key is `null`.
pub fn changed_fields(old: &FieldMap, new: &FieldMap, fields: &[&str]) -> FieldChanges {
    fields
        .iter()
        .filter_map(|field| {
            let before = old.get(*field).unwrap_or(&Value::Null);
            let after = new.get(*field).unwrap_or(&Value::Null);
            (before != after).then(|| {
                (
                    field.to_string(),
                    FieldChange {
                        old: before.clone(),
                        new: after.clone(),
                    },
                )
            })
        })
        .collect()
}

/// Every field of a newly created record, with `null` as the old value.
pub fn snapshot_as_created(snapshot: FieldMap) -> FieldChanges {
    snapshot
        .into_iter()
        .map(|(field, value)| {
            (
                field,
                FieldChange {
                    old: Value::Null,
                    new: value,
                },
            )
        })
        .collect()
}

/// Every field of a deleted record, with `null` as the new value.
pub fn snapshot_as_deleted(snapshot: FieldMap) -> FieldChanges {
    snapshot
        .into_iter()
        .map(|(field, value)| {
            (
                field,
                FieldChange {
                    old: value,
                    new: Value::Null,
                },
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn map(value: Value) -> FieldMap {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_unchanged_fields_are_excluded() {
        let old = map(json!({"quantity": 100, "reference": "A"}));
        let new = map(json!({"quantity": 100, "reference": "B"}));
        let changes = changed_fields(&old, &new, &["quantity", "reference"]);
        assert_eq!(changes.len(), 1);
        assert_eq!(changes["reference"].old, json!("A"));
        assert_eq!(changes["reference"].new, json!("B"));
    }

    #[test]
    fn test_only_listed_fields_are_considered() {
        let old = map(json!({"quantity": 1, "updatedAt": "x"}));
        let new = map(json!({"quantity": 1, "updatedAt": "y"}));
        assert!(changed_fields(&old, &new, &["quantity"]).is_empty());
    }

    #[test]
    fn test_nested_values_compare_structurally() {
        let old = map(json!({"meta": {"a": [1, 2], "b": null}}));
        let new = map(json!({"meta": {"b": null, "a": [1, 2]}}));
        assert!(changed_fields(&old, &new, &["meta"]).is_empty());

        let new = map(json!({"meta": {"a": [2, 1], "b": null}}));
        assert_eq!(changed_fields(&old, &new, &["meta"]).len(), 1);
    }

    #[test]
    fn test_missing_key_is_null() {
        let old = map(json!({}));
        let new = map(json!({"description": null}));
        assert!(changed_fields(&old, &new, &["description"]).is_empty());

        let new = map(json!({"description": "set"}));
        let changes = changed_fields(&old, &new, &["description"]);
        assert_eq!(changes["description"].old, Value::Null);
    }

    #[test]
    fn test_snapshots() {
        let snapshot = map(json!({"name": "Ordinary"}));
        let created = snapshot_as_created(snapshot.clone());
        assert_eq!(created["name"].old, Value::Null);
        assert_eq!(created["name"].new, json!("Ordinary"));

        let deleted = snapshot_as_deleted(snapshot);
        assert_eq!(deleted["name"].old, json!("Ordinary"));
        assert_eq!(deleted["name"].new, Value::Null);
    }
}
