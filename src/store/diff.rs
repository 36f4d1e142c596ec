//! Field-level change descriptions for debug logging.
//!
//! Stores that opt in via [`ObservableStore::with_change_log`] log which
//! top-level fields a committed write touched. Equality gating never depends
//! on this module; it exists purely for diagnostics.
//!
//! [`ObservableStore::with_change_log`]: super::ObservableStore::with_change_log

use serde::Serialize;
use serde_json::Value as JsonValue;
use std::collections::BTreeSet;

/// Returns the sorted names of top-level fields whose values differ.
///
/// Both snapshots are serialized to JSON objects and compared key by key over
/// the union of their keys. Non-object snapshots (numbers, strings, enums)
/// report a single `"<value>"` entry when they differ. Snapshots that fail to
/// serialize report nothing.
///
/// # Examples
///
/// ```
/// use bankflow::store::changed_fields;
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct Form { name: String, busy: bool }
///
/// let old = Form { name: "a".into(), busy: false };
/// let new = Form { name: "a".into(), busy: true };
/// assert_eq!(changed_fields(&old, &new), vec!["busy".to_string()]);
/// ```
#[must_use]
pub fn changed_fields<S: Serialize>(old: &S, new: &S) -> Vec<String> {
    let (Ok(old), Ok(new)) = (serde_json::to_value(old), serde_json::to_value(new)) else {
        return Vec::new();
    };

    match (&old, &new) {
        (JsonValue::Object(before), JsonValue::Object(after)) => {
            let keys: BTreeSet<&String> = before.keys().chain(after.keys()).collect();
            keys.into_iter()
                .filter(|key| before.get(*key) != after.get(*key))
                .cloned()
                .collect()
        }
        _ if old != new => vec!["<value>".to_string()],
        _ => Vec::new(),
    }
}
