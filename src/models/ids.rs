//! Identifier-reference rewriting
//!
//! Controller items reference each other by UUID-shaped identifiers that can
//! appear at any depth, under any field name, and even inside free-text
//! description fields. Rewriting therefore works on the serialized form:
//! serialize, substitute every UUID-shaped token, parse back. The flip side
//! is that UUID-shaped prose is rewritten too; restore workflows depend on
//! this looseness and it must not be tightened to structural matching.

use std::collections::{HashMap, HashSet};
use std::sync::OnceLock;

use regex::Regex;
use serde_json::Value;

use crate::error::VaultResult;

/// The sole recognized identifier shape: lowercase hex 8-4-4-4-12.
fn item_id_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}")
            .expect("valid item id pattern")
    })
}

/// Replace every identifier in `value` that appears as a key in `id_map`
/// with its mapped value. Identifiers not in the map pass through.
///
/// The empty map is the identity.
pub fn rewrite_ids(id_map: &HashMap<String, String>, value: &Value) -> VaultResult<Value> {
    let serialized = serde_json::to_string(value)?;

    let rewritten = item_id_regex().replace_all(&serialized, |caps: &regex::Captures| {
        let matched = &caps[0];
        id_map.get(matched).map(String::as_str).unwrap_or(matched).to_string()
    });

    Ok(serde_json::from_str(&rewritten)?)
}

/// Collect every distinct identifier referenced inside `value`, with the
/// item's own identifier field stripped from the top level first.
///
/// Used by workflow collaborators to build dependency graphs.
pub fn id_references(value: &Value, id_field: Option<&str>) -> HashSet<String> {
    let stripped;
    let scanned = match (value, id_field) {
        (Value::Object(map), Some(id_field)) => {
            stripped = Value::Object(
                map.iter()
                    .filter(|(k, _)| k.as_str() != id_field)
                    .map(|(k, v)| (k.clone(), v.clone()))
                    .collect(),
            );
            &stripped
        }
        _ => value,
    };

    let serialized = serde_json::to_string(scanned).unwrap_or_default();
    item_id_regex()
        .find_iter(&serialized)
        .map(|m| m.as_str().to_string())
        .collect()
}
