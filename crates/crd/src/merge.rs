//! Idempotent merging of `x-kubernetes-validations` entries

use crate::error::{PatchError, Result};
use crate::path::SchemaPath;
use serde_yaml::{Mapping, Value};

/// Schema key holding CEL validation rules
pub const VALIDATIONS_KEY: &str = "x-kubernetes-validations";

/// Get the validations list of `node`, creating it when absent or null
pub fn ensure_validations<'a>(node: &'a mut Mapping, path: &SchemaPath) -> Result<&'a mut Vec<Value>> {
    if node.get(VALIDATIONS_KEY).map_or(true, Value::is_null) {
        node.insert(Value::String(VALIDATIONS_KEY.to_string()), Value::Sequence(Vec::new()));
    }

    node.get_mut(VALIDATIONS_KEY)
        .and_then(Value::as_sequence_mut)
        .ok_or_else(|| PatchError::schema_path(path, format!("expected list at '{VALIDATIONS_KEY}'")))
}

/// Append each wanted entry that is not already present.
///
/// Entries compare as `serde_yaml::Value`: mapping key order is ignored,
/// sequence order is not. Existing entries are never moved or removed.
/// Returns true if anything was appended.
pub fn merge_validations(existing: &mut Vec<Value>, wanted: &[Value]) -> bool {
    let mut changed = false;
    for validation in wanted {
        if existing.contains(validation) {
            continue;
        }
        existing.push(validation.clone());
        changed = true;
    }
    changed
}
