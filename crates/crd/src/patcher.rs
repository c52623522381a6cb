//! Rule application over CRD documents and files

use crate::document::{dump_documents, load_documents, starts_with_marker, YamlFormat};
use crate::error::{PatchError, Result};
use crate::merge::{ensure_validations, merge_validations};
use crate::path::{walk_schema_path, SchemaPath};
use crate::rule::Rule;
use serde_yaml::Value;
use std::path::Path;
use tracing::{debug, info, warn};

/// Kind of the documents eligible for patching
pub const CRD_KIND: &str = "CustomResourceDefinition";

/// Whether changes are written back or only computed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatchMode {
    Write,
    DryRun,
}

/// Result of applying one rule to one file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatchOutcome {
    /// The file was rewritten
    Patched,
    /// Dry run: the file would be rewritten
    WouldPatch,
    /// Every validation was already present
    Unchanged,
    /// The target file does not exist
    Missing,
}

impl PatchOutcome {
    /// Whether the file was (or would be) rewritten
    pub fn is_change(&self) -> bool {
        matches!(self, Self::Patched | Self::WouldPatch)
    }
}

/// Apply `rule` to every CRD version schema in `docs`.
///
/// Non-CRD documents and versions without an `openAPIV3Schema` mapping are
/// skipped. Returns true if any validation was appended.
pub fn patch_documents(docs: &mut [Value], rule: &Rule) -> Result<bool> {
    let schema_path = SchemaPath::from_spec_path(rule.spec_path());
    let mut touched = false;

    for doc in docs.iter_mut().filter(|doc| is_crd(doc)) {
        for schema in version_schemas(doc) {
            let target = walk_schema_path(schema, &schema_path)?;
            let validations = ensure_validations(target, &schema_path)?;
            if merge_validations(validations, rule.validations()) {
                touched = true;
            }
        }
    }

    Ok(touched)
}

/// Apply `rule` to a YAML stream. Returns the rewritten stream, or `None`
/// when nothing changed.
pub fn patch_content(content: &str, rule: &Rule, format: &YamlFormat) -> Result<Option<String>> {
    let mut docs = load_documents(content)?;
    if !patch_documents(&mut docs, rule)? {
        return Ok(None);
    }

    dump_documents(&docs, format, starts_with_marker(content)).map(Some)
}

/// Apply `rule` to the CRD file at `path`.
///
/// A missing file is reported as [`PatchOutcome::Missing`] and never created.
pub fn patch_file(path: &Path, rule: &Rule, format: &YamlFormat, mode: PatchMode) -> Result<PatchOutcome> {
    if !path.exists() {
        warn!("rule '{}': file not found: {}", rule.name(), path.display());
        return Ok(PatchOutcome::Missing);
    }

    let content = std::fs::read_to_string(path).map_err(|e| PatchError::io(path, e))?;
    let patched = patch_content(&content, rule, format).map_err(|e| e.in_file(path))?;

    let Some(patched) = patched else {
        debug!("rule '{}': {} already up to date", rule.name(), path.display());
        return Ok(PatchOutcome::Unchanged);
    };

    match mode {
        PatchMode::DryRun => {
            debug!("rule '{}': would patch {}", rule.name(), path.display());
            Ok(PatchOutcome::WouldPatch)
        }
        PatchMode::Write => {
            std::fs::write(path, patched).map_err(|e| PatchError::io(path, e))?;
            info!("rule '{}': patched {}", rule.name(), path.display());
            Ok(PatchOutcome::Patched)
        }
    }
}

fn is_crd(doc: &Value) -> bool {
    doc.get("kind").and_then(Value::as_str) == Some(CRD_KIND)
}

/// The `schema.openAPIV3Schema` mappings of every version entry
fn version_schemas(crd: &mut Value) -> Vec<&mut Value> {
    let Some(versions) = crd
        .get_mut("spec")
        .and_then(|spec| spec.get_mut("versions"))
        .and_then(Value::as_sequence_mut)
    else {
        return Vec::new();
    };

    versions
        .iter_mut()
        .filter_map(|version| version.get_mut("schema"))
        .filter_map(|schema| schema.get_mut("openAPIV3Schema"))
        .filter(|schema| schema.is_mapping())
        .collect()
}
