//! Spec path translation and schema tree walking

use crate::error::{PatchError, Result};
use serde_yaml::{Mapping, Value};
use std::fmt;

/// Prefix anchoring every schema path under the CRD's `spec` property
pub const SPEC_ROOT: &str = "properties.spec.properties.";

const PROPERTIES: &str = "properties";
const ITEMS: &str = "items";

/// Convert a spec path like `sizeGB` or `storage.sizeGB` to a full schema path.
///
/// Empty segments are dropped, so `storage..sizeGB` translates like
/// `storage.sizeGB`.
pub fn spec_path_to_schema_path(spec_path: &str) -> String {
    let parts: Vec<&str> = spec_path.split('.').filter(|p| !p.is_empty()).collect();
    format!("{SPEC_ROOT}{}", parts.join(".properties."))
}

/// One step of a schema path
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Descend into the node's `properties` mapping
    Properties,
    /// Descend into the node's `items` mapping
    Items,
    /// Descend into a named property
    Field(String),
}

impl Segment {
    fn as_str(&self) -> &str {
        match self {
            Segment::Properties => PROPERTIES,
            Segment::Items => ITEMS,
            Segment::Field(name) => name.as_str(),
        }
    }
}

/// A parsed, fully qualified path into an OpenAPI schema tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaPath {
    segments: Vec<Segment>,
}

impl SchemaPath {
    /// Parse a dotted schema path such as `properties.spec.properties.sizeGB`
    pub fn parse(schema_path: &str) -> Self {
        let segments = schema_path
            .split('.')
            .filter(|s| !s.is_empty())
            .map(|s| match s {
                PROPERTIES => Segment::Properties,
                ITEMS => Segment::Items,
                name => Segment::Field(name.to_string()),
            })
            .collect();

        Self { segments }
    }

    /// Translate a caller-facing spec path and parse the result
    pub fn from_spec_path(spec_path: &str) -> Self {
        Self::parse(&spec_path_to_schema_path(spec_path))
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }
}

impl fmt::Display for SchemaPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, segment) in self.segments.iter().enumerate() {
            if index > 0 {
                f.write_str(".")?;
            }
            f.write_str(segment.as_str())?;
        }
        Ok(())
    }
}

/// Walk `path` from `root`, creating missing or null mappings on the way.
///
/// Returns the mapping at the end of the path. Fails when a non-mapping
/// node sits where the walk needs to descend, or where it ends.
pub fn walk_schema_path<'a>(root: &'a mut Value, path: &SchemaPath) -> Result<&'a mut Mapping> {
    let mut node = root;

    for segment in path.segments() {
        node = match segment {
            Segment::Properties | Segment::Items => ensure_mapping(node, segment.as_str(), path)?,
            Segment::Field(name) => descend(node, name, path)?,
        };
    }

    node.as_mapping_mut()
        .ok_or_else(|| PatchError::schema_path(path, "did not resolve to a mapping"))
}

/// Descend into the mapping at `key`, creating it when absent or null
fn ensure_mapping<'a>(node: &'a mut Value, key: &str, path: &SchemaPath) -> Result<&'a mut Value> {
    let child = descend(node, key, path)?;
    if !child.is_mapping() {
        return Err(PatchError::schema_path(
            path,
            format!("expected mapping at '{key}'"),
        ));
    }
    Ok(child)
}

/// Descend into property `key`, creating an empty mapping when absent or null
fn descend<'a>(node: &'a mut Value, key: &str, path: &SchemaPath) -> Result<&'a mut Value> {
    let mapping = node.as_mapping_mut().ok_or_else(|| {
        PatchError::schema_path(
            path,
            format!("cannot descend into segment '{key}'; current node is not a mapping"),
        )
    })?;

    if mapping.get(key).map_or(true, Value::is_null) {
        mapping.insert(Value::String(key.to_string()), Value::Mapping(Mapping::new()));
    }

    mapping
        .get_mut(key)
        .ok_or_else(|| PatchError::schema_path(path, format!("lost segment '{key}'")))
}
