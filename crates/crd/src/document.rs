//! Multi-document YAML loading and dumping

use crate::error::{PatchError, Result};
use serde::{Deserialize, Serialize};
use serde_yaml::value::TaggedValue;
use serde_yaml::Value;
use std::fmt;
use std::str::FromStr;

const DOCUMENT_MARKER: &str = "---";

/// Plain scalars that YAML 1.1 readers (`sigs.k8s.io/yaml` among them)
/// resolve to booleans. serde_yaml emits them unquoted.
const YAML11_BOOLEANS: &[&str] = &[
    "y", "Y", "yes", "Yes", "YES", "n", "N", "no", "No", "NO", "on", "On", "ON", "off", "Off",
    "OFF",
];

/// Prefix of the stand-ins swapped in for YAML 1.1 booleans while serializing
const QUOTE_PLACEHOLDER: &str = "__celpatch_yaml11_";

/// Policy for the `---` marker in front of the first document
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentStart {
    /// Emit it only if the original content started with one
    #[default]
    Preserve,
    Always,
    Never,
}

impl FromStr for DocumentStart {
    type Err = PatchError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "preserve" => Ok(Self::Preserve),
            "always" => Ok(Self::Always),
            "never" => Ok(Self::Never),
            other => Err(PatchError::Configuration(format!(
                "unknown document start policy: {other}"
            ))),
        }
    }
}

impl fmt::Display for DocumentStart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Preserve => "preserve",
            Self::Always => "always",
            Self::Never => "never",
        })
    }
}

/// Serializer configuration for rewritten CRD files
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct YamlFormat {
    pub document_start: DocumentStart,
}

impl YamlFormat {
    pub fn new(document_start: DocumentStart) -> Self {
        Self { document_start }
    }

    fn leading_marker(&self, source_had_marker: bool) -> bool {
        match self.document_start {
            DocumentStart::Preserve => source_had_marker,
            DocumentStart::Always => true,
            DocumentStart::Never => false,
        }
    }
}

/// Load every document of a YAML stream, in order
pub fn load_documents(content: &str) -> Result<Vec<Value>> {
    let mut docs = Vec::new();
    for document in serde_yaml::Deserializer::from_str(content) {
        docs.push(Value::deserialize(document)?);
    }
    Ok(docs)
}

/// Dump documents as one YAML stream, separated by `---` lines
pub fn dump_documents(docs: &[Value], format: &YamlFormat, source_had_marker: bool) -> Result<String> {
    let mut out = String::new();
    for (index, doc) in docs.iter().enumerate() {
        if index > 0 || format.leading_marker(source_had_marker) {
            out.push_str(DOCUMENT_MARKER);
            out.push('\n');
        }
        out.push_str(&serialize_document(doc)?);
    }
    Ok(out)
}

/// Serialize one document, single-quoting strings a YAML 1.1 reader would
/// take for booleans
fn serialize_document(doc: &Value) -> Result<String> {
    if !any_string(doc, &is_yaml11_boolean) {
        return Ok(serde_yaml::to_string(doc)?);
    }
    if any_string(doc, &|s: &str| s.contains(QUOTE_PLACEHOLDER)) {
        return Err(PatchError::config(format!(
            "document contains the reserved text '{QUOTE_PLACEHOLDER}'"
        )));
    }

    let mut text = serde_yaml::to_string(&mask_yaml11_booleans(doc.clone()))?;
    for word in YAML11_BOOLEANS {
        text = text.replace(&placeholder(word), &format!("'{word}'"));
    }
    Ok(text)
}

fn is_yaml11_boolean(s: &str) -> bool {
    YAML11_BOOLEANS.contains(&s)
}

fn placeholder(word: &str) -> String {
    format!("{QUOTE_PLACEHOLDER}{word}__")
}

/// Whether any string key or value in `value` satisfies `pred`
fn any_string(value: &Value, pred: &dyn Fn(&str) -> bool) -> bool {
    match value {
        Value::String(s) => pred(s),
        Value::Sequence(seq) => seq.iter().any(|v| any_string(v, pred)),
        Value::Mapping(map) => map
            .iter()
            .any(|(k, v)| any_string(k, pred) || any_string(v, pred)),
        Value::Tagged(tagged) => any_string(&tagged.value, pred),
        _ => false,
    }
}

fn mask_yaml11_booleans(value: Value) -> Value {
    match value {
        Value::String(s) if is_yaml11_boolean(&s) => Value::String(placeholder(&s)),
        Value::Sequence(seq) => {
            Value::Sequence(seq.into_iter().map(mask_yaml11_booleans).collect())
        }
        Value::Mapping(map) => Value::Mapping(
            map.into_iter()
                .map(|(k, v)| (mask_yaml11_booleans(k), mask_yaml11_booleans(v)))
                .collect(),
        ),
        Value::Tagged(tagged) => {
            let TaggedValue { tag, value } = *tagged;
            Value::Tagged(Box::new(TaggedValue {
                tag,
                value: mask_yaml11_booleans(value),
            }))
        }
        other => other,
    }
}

/// Whether the first meaningful line of `content` is a `---` marker
pub fn starts_with_marker(content: &str) -> bool {
    content
        .lines()
        .map(str::trim_end)
        .find(|line| !line.is_empty() && !line.starts_with('#'))
        .is_some_and(|line| line == DOCUMENT_MARKER || line.starts_with("--- "))
}
