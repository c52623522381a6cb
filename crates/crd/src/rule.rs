//! Validation rule definitions and the rules file loader

use crate::error::{PatchError, Result};
use serde_yaml::{Mapping, Value};
use std::path::Path;
use tracing::debug;

/// Name given to rules that do not declare one
pub const DEFAULT_RULE_NAME: &str = "unnamed";

/// Validations to place at one spec field of one CRD file
#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    name: String,
    file: String,
    spec_path: String,
    validations: Vec<Value>,
}

impl Rule {
    /// Build a rule, enforcing the same requirements as the rules file loader
    pub fn new(
        name: impl Into<String>,
        file: impl Into<String>,
        spec_path: impl Into<String>,
        validations: Vec<Value>,
    ) -> Result<Self> {
        let rule = Self {
            name: name.into(),
            file: file.into(),
            spec_path: spec_path.into(),
            validations,
        };
        rule.validate()?;
        Ok(rule)
    }

    /// Rule name, used for reporting only
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Target file, relative to the CRD root
    pub fn file(&self) -> &str {
        &self.file
    }

    /// Dotted path below the CRD's `spec`, e.g. `storage.sizeGB`
    pub fn spec_path(&self) -> &str {
        &self.spec_path
    }

    /// Validation entries to merge into `x-kubernetes-validations`
    pub fn validations(&self) -> &[Value] {
        &self.validations
    }

    fn validate(&self) -> Result<()> {
        if self.file.is_empty() {
            return Err(PatchError::config(format!(
                "rule '{}' missing 'file'",
                self.name
            )));
        }

        if self.spec_path.is_empty() {
            return Err(PatchError::config(format!(
                "rule '{}' missing 'specPath'",
                self.name
            )));
        }

        if self.spec_path.split('.').any(str::is_empty) {
            return Err(PatchError::config(format!(
                "rule '{}' has an empty segment in specPath '{}'",
                self.name, self.spec_path
            )));
        }

        if self.validations.is_empty() {
            return Err(PatchError::config(format!(
                "rule '{}' missing 'validations'",
                self.name
            )));
        }

        if let Some(index) = self.validations.iter().position(|v| !v.is_mapping()) {
            return Err(PatchError::config(format!(
                "rule '{}': validation #{} must be a mapping",
                self.name,
                index + 1
            )));
        }

        Ok(())
    }
}

/// Load rules from a YAML file
pub fn load_rules(path: &Path) -> Result<Vec<Rule>> {
    let content = std::fs::read_to_string(path).map_err(|e| PatchError::io(path, e))?;
    let rules = parse_rules(&content).map_err(|e| match e {
        PatchError::Configuration(msg) => {
            PatchError::Configuration(format!("rules file {}: {msg}", path.display()))
        }
        other => other,
    })?;

    debug!("Loaded {} rules from {:?}", rules.len(), path);
    Ok(rules)
}

/// Parse rules from YAML text, preserving declaration order
pub fn parse_rules(content: &str) -> Result<Vec<Rule>> {
    let doc: Value = serde_yaml::from_str(content)
        .map_err(|e| PatchError::config(format!("invalid YAML: {e}")))?;

    let root = doc
        .as_mapping()
        .filter(|m| m.contains_key("rules"))
        .ok_or_else(|| PatchError::config("must be a YAML mapping with a 'rules' key"))?;

    let entries = match root.get("rules") {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Sequence(seq)) => seq.iter().collect(),
        Some(other) => vec![other],
    };

    entries.into_iter().map(rule_from_value).collect()
}

fn rule_from_value(raw: &Value) -> Result<Rule> {
    let raw = raw
        .as_mapping()
        .ok_or_else(|| PatchError::config("each rule must be a mapping"))?;

    let name = scalar_field(raw, "name")?.unwrap_or_else(|| DEFAULT_RULE_NAME.to_string());
    let file = scalar_field(raw, "file")?.unwrap_or_default();
    let spec_path = scalar_field(raw, "specPath")?.unwrap_or_default();

    let validations = match raw.get("validations") {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Sequence(seq)) => seq.clone(),
        Some(_) => {
            return Err(PatchError::config(format!(
                "rule '{name}': 'validations' must be a list"
            )))
        }
    };

    Rule::new(name, file, spec_path, validations)
}

/// Read a scalar field as a string.
///
/// Empty values count as absent: null, `""`, `0`, `false` and empty
/// collections. `true` reads as `True`.
fn scalar_field(raw: &Mapping, key: &str) -> Result<Option<String>> {
    match raw.get(key) {
        None | Some(Value::Null) | Some(Value::Bool(false)) => Ok(None),
        Some(Value::String(s)) if s.is_empty() => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(Value::Number(n)) if n.as_f64() == Some(0.0) => Ok(None),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(Value::Bool(true)) => Ok(Some("True".to_string())),
        Some(Value::Sequence(seq)) if seq.is_empty() => Ok(None),
        Some(Value::Mapping(map)) if map.is_empty() => Ok(None),
        Some(_) => Err(PatchError::config(format!("rule field '{key}' must be a scalar"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RULES: &str = r#"
rules:
  - name: sizeGB-immutable
    file: blockstorage.yaml
    specPath: sizeGB
    validations:
      - rule: "!oldSelf.hasValue() || self >= oldSelf.value()"
        message: sizeGB cannot decrease
  - file: storage.yaml
    specPath: storage.sizeGB
    validations:
      - rule: "self > 0"
"#;

    fn config_message(content: &str) -> String {
        match parse_rules(content) {
            Err(PatchError::Configuration(msg)) => msg,
            other => panic!("expected configuration error, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_rules_in_declared_order() {
        let rules = parse_rules(RULES).unwrap();
        assert_eq!(rules.len(), 2);

        assert_eq!(rules[0].name(), "sizeGB-immutable");
        assert_eq!(rules[0].file(), "blockstorage.yaml");
        assert_eq!(rules[0].spec_path(), "sizeGB");
        assert_eq!(rules[0].validations().len(), 1);
        assert_eq!(
            rules[0].validations()[0].get("message").and_then(Value::as_str),
            Some("sizeGB cannot decrease")
        );

        assert_eq!(rules[1].name(), DEFAULT_RULE_NAME);
        assert_eq!(rules[1].spec_path(), "storage.sizeGB");
    }

    #[test]
    fn test_duplicate_rules_are_kept() {
        let content = r#"
rules:
  - file: a.yaml
    specPath: x
    validations: [{rule: "self > 0"}]
  - file: a.yaml
    specPath: x
    validations: [{rule: "self > 0"}]
"#;
        let rules = parse_rules(content).unwrap();
        assert_eq!(rules.len(), 2);
        assert_eq!(rules[0], rules[1]);
    }

    #[test]
    fn test_root_must_be_mapping() {
        assert!(config_message("- a\n- b\n").contains("'rules' key"));
    }

    #[test]
    fn test_rules_key_required() {
        assert!(config_message("other: 1\n").contains("'rules' key"));
    }

    #[test]
    fn test_null_rules_yields_empty_list() {
        assert!(parse_rules("rules:\n").unwrap().is_empty());
    }

    #[test]
    fn test_single_rule_mapping_is_accepted() {
        let content = r#"
rules:
  file: a.yaml
  specPath: x
  validations: [{rule: "self > 0"}]
"#;
        assert_eq!(parse_rules(content).unwrap().len(), 1);
    }

    #[test]
    fn test_rule_entry_must_be_mapping() {
        assert!(config_message("rules:\n  - just-a-string\n").contains("must be a mapping"));
    }

    #[test]
    fn test_missing_required_fields() {
        let missing_file = "rules:\n  - name: r\n    specPath: x\n    validations: [{rule: a}]\n";
        assert!(config_message(missing_file).contains("rule 'r' missing 'file'"));

        let missing_path = "rules:\n  - name: r\n    file: a.yaml\n    validations: [{rule: a}]\n";
        assert!(config_message(missing_path).contains("missing 'specPath'"));

        let empty_validations = "rules:\n  - name: r\n    file: a.yaml\n    specPath: x\n    validations: []\n";
        assert!(config_message(empty_validations).contains("missing 'validations'"));

        let empty_file = "rules:\n  - name: r\n    file: ''\n    specPath: x\n    validations: [{rule: a}]\n";
        assert!(config_message(empty_file).contains("missing 'file'"));
    }

    #[test]
    fn test_empty_spec_path_segment_rejected() {
        for spec_path in ["a..b", ".a", "a."] {
            let content = format!(
                "rules:\n  - file: a.yaml\n    specPath: '{spec_path}'\n    validations: [{{rule: a}}]\n"
            );
            assert!(config_message(&content).contains("empty segment"));
        }
    }

    #[test]
    fn test_validation_entries_must_be_mappings() {
        let content = "rules:\n  - file: a.yaml\n    specPath: x\n    validations: [\"self > 0\"]\n";
        assert!(config_message(content).contains("must be a mapping"));
    }

    #[test]
    fn test_scalar_fields_are_stringified() {
        let content = "rules:\n  - name: 42\n    file: a.yaml\n    specPath: x\n    validations: [{rule: a}]\n";
        assert_eq!(parse_rules(content).unwrap()[0].name(), "42");
    }

    #[test]
    fn test_empty_scalars_count_as_absent() {
        for name in ["0", "false", "''", "[]"] {
            let content = format!(
                "rules:\n  - name: {name}\n    file: a.yaml\n    specPath: x\n    validations: [{{rule: a}}]\n"
            );
            assert_eq!(parse_rules(&content).unwrap()[0].name(), DEFAULT_RULE_NAME);
        }

        let zero_file = "rules:\n  - name: r\n    file: 0\n    specPath: x\n    validations: [{rule: a}]\n";
        assert!(config_message(zero_file).contains("missing 'file'"));

        let false_path = "rules:\n  - name: r\n    file: a.yaml\n    specPath: false\n    validations: [{rule: a}]\n";
        assert!(config_message(false_path).contains("missing 'specPath'"));
    }

    #[test]
    fn test_validations_must_be_a_list() {
        let content = "rules:\n  - name: r\n    file: a.yaml\n    specPath: x\n    validations:\n      rule: self > 0\n";
        assert!(config_message(content).contains("rule 'r': 'validations' must be a list"));
    }

    #[test]
    fn test_scalar_rules_value_rejected() {
        assert!(config_message("rules: 5\n").contains("each rule must be a mapping"));
        assert!(config_message("rules: just-text\n").contains("each rule must be a mapping"));
    }

    #[test]
    fn test_load_rules_from_file() {
        let temp_file = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(temp_file.path(), RULES).unwrap();

        let rules = load_rules(temp_file.path()).unwrap();
        assert_eq!(rules.len(), 2);
    }

    #[test]
    fn test_load_rules_names_the_file_on_error() {
        let temp_file = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(temp_file.path(), "rules:\n  - 1\n").unwrap();

        let err = load_rules(temp_file.path()).unwrap_err();
        assert!(err.is_configuration());
        assert!(err.to_string().contains("rules file"));
    }
}
