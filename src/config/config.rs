//! Patch run configuration and validation

use celpatch_crd::{PatchMode, YamlFormat};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::{CelPatchError, CelPatchResult};

/// Settings for one patch run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatchConfig {
    /// YAML file describing the validations to apply
    pub rules_path: PathBuf,

    /// Directory the rules' `file` entries are relative to
    pub crd_root: PathBuf,

    /// Only report what would change
    #[serde(default)]
    pub dry_run: bool,

    /// Serializer settings for rewritten files
    #[serde(default)]
    pub format: YamlFormat,
}

impl PatchConfig {
    pub fn new(rules_path: impl Into<PathBuf>, crd_root: impl Into<PathBuf>) -> Self {
        Self {
            rules_path: rules_path.into(),
            crd_root: crd_root.into(),
            dry_run: false,
            format: YamlFormat::default(),
        }
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn with_format(mut self, format: YamlFormat) -> Self {
        self.format = format;
        self
    }

    pub fn mode(&self) -> PatchMode {
        if self.dry_run {
            PatchMode::DryRun
        } else {
            PatchMode::Write
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> CelPatchResult<()> {
        if !self.rules_path.is_file() {
            return Err(CelPatchError::Config(format!(
                "Rules file not found: {:?}",
                self.rules_path
            )));
        }

        if !self.crd_root.is_dir() {
            return Err(CelPatchError::Config(format!(
                "CRD root is not a directory: {:?}",
                self.crd_root
            )));
        }

        Ok(())
    }
}
