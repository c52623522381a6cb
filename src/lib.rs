//! Celpatch Library
//!
//! Injects CEL validation rules (`x-kubernetes-validations`) into generated
//! Kubernetes CustomResourceDefinitions, so validations that are awkward to
//! express in the generator's source types survive every regeneration.

pub mod cli;
pub mod config;

pub use celpatch_crd::{
    load_rules, patch_file, PatchError, PatchMode, PatchOutcome, Rule, YamlFormat,
};
pub use config::PatchConfig;

use std::fmt;
use std::path::PathBuf;
use tracing::info;

/// Main application context that applies rules to a CRD tree
pub struct CelPatch {
    config: PatchConfig,
}

impl CelPatch {
    /// Create a new instance, validating the configuration first
    pub fn new(config: PatchConfig) -> CelPatchResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Load the configured rules file
    pub fn load_rules(&self) -> CelPatchResult<Vec<Rule>> {
        Ok(load_rules(&self.config.rules_path)?)
    }

    /// Apply every rule in declaration order.
    ///
    /// `on_report` is called after each rule, before the next one starts,
    /// so outcomes already reported survive a later fatal error.
    pub fn run<F>(&self, mut on_report: F) -> CelPatchResult<PatchSummary>
    where
        F: FnMut(&RuleReport),
    {
        let rules = self.load_rules()?;
        info!(
            "Applying {} rules from {:?} to {:?}",
            rules.len(),
            self.config.rules_path,
            self.config.crd_root
        );

        let mode = self.config.mode();
        let mut summary = PatchSummary {
            total_rules: rules.len(),
            ..PatchSummary::default()
        };

        for rule in &rules {
            let path = self.config.crd_root.join(rule.file());
            let outcome = patch_file(&path, rule, &self.config.format, mode)?;

            if outcome.is_change() {
                summary.patched_files += 1;
            } else if outcome == PatchOutcome::Missing {
                summary.missing_files += 1;
            }

            on_report(&RuleReport {
                rule_name: rule.name().to_string(),
                path,
                outcome,
                mode,
            });
        }

        info!(
            "Patched {} files, {} missing",
            summary.patched_files, summary.missing_files
        );
        Ok(summary)
    }
}

/// Outcome of one rule
#[derive(Debug, Clone)]
pub struct RuleReport {
    pub rule_name: String,
    pub path: PathBuf,
    pub outcome: PatchOutcome,
    pub mode: PatchMode,
}

impl RuleReport {
    /// The line printed for this outcome, if any
    pub fn status_line(&self) -> Option<String> {
        let path = self.path.display();
        match (self.outcome, self.mode) {
            (PatchOutcome::Missing, _) => Some(format!(
                "[WARN] rule '{}': file not found: {path}",
                self.rule_name
            )),
            (PatchOutcome::Patched, _) => Some(format!("[PATCHED] {path}")),
            (PatchOutcome::WouldPatch, _) => Some(format!("[DRY-RUN] would patch {path}")),
            (PatchOutcome::Unchanged, PatchMode::DryRun) => {
                Some(format!("[DRY-RUN] unchanged {path}"))
            }
            (PatchOutcome::Unchanged, PatchMode::Write) => None,
        }
    }
}

/// Totals for a patch run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatchSummary {
    /// Rule applications that changed (or would change) a file
    pub patched_files: usize,
    pub total_rules: usize,
    pub missing_files: usize,
}

impl fmt::Display for PatchSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "patched_files={} rules={}",
            self.patched_files, self.total_rules
        )
    }
}

/// Application error types
#[derive(thiserror::Error, Debug)]
pub enum CelPatchError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Patch(#[from] PatchError),
}

/// Result type for the main application
pub type CelPatchResult<T> = Result<T, CelPatchError>;
