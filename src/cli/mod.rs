//! CLI command implementations

use anyhow::Result;
use clap::{ArgMatches, Command};

pub mod commands;

/// Main CLI application
pub struct CliApp;

impl CliApp {
    /// Create the CLI application
    pub fn app() -> Command {
        Command::new("celpatch")
            .version(env!("CARGO_PKG_VERSION"))
            .about("Patch generated CRDs with CEL validations")
            .subcommand(commands::patch::command())
            .subcommand(commands::validate::command())
            .subcommand(commands::replace_refs::command())
    }

    /// Run the CLI application
    pub fn run(matches: &ArgMatches) -> Result<()> {
        match matches.subcommand() {
            Some(("patch", sub_matches)) => commands::patch::run(sub_matches),
            Some(("validate", sub_matches)) => commands::validate::run(sub_matches),
            Some(("replace-refs", sub_matches)) => commands::replace_refs::run(sub_matches),
            _ => {
                // No subcommand provided, show help
                let _ = Self::app().print_help();
                Ok(())
            }
        }
    }
}

/// Common CLI utilities
pub mod utils {
    use anyhow::{anyhow, Result};
    use celpatch_crd::{DocumentStart, YamlFormat};
    use std::path::PathBuf;

    /// Get a required path argument
    pub fn path_arg(matches: &clap::ArgMatches, name: &str) -> Result<PathBuf> {
        matches
            .get_one::<String>(name)
            .map(PathBuf::from)
            .ok_or_else(|| anyhow!("Missing required argument: {}", name))
    }

    /// Build the run configuration from `patch` arguments
    pub fn patch_config(matches: &clap::ArgMatches) -> Result<crate::PatchConfig> {
        let document_start = match matches.get_one::<String>("document-start") {
            Some(value) => value.parse::<DocumentStart>()?,
            None => DocumentStart::default(),
        };

        Ok(
            crate::PatchConfig::new(path_arg(matches, "rules")?, path_arg(matches, "root")?)
                .with_dry_run(matches.get_flag("dry-run"))
                .with_format(YamlFormat::new(document_start)),
        )
    }

    /// Create CelPatch instance
    pub fn create_app(config: crate::PatchConfig) -> Result<crate::CelPatch> {
        Ok(crate::CelPatch::new(config)?)
    }
}
