//! Patch command implementation

use crate::cli::utils;
use anyhow::Result;
use clap::{ArgMatches, Command};
use tracing::info;

pub fn command() -> Command {
    Command::new("patch")
        .about("Inject x-kubernetes-validations into generated CRDs")
        .arg(
            clap::Arg::new("rules")
                .short('r')
                .long("rules")
                .help("Path to YAML file describing validations to apply")
                .value_name("FILE")
                .required(true),
        )
        .arg(
            clap::Arg::new("root")
                .long("root")
                .help("Root directory containing generated CRD YAMLs")
                .value_name("DIR")
                .required(true),
        )
        .arg(
            clap::Arg::new("dry-run")
                .long("dry-run")
                .help("Don't write files, only report what would change")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            clap::Arg::new("document-start")
                .long("document-start")
                .help("Whether rewritten files start with a '---' marker")
                .value_name("POLICY")
                .value_parser(["preserve", "always", "never"])
                .default_value("preserve"),
        )
}

pub fn run(matches: &ArgMatches) -> Result<()> {
    let config = utils::patch_config(matches)?;
    if config.dry_run {
        info!("Dry run mode - no files will be written");
    }

    let app = utils::create_app(config)?;
    let summary = app.run(|report| {
        if let Some(line) = report.status_line() {
            println!("{line}");
        }
    })?;

    println!("{summary}");
    Ok(())
}
