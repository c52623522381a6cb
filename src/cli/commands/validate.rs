//! Validate command implementation

use crate::cli::utils;
use anyhow::Result;
use clap::{ArgMatches, Command};
use tracing::info;

pub fn command() -> Command {
    Command::new("validate")
        .about("Validate a rules file without touching any CRD")
        .arg(
            clap::Arg::new("rules")
                .short('r')
                .long("rules")
                .help("Path to YAML file describing validations to apply")
                .value_name("FILE")
                .required(true),
        )
}

pub fn run(matches: &ArgMatches) -> Result<()> {
    let rules_path = utils::path_arg(matches, "rules")?;
    info!("Validating rules file {:?}", rules_path);

    let rules = crate::load_rules(&rules_path)?;

    println!("Rules file is valid!");
    println!("Rules: {}", rules.len());

    for rule in &rules {
        println!(
            "  - {}: {} @ {} ({} validations)",
            rule.name(),
            rule.file(),
            rule.spec_path(),
            rule.validations().len()
        );
    }

    Ok(())
}
