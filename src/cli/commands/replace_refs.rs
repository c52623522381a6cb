//! Replace-refs command implementation

use crate::cli::utils;
use anyhow::Result;
use celpatch_refs::{rewrite_file, DEFAULT_FROM, DEFAULT_TO};
use clap::{ArgMatches, Command};

pub fn command() -> Command {
    Command::new("replace-refs")
        .about("Rename a field type inside Go struct definitions")
        .arg(
            clap::Arg::new("file")
                .help("Go source file to rewrite in place")
                .value_name("FILE")
                .required(true),
        )
        .arg(
            clap::Arg::new("from")
                .long("from")
                .help("Type name to replace")
                .value_name("NAME")
                .default_value(DEFAULT_FROM),
        )
        .arg(
            clap::Arg::new("to")
                .long("to")
                .help("Replacement type name")
                .value_name("NAME")
                .default_value(DEFAULT_TO),
        )
}

pub fn run(matches: &ArgMatches) -> Result<()> {
    let path = utils::path_arg(matches, "file")?;
    let from = matches
        .get_one::<String>("from")
        .map(String::as_str)
        .unwrap_or(DEFAULT_FROM);
    let to = matches
        .get_one::<String>("to")
        .map(String::as_str)
        .unwrap_or(DEFAULT_TO);

    if rewrite_file(&path, from, to)? {
        println!("[REWRITTEN] {}", path.display());
    } else {
        println!("[UNCHANGED] {}", path.display());
    }

    Ok(())
}
