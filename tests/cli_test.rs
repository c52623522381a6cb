use celpatch::cli::{utils, CliApp};
use celpatch_crd::DocumentStart;
use std::path::PathBuf;

#[test]
fn test_patch_arguments_build_config() {
    let matches = CliApp::app()
        .try_get_matches_from([
            "celpatch",
            "patch",
            "--rules",
            "validations.yaml",
            "--root",
            "generated/crds",
            "--dry-run",
            "--document-start",
            "always",
        ])
        .unwrap();

    let (name, sub_matches) = matches.subcommand().unwrap();
    assert_eq!(name, "patch");

    let config = utils::patch_config(sub_matches).unwrap();
    assert_eq!(config.rules_path, PathBuf::from("validations.yaml"));
    assert_eq!(config.crd_root, PathBuf::from("generated/crds"));
    assert!(config.dry_run);
    assert_eq!(config.format.document_start, DocumentStart::Always);
}

#[test]
fn test_patch_defaults() {
    let matches = CliApp::app()
        .try_get_matches_from(["celpatch", "patch", "-r", "rules.yaml", "--root", "crds"])
        .unwrap();

    let config = utils::patch_config(matches.subcommand_matches("patch").unwrap()).unwrap();
    assert!(!config.dry_run);
    assert_eq!(config.format.document_start, DocumentStart::Preserve);
}

#[test]
fn test_patch_requires_rules_and_root() {
    assert!(CliApp::app()
        .try_get_matches_from(["celpatch", "patch", "--root", "crds"])
        .is_err());
    assert!(CliApp::app()
        .try_get_matches_from(["celpatch", "patch", "--rules", "rules.yaml"])
        .is_err());
}

#[test]
fn test_validate_command_loads_rules() {
    let dir = tempfile::TempDir::new().unwrap();
    let rules = dir.path().join("rules.yaml");
    std::fs::write(
        &rules,
        "rules:\n  - file: a.yaml\n    specPath: x\n    validations: [{rule: 'self > 0'}]\n",
    )
    .unwrap();

    let matches = CliApp::app()
        .try_get_matches_from(["celpatch", "validate", "--rules", rules.to_str().unwrap()])
        .unwrap();
    assert!(CliApp::run(&matches).is_ok());
}

#[test]
fn test_replace_refs_command_rewrites_file() {
    let dir = tempfile::TempDir::new().unwrap();
    let source = dir.path().join("types.go");
    std::fs::write(&source, "type Spec struct {\n\tSku Reference\n}\n").unwrap();

    let matches = CliApp::app()
        .try_get_matches_from(["celpatch", "replace-refs", source.to_str().unwrap()])
        .unwrap();
    CliApp::run(&matches).unwrap();

    assert_eq!(
        std::fs::read_to_string(&source).unwrap(),
        "type Spec struct {\n\tSku ReferenceObject\n}\n"
    );
}
