use clap::Parser;
use nodebaker::catalog::{Category, VariantId};
use nodebaker::cli::Args;
use nodebaker::config::PackageManager;
use std::ffi::OsString;
use std::path::PathBuf;

fn make_args(args: &[&str]) -> Vec<OsString> {
    let mut res = vec![OsString::from("nodebaker")];
    res.extend(args.iter().map(OsString::from));
    res
}

#[test]
fn test_basic_args() {
    let parsed = Args::try_parse_from(make_args(&["my-app"])).unwrap();

    assert_eq!(parsed.project_name.as_deref(), Some("my-app"));
    assert!(parsed.selections.is_empty());
    assert!(parsed.params.is_empty());
    assert!(parsed.package_manager.is_none());
    assert!(parsed.templates.is_none());
    assert!(!parsed.force);
    assert!(!parsed.verbose);
    assert!(!parsed.non_interactive);
    assert!(!parsed.skip_overwrite_check);
    assert!(!parsed.stdin);
}

#[test]
fn test_project_name_is_optional() {
    let parsed = Args::try_parse_from(make_args(&[])).unwrap();
    assert!(parsed.project_name.is_none());
}

#[test]
fn test_all_flags() {
    let args = make_args(&[
        "--force",
        "--verbose",
        "--non-interactive",
        "--skip-overwrite-check",
        "--stdin",
        "--package-manager",
        "pnpm",
        "--templates",
        "./templates",
        "--config",
        "./nodebaker.yml",
        "my-app",
    ]);
    let parsed = Args::try_parse_from(args).unwrap();

    assert!(parsed.force);
    assert!(parsed.verbose);
    assert!(parsed.non_interactive);
    assert!(parsed.skip_overwrite_check);
    assert!(parsed.stdin);
    assert_eq!(parsed.package_manager, Some(PackageManager::Pnpm));
    assert_eq!(parsed.templates, Some(PathBuf::from("./templates")));
    assert_eq!(parsed.config, Some(PathBuf::from("./nodebaker.yml")));
}

#[test]
fn test_short_flags() {
    let parsed = Args::try_parse_from(make_args(&["-f", "-v", "-y", "my-app"])).unwrap();

    assert!(parsed.force);
    assert!(parsed.verbose);
    assert!(parsed.non_interactive);
}

#[test]
fn test_selections() {
    let args = make_args(&["-s", "db=sqlite", "--select", "server = express", "my-app"]);
    let parsed = Args::try_parse_from(args).unwrap();

    let selection = parsed.selection_set();
    assert_eq!(selection.len(), 2);
    assert_eq!(selection.get(Category::Db), Some(&VariantId::new("sqlite")));
    assert_eq!(selection.get(Category::Server), Some(&VariantId::new("express")));
}

#[test]
fn test_later_selection_wins() {
    let args = make_args(&["-s", "db=sqlite", "-s", "db=mysql", "my-app"]);
    let parsed = Args::try_parse_from(args).unwrap();

    assert_eq!(parsed.selection_set().get(Category::Db), Some(&VariantId::new("mysql")));
}

#[test]
fn test_invalid_selection() {
    assert!(Args::try_parse_from(make_args(&["-s", "sqlite", "my-app"])).is_err());
    assert!(Args::try_parse_from(make_args(&["-s", "orm=prisma", "my-app"])).is_err());
    assert!(Args::try_parse_from(make_args(&["-s", "db=", "my-app"])).is_err());
}

#[test]
fn test_parameters() {
    let args = make_args(&[
        "-p",
        "port=5000",
        "--param",
        "databaseUrl=postgres://u:p@host/db?ssl=true",
        "-p",
        "port=8080",
        "my-app",
    ]);
    let parsed = Args::try_parse_from(args).unwrap();

    let params = parsed.parameters();
    assert_eq!(params.len(), 2);
    assert_eq!(params.get("port").map(String::as_str), Some("8080"));
    assert_eq!(
        params.get("databaseUrl").map(String::as_str),
        Some("postgres://u:p@host/db?ssl=true")
    );
}

#[test]
fn test_invalid_parameter() {
    assert!(Args::try_parse_from(make_args(&["-p", "port", "my-app"])).is_err());
    assert!(Args::try_parse_from(make_args(&["-p", "=5000", "my-app"])).is_err());
}

#[test]
fn test_unknown_package_manager() {
    assert!(Args::try_parse_from(make_args(&["--package-manager", "cargo", "my-app"])).is_err());
}
