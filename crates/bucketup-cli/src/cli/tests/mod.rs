//! CLI parse tests.

use super::Cli;
use clap::Parser;
use std::path::Path;

fn parse(args: &[&str]) -> Cli {
    Cli::try_parse_from(args).unwrap()
}

#[test]
fn cli_parse_version_only() {
    let cli = parse(&["bucketup", "7.2.1.78900"]);
    assert_eq!(cli.version, "7.2.1.78900");
    assert!(!cli.keep_temp);
    assert!(cli.config.is_none());
    assert!(cli.manifest.is_none());
}

#[test]
fn cli_parse_keep_temp() {
    let cli = parse(&["bucketup", "--keep-temp", "7.2.1.78900"]);
    assert!(cli.keep_temp);
    let cli = parse(&["bucketup", "7.2.1.78900", "--keep-temp"]);
    assert!(cli.keep_temp);
}

#[test]
fn cli_parse_overrides() {
    let cli = parse(&[
        "bucketup",
        "1.2.3",
        "--config",
        "/etc/bucketup.toml",
        "--manifest",
        "bucket/app.json",
    ]);
    assert_eq!(cli.config.as_deref(), Some(Path::new("/etc/bucketup.toml")));
    assert_eq!(cli.manifest.as_deref(), Some(Path::new("bucket/app.json")));
}

#[test]
fn cli_requires_version() {
    assert!(Cli::try_parse_from(["bucketup"]).is_err());
    assert!(Cli::try_parse_from(["bucketup", "--keep-temp"]).is_err());
}

#[test]
fn cli_rejects_empty_version() {
    assert!(Cli::try_parse_from(["bucketup", ""]).is_err());
}

#[test]
fn cli_run_with_missing_config_file_fails() {
    let path = missing_config_path();
    let cli = parse(&["bucketup", "1.0", "--config", path.as_str()]);
    let err = cli.run().unwrap_err();
    assert!(format!("{:#}", err).contains("read config"));
}

fn missing_config_path() -> String {
    std::env::temp_dir()
        .join("bucketup-cli-test-no-such-config.toml")
        .display()
        .to_string()
}
