#![allow(clippy::unwrap_used)]
//! CLI smoke tests to verify basic command functionality.
//!
//! These tests ensure that the CLI binary starts correctly and
//! responds to basic commands without crashing. None of them reach the
//! network: every translate invocation fails during configuration.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

const CATALOG: &str = r#"{
  "sourceLanguage" : "en",
  "strings" : {
    "Hello" : {
      "localizations" : {
        "de" : {
          "stringUnit" : {
            "state" : "translated",
            "value" : "Hallo"
          }
        }
      }
    },
    "Goodbye" : {
      "localizations" : {
        "de" : {
          "stringUnit" : {
            "state" : "new",
            "value" : ""
          }
        }
      }
    }
  },
  "version" : "1.0"
}
"#;

#[allow(deprecated)]
fn xctr(config_home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("xctr").unwrap();
    cmd.env("XDG_CONFIG_HOME", config_home.path())
        .env_remove("DEEPL_AUTH_KEY")
        .arg("--no-color");
    cmd
}

fn catalog_dir() -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("Localizable.xcstrings"), CATALOG).unwrap();
    dir
}

#[test]
fn test_help_displays_usage() {
    let home = TempDir::new().unwrap();
    xctr(&home)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Resumable DeepL translation for Xcode string catalogs",
        ))
        .stdout(predicate::str::contains("--to"))
        .stdout(predicate::str::contains("--batch-size"))
        .stdout(predicate::str::contains("--on-error"));
}

#[test]
fn test_version_displays_version() {
    let home = TempDir::new().unwrap();
    xctr(&home)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_languages_list() {
    let home = TempDir::new().unwrap();
    xctr(&home)
        .arg("languages")
        .assert()
        .success()
        .stdout(predicate::str::contains("Supported languages"))
        .stdout(predicate::str::contains("German"))
        .stdout(predicate::str::contains("pt-BR"));
}

#[test]
fn test_status_reports_language_completion() {
    let home = TempDir::new().unwrap();
    let dir = catalog_dir();
    xctr(&home)
        .arg("status")
        .arg(dir.path().join("Localizable.xcstrings"))
        .assert()
        .success()
        .stdout(predicate::str::contains("English (en)"))
        .stdout(predicate::str::contains(
            "German (de): 50.0% translated (1 remaining)",
        ));
}

#[test]
fn test_status_discovers_catalog_in_current_directory() {
    let home = TempDir::new().unwrap();
    let dir = catalog_dir();
    xctr(&home)
        .current_dir(dir.path())
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("German (de)"));
}

#[test]
fn test_status_without_catalog_fails() {
    let home = TempDir::new().unwrap();
    let empty = TempDir::new().unwrap();
    xctr(&home)
        .current_dir(empty.path())
        .arg("status")
        .assert()
        .failure()
        .stderr(predicate::str::contains("No Localizable.xcstrings files found"));
}

#[test]
fn test_missing_api_key_fails_before_network() {
    let home = TempDir::new().unwrap();
    let dir = catalog_dir();
    xctr(&home)
        .current_dir(dir.path())
        .args(["--to", "de"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Missing DeepL API key"));
}

#[test]
fn test_invalid_batch_size_fails_before_network() {
    let home = TempDir::new().unwrap();
    let dir = catalog_dir();
    xctr(&home)
        .current_dir(dir.path())
        .args(["--api-key", "dummy", "--to", "de", "--batch-size", "51"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid batch size"));
}

#[test]
fn test_invalid_formality_fails_before_network() {
    let home = TempDir::new().unwrap();
    xctr(&home)
        .args(["--api-key", "dummy", "--formality", "polite"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid formality"));
}

#[test]
fn test_configure_show_without_config() {
    let home = TempDir::new().unwrap();
    xctr(&home)
        .args(["configure", "--show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration"))
        .stdout(predicate::str::contains("DEEPL_AUTH_KEY"))
        .stdout(predicate::str::contains("batch_size"));
}

#[test]
fn test_invalid_on_error_value() {
    let home = TempDir::new().unwrap();
    xctr(&home)
        .args(["--on-error", "explode"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value"));
}
