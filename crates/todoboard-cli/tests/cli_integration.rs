use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::Path;
use tempfile::{tempdir, TempDir};

/// A `todoboard` command isolated from the user's config and environment.
fn todoboard(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("todoboard").unwrap();
    cmd.env("XDG_CONFIG_HOME", home.path().join("config"))
        .env("XDG_DATA_HOME", home.path().join("data"))
        .env_remove("TODOBOARD_STORAGE")
        .env_remove("TODOBOARD_API_URL")
        .env_remove("TODOBOARD_DEBOUNCE_MS")
        .env_remove("TODOBOARD_DEBUG_LOG");
    cmd
}

fn key_cmd(home: &TempDir, storage: &Path, args: &[&str]) -> Command {
    let mut cmd = todoboard(home);
    cmd.arg("--storage").arg(storage).arg("key").args(args);
    cmd
}

fn read_storage(path: &Path) -> Value {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

fn parse_json_output(output: &[u8]) -> Value {
    serde_json::from_slice(output).expect("Failed to parse JSON output")
}

mod key_tests {
    use super::*;

    #[test]
    fn test_status_without_storage_file() {
        let home = tempdir().unwrap();
        let storage = home.path().join("storage.json");

        let output = key_cmd(&home, &storage, &["status"])
            .assert()
            .success()
            .get_output()
            .stdout
            .clone();

        let json = parse_json_output(&output);
        assert!(json["success"].as_bool().unwrap());
        assert_eq!(json["data"]["stored"], false);
        assert!(!storage.exists());
    }

    #[test]
    fn test_set_then_status_then_clear() {
        let home = tempdir().unwrap();
        let storage = home.path().join("storage.json");

        key_cmd(&home, &storage, &["set", "  0123abcd  "])
            .assert()
            .success()
            .stdout(predicate::str::contains("0123abcd").not());

        let persisted = read_storage(&storage);
        assert_eq!(persisted["TODOIST_API_KEY"], "0123abcd");

        let output = key_cmd(&home, &storage, &["status"])
            .assert()
            .success()
            .get_output()
            .stdout
            .clone();
        assert_eq!(parse_json_output(&output)["data"]["stored"], true);

        let output = key_cmd(&home, &storage, &["clear"])
            .assert()
            .success()
            .get_output()
            .stdout
            .clone();
        assert_eq!(parse_json_output(&output)["data"]["removed"], true);

        let output = key_cmd(&home, &storage, &["clear"])
            .assert()
            .success()
            .get_output()
            .stdout
            .clone();
        assert_eq!(parse_json_output(&output)["data"]["removed"], false);
    }

    #[test]
    fn test_set_keeps_other_entries() {
        let home = tempdir().unwrap();
        let storage = home.path().join("storage.json");
        fs::write(&storage, r#"{"theme":"dark"}"#).unwrap();

        key_cmd(&home, &storage, &["set", "tok"]).assert().success();

        let persisted = read_storage(&storage);
        assert_eq!(persisted["theme"], "dark");
        assert_eq!(persisted["TODOIST_API_KEY"], "tok");
    }

    #[test]
    fn test_blank_key_is_rejected() {
        let home = tempdir().unwrap();
        let storage = home.path().join("storage.json");

        let output = key_cmd(&home, &storage, &["set", "   "])
            .assert()
            .failure()
            .get_output()
            .stderr
            .clone();

        let json = parse_json_output(&output);
        assert_eq!(json["success"], false);
        assert!(json["error"].as_str().unwrap().contains("must not be empty"));
        assert!(!storage.exists());
    }

    #[test]
    fn test_non_string_credential_reports_not_stored() {
        let home = tempdir().unwrap();
        let storage = home.path().join("storage.json");
        fs::write(&storage, r#"{"TODOIST_API_KEY":42}"#).unwrap();

        let output = key_cmd(&home, &storage, &["status"])
            .assert()
            .success()
            .get_output()
            .stdout
            .clone();
        assert_eq!(parse_json_output(&output)["data"]["stored"], false);
    }

    #[test]
    fn test_corrupt_storage_fails_set() {
        let home = tempdir().unwrap();
        let storage = home.path().join("storage.json");
        fs::write(&storage, "{not json").unwrap();

        key_cmd(&home, &storage, &["set", "tok"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("\"success\":false"));

        assert_eq!(fs::read_to_string(&storage).unwrap(), "{not json");
    }

    #[test]
    fn test_storage_from_environment() {
        let home = tempdir().unwrap();
        let storage = home.path().join("env-storage.json");

        todoboard(&home)
            .env("TODOBOARD_STORAGE", &storage)
            .args(["key", "set", "tok"])
            .assert()
            .success();

        assert!(storage.exists());
    }
}

mod misc_tests {
    use super::*;

    #[test]
    fn test_help_lists_subcommands() {
        let home = tempdir().unwrap();
        todoboard(&home)
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("key"))
            .stdout(predicate::str::contains("completions"))
            .stdout(predicate::str::contains("--route"));
    }

    #[test]
    fn test_version_includes_commit() {
        let home = tempdir().unwrap();
        todoboard(&home)
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::starts_with("todoboard 0.1.0 ("));
    }

    #[test]
    fn test_bash_completions() {
        let home = tempdir().unwrap();
        todoboard(&home)
            .args(["completions", "bash"])
            .assert()
            .success()
            .stdout(predicate::str::contains("todoboard"));
    }

    #[test]
    fn test_debug_log_written_to_file() {
        let home = tempdir().unwrap();
        let storage = home.path().join("storage.json");
        let log = home.path().join("debug.log");

        key_cmd(&home, &storage, &["set", "tok"])
            .env("TODOBOARD_DEBUG_LOG", &log)
            .assert()
            .success();

        let contents = fs::read_to_string(&log).unwrap();
        assert!(contents.contains("Stored API key"));
        assert!(!contents.contains("tok\""));
    }
}
