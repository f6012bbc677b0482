//! End-to-end CLI tests for cmdkit.
//!
//! Every test runs the real binary with colors off and an empty config
//! directory, so output is plain and independent of the host setup.

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use tempfile::TempDir;

/// Get a command pointing to the cmdkit binary with an isolated config dir
fn cmdkit(config_home: &TempDir) -> Command {
    let mut cmd = cargo_bin_cmd!("cmdkit");
    cmd.env("XDG_CONFIG_HOME", config_home.path())
        .env("NO_COLOR", "1")
        .env_remove("CMDKIT_LOG")
        .env_remove("CMDKIT_COLOR")
        .env_remove("RUST_LOG");
    cmd
}

fn home() -> TempDir {
    TempDir::new().expect("temp dir")
}

// ============================================
// Basic CLI Tests
// ============================================

mod cli_basics {
    use super::*;

    #[test]
    fn shows_help() {
        let home = home();
        cmdkit(&home)
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::starts_with(
                "usage: cmdkit [--version] [--help] <command> [<args>]",
            ))
            .stdout(predicate::str::contains("General commands"))
            .stdout(predicate::str::contains("    start          start a workspace project"))
            .stdout(predicate::str::contains("status"))
            .stdout(predicate::str::contains(
                "Please use 'cmdkit <command> --help' for more information",
            ));
    }

    #[test]
    fn no_arguments_shows_help() {
        let home = home();
        cmdkit(&home)
            .assert()
            .success()
            .stdout(predicate::str::contains("General commands"));
    }

    #[test]
    fn help_is_stable_across_runs() {
        let home = home();
        let first = cmdkit(&home).arg("-h").output().expect("run");
        let second = cmdkit(&home).arg("-h").output().expect("run");
        assert_eq!(first.stdout, second.stdout);
    }

    #[test]
    fn shows_version() {
        let home = home();
        for flag in ["--version", "-v", "-V"] {
            cmdkit(&home)
                .arg(flag)
                .assert()
                .success()
                .stdout(format!(
                    "you are using {} for now.\n",
                    env!("CARGO_PKG_VERSION")
                ));
        }
    }
}

// ============================================
// Command help
// ============================================

mod command_help {
    use super::*;

    #[test]
    fn start_help_layout() {
        let home = home();
        cmdkit(&home)
            .args(["start", "--help"])
            .assert()
            .success()
            .stdout(predicate::str::starts_with(
                "cmdkit start <project> [component]\n\nstart a workspace project\n",
            ))
            .stdout(predicate::str::contains(
                "\nArguments:\n  <project>    project name\n  [component]  component name\n",
            ))
            .stdout(predicate::str::contains("\nOptions:\n"))
            .stdout(predicate::str::contains("--force"))
            .stdout(predicate::str::contains("\nExamples:\n  cmdkit start web"))
            .stdout(predicate::str::contains("\nGlobal:\n"))
            .stdout(predicate::str::contains("--log"))
            .stdout(predicate::str::contains("Staring...").not())
            .stderr(predicate::str::is_empty());
    }

    #[test]
    fn help_with_missing_argument_still_succeeds() {
        let home = home();
        cmdkit(&home)
            .args(["start", "-h"])
            .assert()
            .success()
            .stdout(predicate::str::contains("cmdkit start <project> [component]"))
            .stderr(predicate::str::is_empty());
    }

    #[test]
    fn status_help_shows_extended_description_and_json() {
        let home = home();
        cmdkit(&home)
            .args(["st", "--help"])
            .assert()
            .success()
            .stdout(predicate::str::contains(
                "Without a project name the whole workspace is reported.",
            ))
            .stdout(predicate::str::contains("--json"));
    }
}

// ============================================
// Dispatch
// ============================================

mod dispatch {
    use super::*;

    #[test]
    fn start_reports_final_data() {
        let home = home();
        cmdkit(&home)
            .args(["start", "web", "--force"])
            .assert()
            .success()
            .stdout("Final data is:\n\"Final Data\"\n")
            .stderr(predicate::str::contains("Succeed..."));
    }

    #[test]
    fn status_report() {
        let home = home();
        cmdkit(&home)
            .arg("status")
            .assert()
            .success()
            .stdout("project workspace is idle\n");
    }

    #[test]
    fn status_alias_and_exit_code() {
        let home = home();
        cmdkit(&home)
            .args(["st", "web", "--fail"])
            .assert()
            .code(2)
            .stdout("project web is idle\n");
    }

    #[test]
    fn status_json_unwraps_data() {
        let home = home();
        cmdkit(&home)
            .args(["status", "web", "--json"])
            .assert()
            .success()
            .stdout("{\n  \"project\": \"web\",\n  \"state\": \"idle\"\n}\n");
    }

    #[test]
    fn start_has_no_json_mode() {
        let home = home();
        cmdkit(&home)
            .args(["start", "web", "--json"])
            .assert()
            .code(1)
            .stdout(predicate::str::contains("cmdkit start <project> [component]"))
            .stderr(predicate::str::contains("--json"));
    }
}

// ============================================
// Logging
// ============================================

mod logging {
    use super::*;

    #[test]
    fn log_flag_prints_debug_lines() {
        let home = home();
        cmdkit(&home)
            .args(["start", "web", "--log"])
            .assert()
            .success()
            .stdout("Final data is:\n\"Final Data\"\n")
            .stderr(predicate::str::contains("started a new command: \"start\""))
            .stderr(predicate::str::contains("DEBUG"));
    }

    #[test]
    fn debug_lines_are_hidden_by_default() {
        let home = home();
        cmdkit(&home)
            .args(["start", "web"])
            .assert()
            .success()
            .stderr(predicate::str::contains("started a new command").not());
    }

    #[test]
    fn json_keeps_stdout_pure_even_with_log() {
        let home = home();
        cmdkit(&home)
            .args(["status", "web", "--json", "--log"])
            .assert()
            .success()
            .stdout("{\n  \"project\": \"web\",\n  \"state\": \"idle\"\n}\n")
            .stderr(predicate::str::contains("started a new command").not());
    }
}

// ============================================
// Errors
// ============================================

mod errors {
    use super::*;

    #[test]
    fn unknown_command_suggests() {
        let home = home();
        cmdkit(&home)
            .arg("stat")
            .assert()
            .code(1)
            .stdout(predicate::str::is_empty())
            .stderr(predicate::str::contains("'stat' is not a valid command."))
            .stderr(predicate::str::contains("Did you mean status?"))
            .stderr(predicate::str::contains("use the '--log' flag for the full error."));
    }

    #[test]
    fn unknown_flag_fails_with_help() {
        let home = home();
        cmdkit(&home)
            .args(["status", "--bogus"])
            .assert()
            .code(1)
            .stdout(predicate::str::contains("cmdkit status [project]"))
            .stderr(predicate::str::contains("--bogus"));
    }

    #[test]
    fn missing_required_argument() {
        let home = home();
        cmdkit(&home)
            .arg("start")
            .assert()
            .code(1)
            .stderr(predicate::str::contains("<project>"));
    }

    #[test]
    fn invalid_config_file_warns_and_continues() {
        let home = home();
        let dir = home.path().join("cmdkit");
        std::fs::create_dir_all(&dir).expect("config dir");
        std::fs::write(dir.join("config.toml"), "color = 3\n").expect("config file");

        cmdkit(&home)
            .arg("status")
            .assert()
            .success()
            .stdout("project workspace is idle\n")
            .stderr(predicate::str::contains("[cmdkit][warn] Failed to parse"));
    }
}
