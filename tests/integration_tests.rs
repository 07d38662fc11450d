//! Integration Tests

use std::collections::HashMap;
use std::io;
use std::path::PathBuf;

use assert_cli::Assert;
use lazy_static::lazy_static;
use tempdir::TempDir;

trait AssertExt {
    fn exit_status_is(self, exit_status: i32) -> Self;
}

impl AssertExt for Assert {
    fn exit_status_is(self, exit_status: i32) -> Self {
        if exit_status == 0 {
            self.succeeds()
        } else {
            self.fails_with(exit_status)
        }
    }
}

struct ScriptData<'a> {
    pub stdout: &'a str,
    pub exit_status: i32,
}

lazy_static! {
    static ref MSH_SCRIPTS_MAP: HashMap<&'static str, ScriptData<'static>> = {
        let mut map = HashMap::new();
        map.insert("simple_echo.msh", ScriptData { stdout: "test", exit_status: 0 });
        map.insert("comments.msh", ScriptData { stdout: "after comments", exit_status: 0 });
        map.insert("status_failure.msh", ScriptData { stdout: "exit value 1", exit_status: 0 });
        map.insert("exit_status_passthrough.msh", ScriptData { stdout: "", exit_status: 1 });
        map
    };
}

#[test]
fn test_simple_msh_scripts() {
    for (filename, expected_data) in MSH_SCRIPTS_MAP.iter() {
        Assert::cargo_binary("msh")
            .with_args(&[unicode_path(&fixture_script(filename))])
            .stdout()
            .contains(expected_data.stdout)
            .exit_status_is(expected_data.exit_status)
            .unwrap();
    }
}

#[test]
fn test_pid_expansion_replaces_sentinel() {
    Assert::cargo_binary("msh")
        .with_args(&["-c", "echo $$"])
        .stdout()
        .doesnt_contain("$")
        .succeeds()
        .unwrap();
}

#[test]
fn test_command_string_exit_status() {
    Assert::cargo_binary("msh")
        .with_args(&["-c", "echo hello"])
        .stdout()
        .is("hello")
        .succeeds()
        .unwrap();

    Assert::cargo_binary("msh")
        .with_args(&["-c", "false"])
        .exit_status_is(1)
        .unwrap();
}

#[test]
fn test_redirection_roundtrip() {
    let temp_dir = generate_temp_directory().expect("unable to generate temp dir");
    let script = fixture_script("redirect_roundtrip.msh");

    Assert::cargo_binary("msh")
        .current_dir(temp_dir.path())
        .with_args(&[unicode_path(&script)])
        .stdout()
        .contains("test output, please ignore")
        .succeeds()
        .unwrap();
}

#[test]
fn test_bad_redirect_target_keeps_shell_alive() {
    let script = fixture_script("bad_redirect_target.msh");

    Assert::cargo_binary("msh")
        .with_args(&[unicode_path(&script)])
        .stdout()
        .contains("exit value 1")
        .stdout()
        .contains("still alive")
        .succeeds()
        .unwrap();
}

#[test]
fn test_background_command_reports_start_and_completion() {
    let script = fixture_script("background.msh");

    Assert::cargo_binary("msh")
        .with_args(&[unicode_path(&script)])
        .stdout()
        .contains("Background pid is")
        .stdout()
        .contains("is done: exit value 0")
        .succeeds()
        .unwrap();
}

fn fixture_script(filename: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("scripts")
        .join(filename)
}

fn unicode_path(path: &PathBuf) -> &str {
    path.to_str().expect("file path should be valid Unicode")
}

fn generate_temp_directory() -> io::Result<TempDir> {
    // Because of limitation in `assert_cli`, temporary directory must be
    // subdirectory of directory containing Cargo.toml
    let temp_root = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests");
    TempDir::new_in(temp_root, "temp")
}
