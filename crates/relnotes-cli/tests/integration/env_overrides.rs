//! `RELNOTES_<SECTION>_<KEY>` variables layered over the config file.

use std::path::Path;
use std::process::{Command, Output};

use tempfile::TempDir;

/// One release whose Note has no commit: a warning, or an error when strict.
const NO_COMMIT: &str = "# Version: 0.1.0\n## Note\n*   Build Date: 20220702\n";

fn workspace(config: &str) -> TempDir {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("config.toml"), config).unwrap();
    std::fs::write(dir.path().join("RELEASE.md"), NO_COMMIT).unwrap();
    dir
}

/// Run `relnotes -c <dir>/config.toml <args>` with only `vars` set.
fn relnotes(dir: &Path, vars: &[(&str, &str)], args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_relnotes"))
        .env_clear()
        .envs(vars.iter().copied())
        .arg("-c")
        .arg(dir.join("config.toml"))
        .args(args)
        .output()
        .unwrap()
}

fn stdout(output: &Output) -> String {
    String::from_utf8(output.stdout.clone()).unwrap()
}

#[test]
fn test_strict_from_env_fails_validation() {
    let dir = workspace("");
    let file = dir.path().join("RELEASE.md");
    let file = file.to_str().unwrap();

    let lenient = relnotes(dir.path(), &[], &["--file", file, "validate"]);
    assert!(lenient.status.success());
    assert!(stdout(&lenient).contains("0 error(s), 1 warning(s)"));

    let strict = relnotes(
        dir.path(),
        &[("RELNOTES_VALIDATE_STRICT", "true")],
        &["--file", file, "validate"],
    );
    assert!(!strict.status.success());
    assert!(stdout(&strict).contains("1 error(s), 0 warning(s)"));
}

#[test]
fn test_env_overrides_file_value() {
    let dir = workspace("[validate]\nstrict = true\n");
    let file = dir.path().join("RELEASE.md");
    let file = file.to_str().unwrap();

    let from_file = relnotes(dir.path(), &[], &["--file", file, "validate"]);
    assert!(!from_file.status.success());

    let overridden = relnotes(
        dir.path(),
        &[("RELNOTES_VALIDATE_STRICT", "false")],
        &["--file", file, "validate"],
    );
    assert!(overridden.status.success());
}

#[test]
fn test_changelog_path_from_env() {
    let dir = workspace("[changelog]\npath = \"/nonexistent/RELEASE.md\"\n");
    let file = dir.path().join("RELEASE.md");

    let output = relnotes(
        dir.path(),
        &[("RELNOTES_CHANGELOG_PATH", file.to_str().unwrap())],
        &["latest"],
    );
    assert!(output.status.success());
    assert!(stdout(&output).starts_with("version: 0.1.0\n"));
}

#[test]
fn test_config_get_shows_env_value() {
    let dir = workspace("[parse]\nrelease_heading_level = 1\n");
    let output = relnotes(
        dir.path(),
        &[("RELNOTES_PARSE_RELEASE_HEADING_LEVEL", "2")],
        &["config", "get", "parse.release_heading_level"],
    );
    assert!(output.status.success());
    assert_eq!(stdout(&output), "2\n");

    let output = relnotes(dir.path(), &[], &["config", "get", "parse.release_heading_level"]);
    assert_eq!(stdout(&output), "1\n");
}

#[test]
fn test_mistyped_env_value_is_an_error() {
    let dir = workspace("");
    let output = relnotes(
        dir.path(),
        &[("RELNOTES_VALIDATE_STRICT", "sometimes")],
        &["config", "get", "validate.strict"],
    );
    assert!(!output.status.success());
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("validate.strict"));
}
