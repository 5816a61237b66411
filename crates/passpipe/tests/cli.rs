#![cfg(unix)]

use std::fs;
use std::path::Path;

use anyhow::Result;
use assert_cmd::Command;
use predicates::prelude::*;
use predicates::str::contains;
use tempfile::TempDir;

/// passpipe with its config pointed into `home`, so the user's config never leaks in
fn passpipe(home: &Path) -> Result<Command> {
    let mut cmd = Command::cargo_bin("passpipe")?;
    cmd.env("PASSPIPE_CONFIG", home.join("config.json"))
        .env_remove("RUST_LOG");
    Ok(cmd)
}

#[test]
fn echo_child_relays_secret_and_succeeds() -> Result<()> {
    let home = TempDir::new()?;

    passpipe(home.path())?
        .args(["sh", "-c", r#"read line; printf '%s' "$line""#])
        .write_stdin("hunter2\n")
        .assert()
        .success()
        .stdout("hunter2");

    Ok(())
}

#[test]
fn stdout_is_relayed_exactly() -> Result<()> {
    let home = TempDir::new()?;

    passpipe(home.path())?
        .args(["sh", "-c", "printf 'line one\\nline two\\n'"])
        .write_stdin("pw\n")
        .assert()
        .code(0)
        .stdout("line one\nline two\n");

    Ok(())
}

#[test]
fn failing_child_prints_error_and_exits_one() -> Result<()> {
    let home = TempDir::new()?;

    passpipe(home.path())?
        .args(["sh", "-c", "printf 'bad args' >&2; exit 2"])
        .write_stdin("pw\n")
        .assert()
        .code(1)
        .stdout("Error: bad args")
        .stderr(contains("Error").not());

    Ok(())
}

#[test]
fn child_stderr_is_relayed_verbatim() -> Result<()> {
    let home = TempDir::new()?;

    passpipe(home.path())?
        .args(["sh", "-c", "printf 'bad args\\n\\n' >&2; exit 2"])
        .write_stdin("pw\n")
        .assert()
        .code(1)
        .stdout("Error: bad args\n\n");

    Ok(())
}

#[test]
fn secret_without_trailing_newline_is_accepted() -> Result<()> {
    let home = TempDir::new()?;

    passpipe(home.path())?
        .args(["sh", "-c", r#"read line; printf '%s' "$line""#])
        .write_stdin("hunter2")
        .assert()
        .success()
        .stdout("hunter2");

    Ok(())
}

#[test]
fn missing_executable_reports_launch_failure() -> Result<()> {
    let home = TempDir::new()?;

    passpipe(home.path())?
        .arg("/nonexistent/passpipe-test-bin")
        .write_stdin("pw\n")
        .assert()
        .code(1)
        .stderr(contains("Error: failed to launch '/nonexistent/passpipe-test-bin'"));

    Ok(())
}

#[test]
fn empty_secret_is_still_a_line() -> Result<()> {
    let home = TempDir::new()?;

    passpipe(home.path())?
        .args(["sh", "-c", r#"read line; printf '[%s]' "$line"; cat"#])
        .write_stdin("\n")
        .assert()
        .success()
        .stdout("[]");

    Ok(())
}

#[test]
fn arguments_reach_child_unexpanded() -> Result<()> {
    let home = TempDir::new()?;

    passpipe(home.path())?
        .args(["sh", "-c", r#"printf '%s|' "$@""#, "sh", "*", "$HOME", "a b", "--flag"])
        .write_stdin("pw\n")
        .assert()
        .success()
        .stdout("*|$HOME|a b|--flag|");

    Ok(())
}

#[test]
fn secret_never_printed_by_parent() -> Result<()> {
    let home = TempDir::new()?;
    let secret = "s3cret-value-42";

    passpipe(home.path())?
        .args(["sh", "-c", "printf ok"])
        .env("RUST_LOG", "passpipe=trace")
        .write_stdin(format!("{}\n", secret))
        .assert()
        .success()
        .stdout("ok")
        .stderr(contains(secret).not());

    passpipe(home.path())?
        .args(["sh", "-c", "printf nope >&2; exit 3"])
        .env("RUST_LOG", "passpipe=trace")
        .write_stdin(format!("{}\n", secret))
        .assert()
        .code(1)
        .stdout("Error: nope")
        .stderr(contains(secret).not());

    Ok(())
}

#[test]
fn prompt_goes_to_stderr() -> Result<()> {
    let home = TempDir::new()?;

    passpipe(home.path())?
        .args(["sh", "-c", "cat >/dev/null; printf done"])
        .write_stdin("pw\n")
        .assert()
        .success()
        .stdout("done")
        .stderr(contains("Enter password: "));

    Ok(())
}

#[test]
fn config_overrides_prompt() -> Result<()> {
    let home = TempDir::new()?;
    fs::write(
        home.path().join("config.json"),
        r#"{"prompt": "Vault passphrase: "}"#,
    )?;

    passpipe(home.path())?
        .args(["sh", "-c", "cat >/dev/null"])
        .write_stdin("pw\n")
        .assert()
        .success()
        .stderr(contains("Vault passphrase: "));

    Ok(())
}

#[test]
fn invalid_config_exits_one() -> Result<()> {
    let home = TempDir::new()?;
    fs::write(home.path().join("config.json"), "not json")?;

    passpipe(home.path())?
        .args(["sh", "-c", "printf ran"])
        .write_stdin("pw\n")
        .assert()
        .code(1)
        .stdout("")
        .stderr(contains("invalid config"));

    Ok(())
}

#[test]
fn closed_stdin_fails_to_read_password() -> Result<()> {
    let home = TempDir::new()?;

    passpipe(home.path())?
        .args(["sh", "-c", "printf ran"])
        .write_stdin("")
        .assert()
        .code(1)
        .stdout("")
        .stderr(contains("failed to read password"));

    Ok(())
}

#[test]
fn missing_command_is_usage_error() -> Result<()> {
    let home = TempDir::new()?;

    passpipe(home.path())?.assert().code(2);

    Ok(())
}
