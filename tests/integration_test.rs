use anyhow::Result;
use std::fs;
use std::io::Write;
use std::path::Path;
use std::process::{Command, Output, Stdio};
use tempfile::TempDir;

/// Path to the compiled flem binary under test.
const BIN: &str = env!("CARGO_BIN_EXE_flem");

/// Creates a home directory seeded with the given bash history lines.
fn home_with_history(lines: &[&str]) -> Result<TempDir> {
    let home = tempfile::tempdir()?;
    let mut content = String::new();
    for line in lines {
        content.push_str(line);
        content.push('\n');
    }
    fs::write(home.path().join(".bash_history"), content)?;
    Ok(home)
}

/// Runs flem under `home` with the prompt replies piped on stdin.
///
/// Mock mode keeps the tests deterministic and offline.
fn run_flem(home: &Path, args: &[&str], stdin: &str) -> Result<Output> {
    run_flem_with_mock(home, args, stdin, true)
}

fn run_flem_with_mock(home: &Path, args: &[&str], stdin: &str, mock: bool) -> Result<Output> {
    let mut cmd = Command::new(BIN);
    cmd.args(args);
    cmd.env("HOME", home);
    cmd.env_remove("FLEM_OPENAI_API_KEY");
    cmd.env_remove("FLEM_MODEL");
    cmd.env_remove("FLEM_API_BASE");
    if mock {
        cmd.env("FLEM_USE_MOCK", "1");
    } else {
        cmd.env_remove("FLEM_USE_MOCK");
    }
    cmd.stdin(Stdio::piped());
    cmd.stdout(Stdio::piped());
    cmd.stderr(Stdio::piped());

    let mut child = cmd.spawn()?;
    child
        .stdin
        .as_mut()
        .expect("child stdin is piped")
        .write_all(stdin.as_bytes())?;
    Ok(child.wait_with_output()?)
}

#[test]
fn test_no_history_is_a_clean_exit() -> Result<()> {
    let home = tempfile::tempdir()?;

    let output = run_flem(home.path(), &["-v"], "")?;

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.contains("No previous command found in bash history."),
        "Should explain why nothing happened. Stdout: {}",
        stdout
    );
    assert!(!stdout.contains("Last command found"));

    Ok(())
}

#[test]
fn test_blank_history_is_a_clean_exit() -> Result<()> {
    let home = home_with_history(&[""])?;

    let output = run_flem(home.path(), &[], "")?;

    assert_eq!(output.status.code(), Some(0));
    assert!(String::from_utf8_lossy(&output.stdout).is_empty());

    Ok(())
}

#[test]
fn test_accepted_fix_is_executed() -> Result<()> {
    let home = home_with_history(&["sl -d ."])?;

    // Enter at the prompt accepts the suggested fix
    let output = run_flem(home.path(), &["-v"], "\n")?;

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Last command found: sl -d ."));
    assert!(stdout.contains("Asking the model to fix the command..."));
    assert!(
        stdout.contains("ls -d ."),
        "Should show the corrected command. Stdout: {}",
        stdout
    );

    Ok(())
}

#[test]
fn test_no_suggestion_exits_cleanly_without_prompting() -> Result<()> {
    let home = home_with_history(&["# deploy notes, do not run"])?;

    let output = run_flem(home.path(), &[], "")?;

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Last command found:"));
    assert!(!stdout.contains("]nter"), "No suggestion means no prompt. Stdout: {}", stdout);

    Ok(())
}

#[test]
fn test_cancelled_fix_is_not_executed() -> Result<()> {
    let home = tempfile::tempdir()?;
    let marker = home.path().join("ran-anyway");
    let command = format!("touch {}", marker.display());
    fs::write(home.path().join(".bash_history"), format!("{command}\n"))?;

    let output = run_flem(home.path(), &[], "n\n")?;

    assert_eq!(output.status.code(), Some(0));
    assert!(!marker.exists(), "Cancelling must not run the command");

    Ok(())
}

#[test]
fn test_dangerous_fix_declined_exits_with_failure() -> Result<()> {
    let home = home_with_history(&["rm -rf /tmp/flem-test-scratch"])?;

    // Accept the fix, then decline the danger confirmation
    let output = run_flem(home.path(), &[], "\nn\n")?;

    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("may be dangerous"), "Should warn first. Stdout: {}", stdout);
    assert!(stdout.contains("Command execution cancelled."));

    Ok(())
}

#[test]
fn test_dangerous_fix_confirmed_is_executed() -> Result<()> {
    let home = tempfile::tempdir()?;
    let scratch = home.path().join("scratch-file");
    fs::write(&scratch, "expendable")?;
    let command = format!("rm -f {}", scratch.display());
    fs::write(home.path().join(".bash_history"), format!("{command}\n"))?;

    // Accept the fix, then confirm the danger prompt with y
    let output = run_flem(home.path(), &[], "\ny\n")?;

    assert_eq!(output.status.code(), Some(0));
    assert!(!scratch.exists(), "Confirmed command should have run");

    Ok(())
}

#[test]
fn test_exit_status_of_the_fix_is_propagated() -> Result<()> {
    let home = home_with_history(&["sh -c 'exit 7'"])?;

    let output = run_flem(home.path(), &[], "\n")?;

    assert_eq!(output.status.code(), Some(7));

    Ok(())
}

#[test]
fn test_dry_run_prints_fix_without_prompting() -> Result<()> {
    let home = tempfile::tempdir()?;
    let marker = home.path().join("ran-anyway");
    let command = format!("touch {}", marker.display());
    fs::write(home.path().join(".bash_history"), format!("{command}\n"))?;

    let output = run_flem(home.path(), &["--dry-run"], "")?;

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains(&command), "Should print the fix. Stdout: {}", stdout);
    assert!(!stdout.contains("]nter"), "Dry run must not prompt");
    assert!(!marker.exists(), "Dry run must not execute");

    Ok(())
}

#[test]
fn test_help_flag_shows_usage() -> Result<()> {
    let home = tempfile::tempdir()?;

    let output = run_flem(home.path(), &["-h"], "")?;

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Usage"));
    assert!(stdout.contains("--dry-run"));
    assert!(stdout.contains("--verbose"));

    Ok(())
}

#[test]
fn test_missing_api_key_is_fatal() -> Result<()> {
    let home = home_with_history(&["sl -l"])?;

    let output = run_flem_with_mock(home.path(), &[], "", false)?;

    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stdout.contains("Last command found: sl -l"),
        "History is shown before the credential check. Stdout: {}",
        stdout
    );
    assert!(stderr.contains("API key"), "Should name the problem. Stderr: {}", stderr);

    Ok(())
}

#[test]
fn test_missing_api_key_does_not_matter_without_history() -> Result<()> {
    let home = tempfile::tempdir()?;

    let output = run_flem_with_mock(home.path(), &[], "", false)?;

    assert_eq!(output.status.code(), Some(0));

    Ok(())
}

#[test]
fn test_set_api_key_round_trips_through_config() -> Result<()> {
    let home = tempfile::tempdir()?;

    let output = run_flem(home.path(), &["--set-api-key", "sk-test-key"], "")?;
    assert_eq!(output.status.code(), Some(0));
    assert!(String::from_utf8_lossy(&output.stdout).contains("API key saved"));

    let output = run_flem(home.path(), &["--config"], "")?;
    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Status: Found"));
    assert!(stdout.contains("API Key: Set"));

    Ok(())
}
