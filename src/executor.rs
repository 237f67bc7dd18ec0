//! Shell execution of corrected commands.
//!
//! Commands run through `sh -c` so pipes, globs and quoting behave the way
//! they did when the user first typed the command. Dangerous commands are
//! gated behind an explicit confirmation before anything is spawned, and
//! the child's exit status is propagated to the caller unchanged.

use anyhow::Result;
use colored::Colorize;
use std::io::{BufRead, Write};
use std::process::{Command, ExitStatus};
use tracing::{error, info};

use crate::safety::is_dangerous;

// =============================================================================
// Traits for Dependency Injection
// =============================================================================

/// Trait for running commands through the system shell.
///
/// This abstraction enables testing without spawning real processes.
pub trait ShellRunner: Send + Sync {
    /// Runs `command` through the shell and returns its exit status.
    ///
    /// The child inherits the caller's standard streams, so interactive
    /// commands keep working.
    fn run(&self, command: &str) -> Result<ExitStatus>;

    /// Checks whether the shell is available at all.
    fn shell_exists(&self) -> bool;
}

// =============================================================================
// Default Implementation
// =============================================================================

/// Default runner using `sh -c` via std::process::Command.
pub struct SystemShellRunner;

impl ShellRunner for SystemShellRunner {
    fn run(&self, command: &str) -> Result<ExitStatus> {
        Ok(Command::new("sh").arg("-c").arg(command).status()?)
    }

    fn shell_exists(&self) -> bool {
        which::which("sh").is_ok()
    }
}

// =============================================================================
// Executor Implementation
// =============================================================================

/// Runs a corrected command, gating dangerous ones behind a confirmation.
///
/// The executor never terminates the process itself. It reports the outcome
/// as an exit code and leaves the single `process::exit` call to `main`:
///
/// * `0` or the child's own code when the command ran
/// * `1` when the user declined a dangerous command, the shell is missing,
///   or the command could not be spawned
///
/// # Example
///
/// ```no_run
/// use flem::executor::Executor;
///
/// let executor = Executor::new();
/// let code = executor.run_command("ls -la /tmp")?;
/// println!("command exited with {code}");
/// # Ok::<(), anyhow::Error>(())
/// ```
pub struct Executor;

impl Executor {
    pub fn new() -> Self {
        Self
    }

    /// Runs `command` against the real shell and standard streams.
    pub fn run_command(&self, command: &str) -> Result<i32> {
        self.run_command_with_io(
            command,
            &SystemShellRunner,
            &mut std::io::stdin().lock(),
            &mut std::io::stdout(),
            &mut std::io::stderr(),
        )
    }

    /// Runs `command` with injected dependencies (for testing).
    pub fn run_command_with_io<R, W1, W2>(
        &self,
        command: &str,
        runner: &impl ShellRunner,
        input: &mut R,
        output: &mut W1,
        errout: &mut W2,
    ) -> Result<i32>
    where
        R: BufRead,
        W1: Write,
        W2: Write,
    {
        if is_dangerous(command) && !self.confirm_dangerous(command, input, output)? {
            writeln!(output, "Command execution cancelled.")?;
            return Ok(1);
        }

        if !runner.shell_exists() {
            error!("no shell available to run the command");
            writeln!(errout, "Cannot execute the command: no 'sh' shell was found.")?;
            return Ok(1);
        }

        info!("Executing command: {}", command);

        match runner.run(command) {
            // A None code means the child was killed by a signal.
            Ok(status) => Ok(status.code().unwrap_or(1)),
            Err(e) => {
                error!("failed to execute command: {}", e);
                writeln!(errout, "Failed to execute the command: {}", e)?;
                Ok(1)
            }
        }
    }

    /// Asks the user to confirm a dangerous command. Only `y` or `Y` proceeds.
    fn confirm_dangerous<R: BufRead, W: Write>(
        &self,
        command: &str,
        input: &mut R,
        output: &mut W,
    ) -> Result<bool> {
        let warning = format!(
            "Warning: The command '{command}' may be dangerous. \
             Are you sure you want to proceed? [y/N]"
        );
        writeln!(output, "{}", warning.red().bold())?;
        output.flush()?;

        let mut reply = String::new();
        input.read_line(&mut reply)?;
        let reply = reply.trim_end_matches(['\r', '\n']);

        Ok(reply.eq_ignore_ascii_case("y"))
    }
}

impl Default for Executor {
    fn default() -> Self {
        Self::new()
    }
}
