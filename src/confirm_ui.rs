//! User interface for the fix confirmation prompt.
//!
//! This module shows the suggested command and asks the user whether to run
//! it. Pressing Enter (or typing `e`/`E`) executes, anything else cancels.

use anyhow::Result;
use colored::Colorize;
use std::io::{self, BufRead, Write};
use tracing::info;

/// What the user decided to do with a suggested fix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FixDecision {
    /// Run the suggested command.
    Execute,
    /// Leave the suggestion alone.
    Cancelled,
}

/// Handles user interaction for the execute/cancel prompt.
///
/// # Example
///
/// ```no_run
/// use flem::confirm_ui::{ConfirmUI, FixDecision};
///
/// let ui = ConfirmUI::new();
/// let decision = ui.prompt_for_execution("ls -la /tmp")?;
/// if decision == FixDecision::Execute {
///     // run it
/// }
/// # Ok::<(), anyhow::Error>(())
/// ```
pub struct ConfirmUI;

impl ConfirmUI {
    pub fn new() -> Self {
        Self
    }

    // =========================================================================
    // Core method with I/O injection (testable)
    // =========================================================================

    /// Shows the suggestion and reads the user's decision from custom streams.
    ///
    /// The reply is accepted after stripping the line terminator only, so a
    /// padded answer like `" e"` cancels. End of input with no reply also
    /// cancels, which keeps a closed stdin from silently running commands.
    ///
    /// # Errors
    ///
    /// Returns an error if I/O operations fail.
    pub fn prompt_for_execution_with_io<R: BufRead, W: Write>(
        &self,
        suggestion: &str,
        input: &mut R,
        output: &mut W,
    ) -> Result<FixDecision> {
        writeln!(
            output,
            "{}   [{} {}",
            suggestion.bold(),
            "E]nter".green().bold(),
            "[C]ancel".red().bold(),
        )?;
        output.flush()?;

        let mut line = String::new();
        let bytes_read = input.read_line(&mut line)?;
        let reply = line.trim_end_matches(['\r', '\n']);

        match reply {
            "" | "e" | "E" if bytes_read > 0 => {
                info!("User accepted the suggested fix");
                Ok(FixDecision::Execute)
            }
            _ => {
                info!("User declined the suggested fix");
                Ok(FixDecision::Cancelled)
            }
        }
    }

    // =========================================================================
    // Convenience method using standard I/O
    // =========================================================================

    /// Shows the suggestion on stdout and reads the decision from stdin.
    ///
    /// This is a convenience wrapper around
    /// [`Self::prompt_for_execution_with_io`].
    pub fn prompt_for_execution(&self, suggestion: &str) -> Result<FixDecision> {
        let stdin = io::stdin();
        let mut input = stdin.lock();
        let mut output = io::stdout();
        self.prompt_for_execution_with_io(suggestion, &mut input, &mut output)
    }
}

impl Default for ConfirmUI {
    fn default() -> Self {
        Self::new()
    }
}
