//! Reads the last entered command from the user's shell history.

use std::fs;
use std::path::PathBuf;

use dirs::home_dir;
use tracing::debug;

/// Number of trailing history lines inspected per invocation.
const TAIL_WINDOW: usize = 3;

/// Read-only view over the bash history store.
///
/// The default store is `~/.bash_history`. A missing or unreadable store is
/// treated as an empty history, never as an error: callers interpret an
/// empty result as "nothing to fix" and exit cleanly.
pub struct HistoryReader {
    path: Option<PathBuf>,
}

impl HistoryReader {
    /// Reader over the default store, `~/.bash_history`.
    pub fn new() -> Self {
        Self {
            path: home_dir().map(|home| home.join(".bash_history")),
        }
    }

    /// Reader over an explicit history file (used by tests).
    pub fn with_path(path: PathBuf) -> Self {
        Self { path: Some(path) }
    }

    /// Returns the command most recently entered by the user, trimmed.
    ///
    /// Inspects the last three lines of the store and selects the first of
    /// them, skipping the trailing entries on the assumption that the
    /// tool's own invocation may already be logged there. How many trailing
    /// lines the shell has appended by the time we run is shell-dependent;
    /// the fixed skip count is inherited behavior, deliberately left as-is.
    pub fn last_command(&self) -> Option<String> {
        let path = self.path.as_ref()?;
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) => {
                debug!("history store {} not readable: {}", path.display(), e);
                return None;
            }
        };

        let lines: Vec<&str> = contents.lines().collect();
        let window = &lines[lines.len().saturating_sub(TAIL_WINDOW)..];
        let candidate = window.first()?.trim();
        if candidate.is_empty() {
            debug!("history window at {} held no command", path.display());
            None
        } else {
            Some(candidate.to_string())
        }
    }
}

impl Default for HistoryReader {
    fn default() -> Self {
        Self::new()
    }
}
