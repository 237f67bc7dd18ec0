//! Danger detection for candidate commands.
//!
//! The check is a pure string predicate, kept apart from the interactive
//! confirmation in [`crate::executor`] so it can be tested without a
//! terminal.

/// Command-name prefixes that require explicit confirmation before running.
pub const DANGEROUS_COMMANDS: [&str; 8] = [
    "rm",
    "dd",
    "mkfs",
    "fdisk",
    "mkswap",
    "mkfs.ext3",
    "mkfs.ext4",
    "mkfs.vfat",
];

/// Returns true when the trimmed command starts with a danger-list entry.
///
/// The match is a literal string prefix, not a word match: `rmdir /tmp/x`
/// is flagged because it starts with `rm`.
pub fn is_dangerous(command: &str) -> bool {
    let trimmed = command.trim();
    DANGEROUS_COMMANDS
        .iter()
        .any(|prefix| trimmed.starts_with(prefix))
}
