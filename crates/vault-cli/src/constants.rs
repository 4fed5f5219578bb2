//! Constants used throughout the CLI.

/// Exit codes for the CLI.
///
/// These follow common Unix conventions:
/// - 0: Success
/// - 1: General error (used by anyhow for unhandled errors)
/// - 2: Misuse of shell command (reserved by shells, and clap usage errors)
/// - 3+: Application-specific errors
pub mod exit_codes {
    /// Resource not found (config, store, record, template).
    pub const NOT_FOUND: i32 = 3;

    /// Invalid user input or arguments.
    pub const INVALID_INPUT: i32 = 4;

    /// Authentication failed (passphrase could not open any record).
    pub const AUTH_FAILED: i32 = 5;
}

/// Characters of a record id shown in listings.
pub const SHORT_ID_LEN: usize = 8;

/// Characters of journal text shown in the list summary column.
pub const SUMMARY_WIDTH: usize = 60;

/// Interactive passphrase attempts before giving up.
pub const MAX_PASSPHRASE_ATTEMPTS: usize = 3;
