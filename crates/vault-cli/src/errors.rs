//! CLI error types for structured error handling.
//!
//! Typed errors map to specific exit codes so scripts can tell a missing
//! vault apart from a wrong passphrase.

use std::fmt;

use crate::constants::exit_codes;

/// CLI-specific errors with associated exit codes.
#[derive(Debug)]
pub enum CliError {
    /// Resource not found (config, record, template)
    NotFound { message: String, hint: String },

    /// The passphrase could not open the vault
    AuthFailed { message: String, hint: String },

    /// Invalid user input
    InvalidInput(String),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::NotFound { message, hint } => {
                write!(f, "{}\n{}", message, hint)
            }
            CliError::AuthFailed { message, hint } => {
                write!(f, "{}\n{}", message, hint)
            }
            CliError::InvalidInput(message) => write!(f, "{}", message),
        }
    }
}

impl std::error::Error for CliError {}

impl CliError {
    pub fn not_found(message: impl Into<String>, hint: impl Into<String>) -> Self {
        CliError::NotFound {
            message: message.into(),
            hint: hint.into(),
        }
    }

    pub fn auth_failed(message: impl Into<String>, hint: impl Into<String>) -> Self {
        CliError::AuthFailed {
            message: message.into(),
            hint: hint.into(),
        }
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        CliError::InvalidInput(message.into())
    }

    /// Get the exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::NotFound { .. } => exit_codes::NOT_FOUND,
            CliError::AuthFailed { .. } => exit_codes::AUTH_FAILED,
            CliError::InvalidInput(_) => exit_codes::INVALID_INPUT,
        }
    }

    /// Print error message to stderr and exit with appropriate code.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);
        std::process::exit(self.exit_code())
    }
}

/// Map a core error onto a typed CLI error where one fits.
pub fn classify(err: &vault_core::VaultError) -> Option<CliError> {
    use vault_core::VaultError;

    match err {
        VaultError::InvalidPassphrase(message) | VaultError::InvalidInput(message) => {
            Some(CliError::invalid_input(message.clone()))
        }
        VaultError::RecordNotFound(id) => Some(CliError::not_found(
            format!("Record {} not found", id),
            "Hint: Run `vault list` to see record ids.",
        )),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;
    use vault_core::VaultError;

    #[test]
    fn test_exit_codes_are_distinct() {
        let codes = [
            CliError::not_found("a", "b").exit_code(),
            CliError::auth_failed("a", "b").exit_code(),
            CliError::invalid_input("a").exit_code(),
        ];
        assert_eq!(codes, [3, 5, 4]);
    }

    #[test]
    fn test_display_includes_hint() {
        let err = CliError::auth_failed("No records opened", "Hint: retry");
        assert_eq!(err.to_string(), "No records opened\nHint: retry");
    }

    #[test]
    fn test_classify_core_errors() {
        let missing = classify(&VaultError::RecordNotFound(Uuid::nil())).unwrap();
        assert_eq!(missing.exit_code(), exit_codes::NOT_FOUND);

        let empty = classify(&VaultError::InvalidPassphrase("empty".into())).unwrap();
        assert_eq!(empty.exit_code(), exit_codes::INVALID_INPUT);

        assert!(classify(&VaultError::Storage("disk".into())).is_none());
    }
}
