//! # Vault Core
//!
//! Core library for the personal journal vault: free-text journal entries and
//! structured self-assessment responses that stay unreadable to whoever runs
//! the backing record store.
//!
//! Key material and plaintext live only inside an unlocked [`VaultSession`].
//! Nothing in this crate persists a key or a passphrase.
//!
//! ## Architecture
//!
//! - **crypto**: Argon2id key derivation and the XChaCha20-Poly1305 record codec
//! - **record**: Encrypted and decrypted record types
//! - **session**: Lock/unlock state machine with batch decryption
//! - **selection**: Caller-held export selection
//! - **export**: Paginated document and JSON interchange artifacts
//! - **template**: Assessment template collaborator
//! - **storage**: Record store collaborator (in-memory and SQLite)

pub mod crypto;
pub mod error;
pub mod export;
pub mod record;
pub mod selection;
pub mod session;
pub mod storage;
pub mod template;

pub use error::{Result, VaultError};
pub use export::{Artifact, ExportFormat, ExportOptions};
pub use record::{
    AssessmentResponse, DecryptFailure, DecryptedRecord, EncryptedRecord, NewEncryptedRecord,
    OwnerId, RecordId, RecordKind, RecordPayload,
};
pub use selection::ExportSelection;
pub use session::{UnlockCompletion, UnlockJob, UnlockOutcome, UnlockReport, VaultSession, VaultState};
pub use storage::RecordStore;
pub use template::{AnswerType, AssessmentTemplate, Question, StaticTemplates, TemplateSource};

/// Core version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
