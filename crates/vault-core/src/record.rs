//! Record types.
//!
//! [`EncryptedRecord`] is what the record store holds. [`DecryptedRecord`]
//! is the transient projection that exists only inside an unlocked session.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;
use zeroize::Zeroizing;

use crate::crypto::CodecError;
use crate::error::{Result, VaultError};

/// Identifier assigned to a record by the record store.
pub type RecordId = Uuid;

/// Stable identifier of the owning user, supplied by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OwnerId(String);

impl OwnerId {
    /// Wrap an owner identifier.
    ///
    /// # Errors
    ///
    /// Returns `VaultError::InvalidInput` if the identifier is empty.
    pub fn new(value: impl Into<String>) -> Result<Self> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(VaultError::InvalidInput(
                "Owner id cannot be empty".to_string(),
            ));
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OwnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// How a record's plaintext is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    /// Free-text journal entry
    JournalEntry,
    /// Structured self-assessment response (question id -> answer)
    AssessmentResponse,
}

impl RecordKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordKind::JournalEntry => "journal_entry",
            RecordKind::AssessmentResponse => "assessment_response",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecordKind {
    type Err = VaultError;

    fn from_str(value: &str) -> Result<Self> {
        match value {
            "journal_entry" => Ok(RecordKind::JournalEntry),
            "assessment_response" => Ok(RecordKind::AssessmentResponse),
            other => Err(VaultError::InvalidInput(format!(
                "Unknown record kind: {}",
                other
            ))),
        }
    }
}

/// A record as held by the record store. Contains no plaintext.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncryptedRecord {
    pub id: RecordId,
    pub owner_id: OwnerId,
    pub kind: RecordKind,
    /// Encrypted payload with the authentication tag appended
    pub ciphertext: Vec<u8>,
    pub nonce: Vec<u8>,
    pub created_at: DateTime<Utc>,
}

/// A sealed record that has not yet been assigned an id by the store.
#[derive(Debug, Clone)]
pub struct NewEncryptedRecord {
    pub owner_id: OwnerId,
    pub kind: RecordKind,
    pub ciphertext: Vec<u8>,
    pub nonce: Vec<u8>,
    /// Optional creation time override (defaults to "now" in the store)
    pub created_at: Option<DateTime<Utc>>,
}

impl NewEncryptedRecord {
    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = Some(created_at);
        self
    }
}

/// One answer in an assessment response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Answer {
    /// Numeric scale answer
    Number(i64),
    /// Free-text answer
    Text(String),
}

impl Answer {
    /// Whether the answer is an empty or whitespace-only text value.
    pub fn is_blank(&self) -> bool {
        matches!(self, Answer::Text(text) if text.trim().is_empty())
    }
}

impl fmt::Display for Answer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Answer::Number(value) => write!(f, "{}", value),
            Answer::Text(value) => f.write_str(value),
        }
    }
}

/// Decrypted payload of an `assessment_response` record.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssessmentResponse {
    /// Template the answers belong to
    #[serde(default)]
    pub template_id: Option<String>,
    /// Question id -> answer
    #[serde(default)]
    pub answers: BTreeMap<String, Answer>,
}

impl AssessmentResponse {
    pub fn new(template_id: impl Into<String>) -> Self {
        Self {
            template_id: Some(template_id.into()),
            answers: BTreeMap::new(),
        }
    }

    pub fn with_answer(mut self, question_id: impl Into<String>, answer: Answer) -> Self {
        self.answers.insert(question_id.into(), answer);
        self
    }
}

impl fmt::Debug for AssessmentResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AssessmentResponse")
            .field("template_id", &self.template_id)
            .field("answers", &self.answers.len())
            .finish()
    }
}

/// Decrypted content of a record.
pub enum RecordPayload {
    /// Journal text, zeroized on drop
    Journal(Zeroizing<String>),
    Assessment(AssessmentResponse),
}

impl RecordPayload {
    pub fn journal(text: impl Into<String>) -> Self {
        RecordPayload::Journal(Zeroizing::new(text.into()))
    }

    pub fn kind(&self) -> RecordKind {
        match self {
            RecordPayload::Journal(_) => RecordKind::JournalEntry,
            RecordPayload::Assessment(_) => RecordKind::AssessmentResponse,
        }
    }

    /// Encode the payload as the bytes that get encrypted.
    pub(crate) fn to_plaintext(&self) -> Result<Zeroizing<Vec<u8>>> {
        match self {
            RecordPayload::Journal(text) => Ok(Zeroizing::new(text.as_bytes().to_vec())),
            RecordPayload::Assessment(response) => {
                Ok(Zeroizing::new(serde_json::to_vec(response)?))
            }
        }
    }

    /// Decode authenticated plaintext according to the record kind.
    pub(crate) fn from_plaintext(
        kind: RecordKind,
        plaintext: &[u8],
    ) -> std::result::Result<Self, DecryptFailure> {
        match kind {
            RecordKind::JournalEntry => std::str::from_utf8(plaintext)
                .map(|text| RecordPayload::journal(text))
                .map_err(|e| DecryptFailure::Payload(format!("journal text is not UTF-8: {}", e))),
            RecordKind::AssessmentResponse => serde_json::from_slice(plaintext)
                .map(RecordPayload::Assessment)
                .map_err(|e| {
                    DecryptFailure::Payload(format!("assessment response is not valid: {}", e))
                }),
        }
    }
}

impl fmt::Debug for RecordPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordPayload::Journal(text) => f
                .debug_tuple("Journal")
                .field(&format_args!("[REDACTED; {} bytes]", text.len()))
                .finish(),
            RecordPayload::Assessment(response) => {
                f.debug_tuple("Assessment").field(response).finish()
            }
        }
    }
}

/// Why a single record could not be read.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecryptFailure {
    /// Wrong passphrase or store-side corruption
    #[error("authentication failed")]
    Authentication,

    #[error("stored nonce is malformed")]
    MalformedNonce,

    /// Authenticated, but the plaintext does not match the record kind
    #[error("{0}")]
    Payload(String),
}

impl From<CodecError> for DecryptFailure {
    fn from(err: CodecError) -> Self {
        match err {
            CodecError::MalformedNonce { .. } => DecryptFailure::MalformedNonce,
            CodecError::Authentication => DecryptFailure::Authentication,
            other => DecryptFailure::Payload(other.to_string()),
        }
    }
}

/// A record as seen through an unlocked session.
///
/// Holds either the decoded payload or the reason it could not be read.
/// Owned by the session and dropped when it locks.
#[derive(Debug)]
pub struct DecryptedRecord {
    id: RecordId,
    kind: RecordKind,
    created_at: DateTime<Utc>,
    outcome: std::result::Result<RecordPayload, DecryptFailure>,
}

impl DecryptedRecord {
    pub(crate) fn new(
        record: &EncryptedRecord,
        outcome: std::result::Result<RecordPayload, DecryptFailure>,
    ) -> Self {
        Self {
            id: record.id,
            kind: record.kind,
            created_at: record.created_at,
            outcome,
        }
    }

    pub fn id(&self) -> RecordId {
        self.id
    }

    pub fn kind(&self) -> RecordKind {
        self.kind
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// True when the record could not be authenticated or decoded.
    pub fn decryption_failed(&self) -> bool {
        self.outcome.is_err()
    }

    pub fn failure(&self) -> Option<&DecryptFailure> {
        self.outcome.as_ref().err()
    }

    pub fn payload(&self) -> Option<&RecordPayload> {
        self.outcome.as_ref().ok()
    }

    /// Journal text, if this is a readable journal entry.
    pub fn content(&self) -> Option<&str> {
        match self.payload() {
            Some(RecordPayload::Journal(text)) => Some(text.as_str()),
            _ => None,
        }
    }

    /// Assessment answers, if this is a readable assessment response.
    pub fn assessment(&self) -> Option<&AssessmentResponse> {
        match self.payload() {
            Some(RecordPayload::Assessment(response)) => Some(response),
            _ => None,
        }
    }

    /// The payload, or the record's failure as an error.
    ///
    /// # Errors
    ///
    /// Returns `VaultError::RecordDecryptionFailed` for unreadable records.
    pub fn require_payload(&self) -> Result<&RecordPayload> {
        self.outcome
            .as_ref()
            .map_err(|failure| VaultError::RecordDecryptionFailed {
                id: self.id,
                reason: failure.to_string(),
            })
    }
}
