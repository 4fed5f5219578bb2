//! Record row type for database queries.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::{Result, VaultError};
use crate::record::{EncryptedRecord, OwnerId, RecordKind};

/// Raw row data from the records table, before parsing into domain types.
#[derive(Debug)]
pub struct RecordRow {
    pub id: String,
    pub owner_id: String,
    pub kind: String,
    pub ciphertext: Vec<u8>,
    pub nonce: Vec<u8>,
    pub created_at: String,
}

impl RecordRow {
    pub fn from_sql(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            owner_id: row.get(1)?,
            kind: row.get(2)?,
            ciphertext: row.get(3)?,
            nonce: row.get(4)?,
            created_at: row.get(5)?,
        })
    }
}

impl TryFrom<RecordRow> for EncryptedRecord {
    type Error = VaultError;

    fn try_from(row: RecordRow) -> Result<Self> {
        let id = Uuid::parse_str(&row.id)
            .map_err(|e| VaultError::Storage(format!("Invalid record UUID: {}", e)))?;
        let owner_id = OwnerId::new(row.owner_id)
            .map_err(|e| VaultError::Storage(format!("Invalid owner id: {}", e)))?;
        let kind: RecordKind = row
            .kind
            .parse()
            .map_err(|e| VaultError::Storage(format!("Invalid record kind: {}", e)))?;
        let created_at = DateTime::parse_from_rfc3339(&row.created_at)
            .map_err(|e| VaultError::Storage(format!("Invalid timestamp: {}", e)))?
            .with_timezone(&Utc);

        Ok(EncryptedRecord {
            id,
            owner_id,
            kind,
            ciphertext: row.ciphertext,
            nonce: row.nonce,
            created_at,
        })
    }
}
