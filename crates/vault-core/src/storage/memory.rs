//! In-memory record store.

use chrono::Utc;
use uuid::Uuid;

use super::traits::{validate_new_record, RecordStore};
use crate::error::{Result, VaultError};
use crate::record::{EncryptedRecord, NewEncryptedRecord, OwnerId, RecordId};

#[derive(Debug, Clone, Default)]
pub struct MemoryRecordStore {
    records: Vec<EncryptedRecord>,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl RecordStore for MemoryRecordStore {
    fn fetch(&self, owner_id: &OwnerId) -> Result<Vec<EncryptedRecord>> {
        let mut records: Vec<_> = self
            .records
            .iter()
            .filter(|record| &record.owner_id == owner_id)
            .cloned()
            .collect();
        records.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        Ok(records)
    }

    fn insert(&mut self, record: &NewEncryptedRecord) -> Result<EncryptedRecord> {
        validate_new_record(record)?;
        let stored = EncryptedRecord {
            id: Uuid::now_v7(),
            owner_id: record.owner_id.clone(),
            kind: record.kind,
            ciphertext: record.ciphertext.clone(),
            nonce: record.nonce.clone(),
            created_at: record.created_at.unwrap_or_else(Utc::now),
        };
        self.records.push(stored.clone());
        Ok(stored)
    }

    fn delete(&mut self, id: &RecordId) -> Result<()> {
        let before = self.records.len();
        self.records.retain(|record| &record.id != id);
        if self.records.len() == before {
            return Err(VaultError::RecordNotFound(*id));
        }
        Ok(())
    }
}
