//! Record store trait definition.

use crate::error::Result;
use crate::record::{EncryptedRecord, NewEncryptedRecord, OwnerId, RecordId};

/// Storage interface for encrypted records.
///
/// Implementations must never receive plaintext or key material; the types
/// in this signature carry neither.
pub trait RecordStore {
    /// Fetch all records for `owner_id`, newest first.
    fn fetch(&self, owner_id: &OwnerId) -> Result<Vec<EncryptedRecord>>;

    /// Persist a sealed record, assigning its id and creation time.
    ///
    /// # Errors
    ///
    /// Returns `VaultError::InvalidInput` if the ciphertext or nonce is empty.
    fn insert(&mut self, record: &NewEncryptedRecord) -> Result<EncryptedRecord>;

    /// Delete a record by id.
    ///
    /// # Errors
    ///
    /// Returns `VaultError::RecordNotFound` if no such record exists.
    fn delete(&mut self, id: &RecordId) -> Result<()>;
}

pub(crate) fn validate_new_record(record: &NewEncryptedRecord) -> Result<()> {
    if record.ciphertext.is_empty() || record.nonce.is_empty() {
        return Err(crate::error::VaultError::InvalidInput(
            "Sealed record must carry ciphertext and nonce".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trait_is_object_safe() {
        fn _accepts_store(_store: &mut dyn RecordStore) {}
    }
}
