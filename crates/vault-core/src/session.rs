//! Vault session: the lock/unlock state machine.
//!
//! A [`VaultSession`] is the only holder of a [`VaultKey`] and of decrypted
//! records. Possessing an unlocked session is possessing the key; locking it
//! drops both in a single assignment.
//!
//! ```text
//! Locked --begin_unlock--> Unlocking --complete_unlock--> Unlocked
//!    ^                         |                              |
//!    +---------- lock ---------+------------ lock ------------+
//! ```
//!
//! Unlocking is split into [`VaultSession::begin_unlock`],
//! [`UnlockJob::run`] and [`VaultSession::complete_unlock`] so a host can
//! run the batch decryption off-thread. Every begin and every lock bumps the
//! session epoch, and an outcome from an older epoch is dropped unapplied.

use std::collections::HashMap;
use std::thread;

use crate::crypto::{self, derive_key, KdfParams, VaultKey};
use crate::error::{Result, VaultError};
use crate::export::{self, Artifact, ExportFormat, ExportOptions};
use crate::record::{
    DecryptFailure, DecryptedRecord, EncryptedRecord, NewEncryptedRecord, OwnerId, RecordId,
    RecordKind, RecordPayload,
};
use crate::selection::ExportSelection;
use crate::storage::RecordStore;
use crate::template::TemplateSource;

/// Batches smaller than this are decrypted on the calling thread.
const PARALLEL_THRESHOLD: usize = 32;

/// Observable session state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VaultState {
    Locked,
    Unlocking,
    Unlocked,
}

enum Phase {
    Locked,
    Unlocking,
    Unlocked {
        key: VaultKey,
        /// Aligned index-for-index with `VaultSession::sealed`
        records: Vec<DecryptedRecord>,
    },
}

/// Summary of an applied unlock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnlockReport {
    pub total: usize,
    pub decrypted: usize,
    pub failed: Vec<RecordId>,
}

impl UnlockReport {
    fn from_records(records: &[DecryptedRecord]) -> Self {
        let failed: Vec<RecordId> = records
            .iter()
            .filter(|record| record.decryption_failed())
            .map(|record| record.id())
            .collect();
        Self {
            total: records.len(),
            decrypted: records.len() - failed.len(),
            failed,
        }
    }

    /// Every loaded record failed. Usually a mistyped passphrase, but the
    /// vault cannot tell that apart from store-side corruption.
    pub fn all_failed(&self) -> bool {
        self.total > 0 && self.decrypted == 0
    }
}

/// Work captured by [`VaultSession::begin_unlock`].
///
/// Owns the derived key and a snapshot of the sealed records, so it can be
/// moved to another thread while the session stays usable.
#[derive(Debug)]
pub struct UnlockJob {
    epoch: u64,
    key: VaultKey,
    records: Vec<EncryptedRecord>,
}

impl UnlockJob {
    /// Decrypt every record in the snapshot.
    pub fn run(self) -> UnlockOutcome {
        let records = decrypt_batch(&self.records, &self.key);
        UnlockOutcome {
            epoch: self.epoch,
            key: self.key,
            records,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Result of [`UnlockJob::run`], waiting to be applied to its session.
#[derive(Debug)]
pub struct UnlockOutcome {
    epoch: u64,
    key: VaultKey,
    records: Vec<DecryptedRecord>,
}

/// What [`VaultSession::complete_unlock`] did with an outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnlockCompletion {
    Applied(UnlockReport),
    /// The session was locked (or re-unlocked) while the job ran; the
    /// outcome's key and plaintext were dropped.
    Discarded,
}

/// Session over one owner's encrypted records.
pub struct VaultSession {
    owner_id: OwnerId,
    kdf: KdfParams,
    /// Newest first
    sealed: Vec<EncryptedRecord>,
    phase: Phase,
    epoch: u64,
    selection: ExportSelection,
}

impl VaultSession {
    /// Create a locked session for `owner_id` with fixed KDF cost parameters.
    pub fn new(owner_id: OwnerId, kdf: KdfParams) -> Self {
        Self {
            owner_id,
            kdf,
            sealed: Vec::new(),
            phase: Phase::Locked,
            epoch: 0,
            selection: ExportSelection::new(),
        }
    }

    pub fn owner_id(&self) -> &OwnerId {
        &self.owner_id
    }

    pub fn state(&self) -> VaultState {
        match self.phase {
            Phase::Locked => VaultState::Locked,
            Phase::Unlocking => VaultState::Unlocking,
            Phase::Unlocked { .. } => VaultState::Unlocked,
        }
    }

    pub fn is_unlocked(&self) -> bool {
        matches!(self.phase, Phase::Unlocked { .. })
    }

    // --- Loading records ---

    /// Replace the loaded records.
    ///
    /// When unlocked, the new set is decrypted with the held key before this
    /// returns. Selected ids that are no longer loaded are deselected.
    ///
    /// # Errors
    ///
    /// Returns `VaultError::InvalidInput` if any record belongs to another owner.
    pub fn load(&mut self, records: Vec<EncryptedRecord>) -> Result<()> {
        for record in &records {
            self.check_owner(record)?;
        }

        let mut records = records;
        records.sort_by(newest_first);
        self.sealed = records;

        if let Phase::Unlocked { key, records } = &mut self.phase {
            *records = decrypt_batch(&self.sealed, key);
        }
        let loaded: Vec<RecordId> = self.sealed.iter().map(|record| record.id).collect();
        let stale: Vec<RecordId> = self
            .selection
            .entries()
            .iter()
            .chain(self.selection.assessments())
            .filter(|id| !loaded.contains(id))
            .copied()
            .collect();
        for id in stale {
            self.selection.remove(&id);
        }

        tracing::debug!(count = self.sealed.len(), "loaded sealed records");
        Ok(())
    }

    /// Fetch this owner's records from `store` and load them.
    pub fn refresh(&mut self, store: &dyn RecordStore) -> Result<()> {
        let records = store.fetch(&self.owner_id)?;
        self.load(records)
    }

    /// Add one record that arrived after loading.
    ///
    /// When unlocked, the record is decrypted immediately with the held key
    /// and its decrypted view is returned. A record with an id that is
    /// already loaded replaces the earlier one.
    ///
    /// # Errors
    ///
    /// Returns `VaultError::InvalidInput` if the record belongs to another owner.
    pub fn receive(&mut self, record: EncryptedRecord) -> Result<Option<&DecryptedRecord>> {
        self.check_owner(&record)?;
        self.forget(&record.id);

        let index = self
            .sealed
            .partition_point(|existing| newest_first(existing, &record).is_lt());
        let decrypted = match &mut self.phase {
            Phase::Unlocked { key, records } => {
                records.insert(index, open_record(&record, key));
                Some(index)
            }
            _ => None,
        };
        self.sealed.insert(index, record);

        match decrypted {
            Some(index) => Ok(self.records().get(index)),
            None => Ok(None),
        }
    }

    /// Drop a record from the session. Returns `true` if it was loaded.
    pub fn forget(&mut self, id: &RecordId) -> bool {
        let Some(index) = self.sealed.iter().position(|record| &record.id == id) else {
            return false;
        };
        self.sealed.remove(index);
        if let Phase::Unlocked { records, .. } = &mut self.phase {
            records.remove(index);
        }
        self.selection.remove(id);
        true
    }

    /// Delete a record from `store`, then forget it locally.
    pub fn delete(&mut self, store: &mut dyn RecordStore, id: &RecordId) -> Result<()> {
        store.delete(id)?;
        self.forget(id);
        tracing::debug!(record_id = %id, "deleted record");
        Ok(())
    }

    // --- Lock / unlock ---

    /// Derive the key and capture the records to decrypt.
    ///
    /// Moves the session to `Unlocking`. The returned job must be run and
    /// handed back to [`VaultSession::complete_unlock`].
    ///
    /// # Errors
    ///
    /// - `VaultError::InvalidPassphrase` for an empty passphrase; the session stays `Locked`
    /// - `VaultError::InvalidState` if the session is not `Locked`
    pub fn begin_unlock(&mut self, passphrase: &str) -> Result<UnlockJob> {
        if !matches!(self.phase, Phase::Locked) {
            return Err(VaultError::InvalidState(
                "Vault must be locked before unlocking".to_string(),
            ));
        }

        let key = derive_key(passphrase, self.owner_id.as_str(), &self.kdf)?;

        self.epoch += 1;
        self.phase = Phase::Unlocking;
        tracing::debug!(records = self.sealed.len(), "unlock started");

        Ok(UnlockJob {
            epoch: self.epoch,
            key,
            records: self.sealed.clone(),
        })
    }

    /// Apply a finished unlock job.
    ///
    /// Records received while the job ran are decrypted now with the same
    /// key; records forgotten meanwhile are skipped. An outcome from a
    /// cancelled or superseded unlock is dropped.
    pub fn complete_unlock(&mut self, outcome: UnlockOutcome) -> UnlockCompletion {
        if !matches!(self.phase, Phase::Unlocking) || outcome.epoch != self.epoch {
            tracing::debug!("discarding stale unlock outcome");
            return UnlockCompletion::Discarded;
        }

        let UnlockOutcome { key, records, .. } = outcome;
        let mut by_id: HashMap<RecordId, DecryptedRecord> =
            records.into_iter().map(|record| (record.id(), record)).collect();
        let records: Vec<DecryptedRecord> = self
            .sealed
            .iter()
            .map(|sealed| {
                by_id
                    .remove(&sealed.id)
                    .unwrap_or_else(|| open_record(sealed, &key))
            })
            .collect();

        let report = UnlockReport::from_records(&records);
        tracing::info!(
            total = report.total,
            failed = report.failed.len(),
            "vault unlocked"
        );
        if report.all_failed() {
            tracing::warn!("no record could be decrypted with the supplied passphrase");
        }

        self.phase = Phase::Unlocked { key, records };
        UnlockCompletion::Applied(report)
    }

    /// Derive the key and decrypt every loaded record.
    ///
    /// Per-record failures do not fail the unlock; they are reported in the
    /// returned [`UnlockReport`] and marked on each [`DecryptedRecord`].
    pub fn unlock(&mut self, passphrase: &str) -> Result<UnlockReport> {
        let outcome = self.begin_unlock(passphrase)?.run();
        match self.complete_unlock(outcome) {
            UnlockCompletion::Applied(report) => Ok(report),
            UnlockCompletion::Discarded => Err(VaultError::InvalidState(
                "Unlock was cancelled".to_string(),
            )),
        }
    }

    /// Drop the key, every decrypted record and the export selection.
    ///
    /// Also cancels an in-flight unlock.
    pub fn lock(&mut self) {
        self.phase = Phase::Locked;
        self.epoch += 1;
        self.selection.clear();
        tracing::info!("vault locked");
    }

    // --- Writing ---

    /// Encrypt new content under the held key.
    ///
    /// The result goes to the record store, which assigns its id; pass the
    /// stored record back through [`VaultSession::receive`].
    ///
    /// # Errors
    ///
    /// Returns `VaultError::InvalidState` unless the session is unlocked.
    pub fn seal(&self, payload: &RecordPayload) -> Result<NewEncryptedRecord> {
        let Phase::Unlocked { key, .. } = &self.phase else {
            return Err(VaultError::InvalidState(
                "Vault must be unlocked to write records".to_string(),
            ));
        };

        let plaintext = payload.to_plaintext()?;
        let (ciphertext, nonce) = crypto::encrypt(&plaintext, key)
            .map_err(|e| VaultError::Crypto(format!("Record encryption failed: {}", e)))?;

        Ok(NewEncryptedRecord {
            owner_id: self.owner_id.clone(),
            kind: payload.kind(),
            ciphertext,
            nonce,
            created_at: None,
        })
    }

    // --- Views ---

    /// Ciphertext-backed records, available in every state.
    pub fn sealed(&self) -> &[EncryptedRecord] {
        &self.sealed
    }

    /// Decrypted records, newest first. Empty unless unlocked.
    pub fn records(&self) -> &[DecryptedRecord] {
        match &self.phase {
            Phase::Unlocked { records, .. } => records,
            _ => &[],
        }
    }

    pub fn entries(&self) -> impl Iterator<Item = &DecryptedRecord> {
        self.records_of(RecordKind::JournalEntry)
    }

    pub fn assessments(&self) -> impl Iterator<Item = &DecryptedRecord> {
        self.records_of(RecordKind::AssessmentResponse)
    }

    fn records_of(&self, kind: RecordKind) -> impl Iterator<Item = &DecryptedRecord> {
        self.records()
            .iter()
            .filter(move |record| record.kind() == kind)
    }

    pub fn get(&self, id: &RecordId) -> Option<&DecryptedRecord> {
        self.records().iter().find(|record| &record.id() == id)
    }

    // --- Selection ---

    pub fn selection(&self) -> &ExportSelection {
        &self.selection
    }

    /// Flip whether a record is selected for export. Returns the new state.
    ///
    /// # Errors
    ///
    /// - `VaultError::InvalidState` unless unlocked
    /// - `VaultError::RecordNotFound` if no record with that id is loaded
    /// - `VaultError::InvalidInput` if the kind does not match or the record is unreadable
    pub fn toggle_selection(&mut self, kind: RecordKind, id: RecordId) -> Result<bool> {
        self.require_unlocked("select records")?;
        let record = self.get(&id).ok_or(VaultError::RecordNotFound(id))?;
        if record.kind() != kind {
            return Err(VaultError::InvalidInput(format!(
                "Record {} is a {}, not a {}",
                id,
                record.kind(),
                kind
            )));
        }
        if record.decryption_failed() {
            return Err(VaultError::InvalidInput(format!(
                "Record {} could not be decrypted and cannot be exported",
                id
            )));
        }
        Ok(self.selection.toggle(kind, id))
    }

    /// Select every readable record. Returns the number selected.
    pub fn select_all(&mut self) -> Result<usize> {
        self.require_unlocked("select records")?;
        let Phase::Unlocked { records, .. } = &self.phase else {
            return Ok(0);
        };
        self.selection.select_all(records.iter());
        Ok(self.selection.len())
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    // --- Export ---

    /// Render the selected records.
    ///
    /// The artifact is unencrypted plaintext; see [`Artifact`].
    ///
    /// # Errors
    ///
    /// Returns `VaultError::ExportPreconditionFailed` unless unlocked. No
    /// partial artifact is produced.
    pub fn export(
        &self,
        format: ExportFormat,
        templates: &dyn TemplateSource,
        options: &ExportOptions,
    ) -> Result<Artifact> {
        if !self.is_unlocked() {
            return Err(VaultError::ExportPreconditionFailed(
                "Vault is locked".to_string(),
            ));
        }
        export::export(self.records(), &self.selection, format, templates, options)
    }

    fn require_unlocked(&self, action: &str) -> Result<()> {
        if self.is_unlocked() {
            Ok(())
        } else {
            Err(VaultError::InvalidState(format!(
                "Vault must be unlocked to {}",
                action
            )))
        }
    }

    fn check_owner(&self, record: &EncryptedRecord) -> Result<()> {
        if record.owner_id != self.owner_id {
            return Err(VaultError::InvalidInput(format!(
                "Record {} belongs to a different owner",
                record.id
            )));
        }
        Ok(())
    }
}

impl std::fmt::Debug for VaultSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VaultSession")
            .field("owner_id", &self.owner_id)
            .field("state", &self.state())
            .field("sealed", &self.sealed.len())
            .field("selected", &self.selection.len())
            .finish()
    }
}

fn newest_first(a: &EncryptedRecord, b: &EncryptedRecord) -> std::cmp::Ordering {
    (b.created_at, b.id).cmp(&(a.created_at, a.id))
}

/// Decrypt and decode one record. Failures become data, never errors.
fn open_record(record: &EncryptedRecord, key: &VaultKey) -> DecryptedRecord {
    let outcome = crypto::decrypt(&record.ciphertext, &record.nonce, key)
        .map_err(DecryptFailure::from)
        .and_then(|plaintext| RecordPayload::from_plaintext(record.kind, &plaintext));
    if let Err(failure) = &outcome {
        tracing::debug!(record_id = %record.id, %failure, "record could not be decrypted");
    }
    DecryptedRecord::new(record, outcome)
}

/// Decrypt a batch, in parallel when it is large enough.
///
/// Results keep the input order regardless of which worker finishes first.
fn decrypt_batch(records: &[EncryptedRecord], key: &VaultKey) -> Vec<DecryptedRecord> {
    let workers = thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
        .min(records.len());
    if workers <= 1 || records.len() < PARALLEL_THRESHOLD {
        return records.iter().map(|record| open_record(record, key)).collect();
    }

    let chunk_size = records.len().div_ceil(workers);
    thread::scope(|scope| {
        let handles: Vec<_> = records
            .chunks(chunk_size)
            .map(|chunk| {
                scope.spawn(move || {
                    chunk
                        .iter()
                        .map(|record| open_record(record, key))
                        .collect::<Vec<_>>()
                })
            })
            .collect();
        handles
            .into_iter()
            .flat_map(|handle| {
                handle
                    .join()
                    .unwrap_or_else(|panic| std::panic::resume_unwind(panic))
            })
            .collect()
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::storage::MemoryRecordStore;

    fn fast() -> KdfParams {
        KdfParams::new(8, 1, 1).unwrap()
    }

    fn session(owner: &str) -> VaultSession {
        VaultSession::new(OwnerId::new(owner).unwrap(), fast())
    }

    /// Write journal entries under `passphrase` and return the stored rows.
    fn write_entries(passphrase: &str, texts: &[&str]) -> Vec<EncryptedRecord> {
        let mut writer = session("u1");
        writer.unlock(passphrase).unwrap();
        let mut store = MemoryRecordStore::new();
        texts
            .iter()
            .map(|text| {
                let sealed = writer.seal(&RecordPayload::journal(*text)).unwrap();
                store.insert(&sealed).unwrap()
            })
            .collect()
    }

    #[test]
    fn test_new_session_is_locked() {
        let session = session("u1");
        assert_eq!(session.state(), VaultState::Locked);
        assert!(session.records().is_empty());
    }

    #[test]
    fn test_unlock_decrypts_with_correct_passphrase() {
        let rows = write_entries("correct-horse", &["Today was hard"]);
        let mut session = session("u1");
        session.load(rows).unwrap();

        let report = session.unlock("correct-horse").unwrap();
        assert_eq!(report.total, 1);
        assert_eq!(report.decrypted, 1);
        assert_eq!(session.state(), VaultState::Unlocked);
        assert_eq!(session.records()[0].content(), Some("Today was hard"));
        assert!(!session.records()[0].decryption_failed());
    }

    #[test]
    fn test_wrong_passphrase_marks_records_failed() {
        let rows = write_entries("correct-horse", &["Today was hard"]);
        let mut session = session("u1");
        session.load(rows).unwrap();

        let report = session.unlock("wrong-pass").unwrap();
        assert!(report.all_failed());
        assert_eq!(session.state(), VaultState::Unlocked);
        let record = &session.records()[0];
        assert!(record.decryption_failed());
        assert!(record.content().is_none());
        assert_eq!(record.failure(), Some(&DecryptFailure::Authentication));
    }

    #[test]
    fn test_empty_passphrase_keeps_vault_locked() {
        let mut session = session("u1");
        let result = session.unlock("  ");
        assert!(matches!(result, Err(VaultError::InvalidPassphrase(_))));
        assert_eq!(session.state(), VaultState::Locked);
    }

    #[test]
    fn test_unlock_twice_requires_lock() {
        let mut session = session("u1");
        session.unlock("correct-horse").unwrap();
        assert!(matches!(
            session.unlock("correct-horse"),
            Err(VaultError::InvalidState(_))
        ));
    }

    #[test]
    fn test_lock_discards_everything() {
        let rows = write_entries("correct-horse", &["one", "two"]);
        let mut session = session("u1");
        session.load(rows.clone()).unwrap();
        session.unlock("correct-horse").unwrap();
        session.select_all().unwrap();

        session.lock();

        assert_eq!(session.state(), VaultState::Locked);
        assert!(session.records().is_empty());
        assert!(session.get(&rows[0].id).is_none());
        assert!(session.selection().is_empty());
        assert_eq!(session.sealed().len(), 2);
        assert!(session.seal(&RecordPayload::journal("x")).is_err());
    }

    #[test]
    fn test_lock_during_unlock_discards_outcome() {
        let rows = write_entries("correct-horse", &["in flight"]);
        let mut session = session("u1");
        session.load(rows).unwrap();

        let job = session.begin_unlock("correct-horse").unwrap();
        assert_eq!(session.state(), VaultState::Unlocking);
        session.lock();
        let outcome = job.run();

        assert_eq!(session.complete_unlock(outcome), UnlockCompletion::Discarded);
        assert_eq!(session.state(), VaultState::Locked);
        assert!(session.records().is_empty());
    }

    #[test]
    fn test_outcome_from_previous_cycle_is_discarded() {
        let mut session = session("u1");
        let stale = session.begin_unlock("correct-horse").unwrap();
        session.lock();
        let current = session.begin_unlock("correct-horse").unwrap();

        assert_eq!(
            session.complete_unlock(stale.run()),
            UnlockCompletion::Discarded
        );
        assert_eq!(session.state(), VaultState::Unlocking);
        assert!(matches!(
            session.complete_unlock(current.run()),
            UnlockCompletion::Applied(_)
        ));
    }

    #[test]
    fn test_record_received_while_unlocking_is_decrypted_on_completion() {
        let rows = write_entries("correct-horse", &["first", "second"]);
        let mut session = session("u1");
        session.load(vec![rows[0].clone()]).unwrap();

        let job = session.begin_unlock("correct-horse").unwrap();
        session.receive(rows[1].clone()).unwrap();
        let completion = session.complete_unlock(job.run());

        match completion {
            UnlockCompletion::Applied(report) => assert_eq!(report.decrypted, 2),
            other => panic!("unexpected completion: {:?}", other),
        }
        assert_eq!(session.get(&rows[1].id).unwrap().content(), Some("second"));
    }

    #[test]
    fn test_receive_when_unlocked_decrypts_on_the_fly() {
        let rows = write_entries("correct-horse", &["later"]);
        let mut session = session("u1");
        session.unlock("correct-horse").unwrap();

        let view = session.receive(rows[0].clone()).unwrap().unwrap();
        assert_eq!(view.content(), Some("later"));
        assert_eq!(session.records().len(), 1);
    }

    #[test]
    fn test_receive_when_locked_keeps_ciphertext_only() {
        let rows = write_entries("correct-horse", &["later"]);
        let mut session = session("u1");

        assert!(session.receive(rows[0].clone()).unwrap().is_none());
        assert_eq!(session.sealed().len(), 1);
        assert!(session.records().is_empty());
    }

    #[test]
    fn test_foreign_owner_rejected() {
        let rows = write_entries("correct-horse", &["mine"]);
        let mut other = session("u2");
        assert!(matches!(
            other.load(rows),
            Err(VaultError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_records_ordered_newest_first() {
        let mut rows = write_entries("correct-horse", &["a", "b", "c"]);
        rows.reverse();
        let mut session = session("u1");
        session.load(rows.clone()).unwrap();
        session.unlock("correct-horse").unwrap();

        let contents: Vec<_> = session.entries().filter_map(|r| r.content()).collect();
        assert_eq!(contents, vec!["c", "b", "a"]);
    }

    #[test]
    fn test_toggle_selection_validates_record() {
        let rows = write_entries("correct-horse", &["pick me"]);
        let mut session = session("u1");
        session.load(rows.clone()).unwrap();

        assert!(matches!(
            session.toggle_selection(RecordKind::JournalEntry, rows[0].id),
            Err(VaultError::InvalidState(_))
        ));

        session.unlock("correct-horse").unwrap();
        assert!(matches!(
            session.toggle_selection(RecordKind::AssessmentResponse, rows[0].id),
            Err(VaultError::InvalidInput(_))
        ));
        assert!(session
            .toggle_selection(RecordKind::JournalEntry, rows[0].id)
            .unwrap());
        assert!(matches!(
            session.toggle_selection(RecordKind::JournalEntry, uuid::Uuid::now_v7()),
            Err(VaultError::RecordNotFound(_))
        ));
    }

    #[test]
    fn test_failed_record_not_selectable() {
        let rows = write_entries("correct-horse", &["locked away"]);
        let mut session = session("u1");
        session.load(rows.clone()).unwrap();
        session.unlock("wrong-pass").unwrap();

        assert!(session
            .toggle_selection(RecordKind::JournalEntry, rows[0].id)
            .is_err());
        assert_eq!(session.select_all().unwrap(), 0);
    }

    #[test]
    fn test_forget_drops_selection() {
        let rows = write_entries("correct-horse", &["gone"]);
        let mut session = session("u1");
        session.load(rows.clone()).unwrap();
        session.unlock("correct-horse").unwrap();
        session.select_all().unwrap();

        assert!(session.forget(&rows[0].id));
        assert!(session.selection().is_empty());
        assert!(session.records().is_empty());
        assert!(!session.forget(&rows[0].id));
    }

    #[test]
    fn test_export_refused_while_locked() {
        let session = session("u1");
        let result = session.export(
            ExportFormat::Interchange,
            &crate::template::StaticTemplates::new(),
            &ExportOptions::default(),
        );
        assert!(matches!(
            result,
            Err(VaultError::ExportPreconditionFailed(_))
        ));
    }

    #[test]
    fn test_large_batch_keeps_order() {
        let texts: Vec<String> = (0..(PARALLEL_THRESHOLD * 2)).map(|i| i.to_string()).collect();
        let text_refs: Vec<&str> = texts.iter().map(String::as_str).collect();
        let rows = write_entries("correct-horse", &text_refs);
        let mut session = session("u1");
        session.load(rows.clone()).unwrap();
        session.unlock("correct-horse").unwrap();

        let expected: Vec<RecordId> = session.sealed().iter().map(|r| r.id).collect();
        let actual: Vec<RecordId> = session.records().iter().map(|r| r.id()).collect();
        assert_eq!(actual, expected);
        assert!(session.records().iter().all(|r| !r.decryption_failed()));
    }

    #[test]
    fn test_large_mixed_key_batch_splits_by_key() {
        let good_texts: Vec<String> = (0..50).map(|i| format!("good {}", i)).collect();
        let good_refs: Vec<&str> = good_texts.iter().map(String::as_str).collect();
        let foreign_texts: Vec<String> = (0..30).map(|i| format!("foreign {}", i)).collect();
        let foreign_refs: Vec<&str> = foreign_texts.iter().map(String::as_str).collect();
        let good = write_entries("correct-horse", &good_refs);
        let foreign = write_entries("battery-staple", &foreign_refs);

        let foreign_ids: HashSet<RecordId> = foreign.iter().map(|r| r.id).collect();
        let mut rows = good.clone();
        rows.extend(foreign);
        let mut session = session("u1");
        session.load(rows).unwrap();

        let report = session.unlock("correct-horse").unwrap();
        assert_eq!(report.total, 80);
        assert_eq!(report.decrypted, 50);
        assert_eq!(report.failed.len(), 30);
        assert!(report.failed.iter().all(|id| foreign_ids.contains(id)));

        let expected: Vec<RecordId> = session.sealed().iter().map(|r| r.id).collect();
        let actual: Vec<RecordId> = session.records().iter().map(|r| r.id()).collect();
        assert_eq!(actual, expected);
        for record in session.records() {
            assert_eq!(record.decryption_failed(), foreign_ids.contains(&record.id()));
        }
    }

    #[test]
    fn test_debug_does_not_leak_content() {
        let rows = write_entries("correct-horse", &["very private"]);
        let mut session = session("u1");
        session.load(rows).unwrap();
        session.unlock("correct-horse").unwrap();

        let debug_output = format!("{:?} {:?}", session, session.records());
        assert!(!debug_output.contains("very private"));
    }
}
