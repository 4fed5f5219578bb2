//! Export selection.
//!
//! The caller picks which decrypted records go into the next export. Entries
//! and assessment responses are tracked in separate sets. The selection is
//! never persisted.

use std::collections::BTreeSet;

use crate::record::{DecryptedRecord, RecordId, RecordKind};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportSelection {
    entries: BTreeSet<RecordId>,
    assessments: BTreeSet<RecordId>,
}

impl ExportSelection {
    pub fn new() -> Self {
        Self::default()
    }

    fn set(&self, kind: RecordKind) -> &BTreeSet<RecordId> {
        match kind {
            RecordKind::JournalEntry => &self.entries,
            RecordKind::AssessmentResponse => &self.assessments,
        }
    }

    fn set_mut(&mut self, kind: RecordKind) -> &mut BTreeSet<RecordId> {
        match kind {
            RecordKind::JournalEntry => &mut self.entries,
            RecordKind::AssessmentResponse => &mut self.assessments,
        }
    }

    /// Flip membership of `id`. Returns `true` if it is now selected.
    pub fn toggle(&mut self, kind: RecordKind, id: RecordId) -> bool {
        let set = self.set_mut(kind);
        if set.remove(&id) {
            false
        } else {
            set.insert(id);
            true
        }
    }

    pub fn insert(&mut self, kind: RecordKind, id: RecordId) {
        self.set_mut(kind).insert(id);
    }

    /// Select every readable record in `records`.
    pub fn select_all<'a>(&mut self, records: impl IntoIterator<Item = &'a DecryptedRecord>) {
        for record in records {
            if !record.decryption_failed() {
                self.insert(record.kind(), record.id());
            }
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.assessments.clear();
    }

    /// Drop `id` from whichever set holds it.
    pub fn remove(&mut self, id: &RecordId) {
        self.entries.remove(id);
        self.assessments.remove(id);
    }

    pub fn contains(&self, kind: RecordKind, id: &RecordId) -> bool {
        self.set(kind).contains(id)
    }

    pub fn entries(&self) -> &BTreeSet<RecordId> {
        &self.entries
    }

    pub fn assessments(&self) -> &BTreeSet<RecordId> {
        &self.assessments
    }

    pub fn len(&self) -> usize {
        self.entries.len() + self.assessments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty() && self.assessments.is_empty()
    }
}
