//! SQLite record store.
//!
//! Rows hold ciphertext and nonces only. The database file is left
//! unencrypted because nothing in it is readable without the vault key.

mod row;

use std::path::Path;

use chrono::{SecondsFormat, SubsecRound, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use uuid::Uuid;

use super::traits::{validate_new_record, RecordStore};
use crate::error::{Result, VaultError};
use crate::record::{EncryptedRecord, NewEncryptedRecord, OwnerId, RecordId};

use row::RecordRow;

/// Current on-disk schema version.
const SCHEMA_VERSION: &str = "1";

/// SQLite-backed record store.
pub struct SqliteRecordStore {
    conn: Connection,
}

impl SqliteRecordStore {
    /// Open (or create) a store at `path`.
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        Self::from_connection(conn)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS meta (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS records (
                id TEXT PRIMARY KEY,
                owner_id TEXT NOT NULL,
                kind TEXT NOT NULL CHECK (kind IN ('journal_entry', 'assessment_response')),
                ciphertext BLOB NOT NULL,
                nonce BLOB NOT NULL,
                created_at TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS records_owner_created
                ON records (owner_id, created_at DESC);
            "#,
        )?;

        let version: Option<String> = conn
            .query_row(
                "SELECT value FROM meta WHERE key = 'schema_version'",
                [],
                |row| row.get(0),
            )
            .optional()?;

        match version.as_deref() {
            None => {
                conn.execute(
                    "INSERT INTO meta (key, value) VALUES ('schema_version', ?1)",
                    params![SCHEMA_VERSION],
                )?;
            }
            Some(SCHEMA_VERSION) => {}
            Some(other) => {
                return Err(VaultError::Storage(format!(
                    "Unsupported record store schema version: {}",
                    other
                )));
            }
        }

        Ok(Self { conn })
    }
}

impl RecordStore for SqliteRecordStore {
    fn fetch(&self, owner_id: &OwnerId) -> Result<Vec<EncryptedRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, owner_id, kind, ciphertext, nonce, created_at
             FROM records
             WHERE owner_id = ?1
             ORDER BY created_at DESC, id DESC",
        )?;
        let rows = stmt.query_map(params![owner_id.as_str()], RecordRow::from_sql)?;

        let mut records = Vec::new();
        for row in rows {
            let row = row?;
            let row_id = row.id.clone();
            match EncryptedRecord::try_from(row) {
                Ok(record) => records.push(record),
                Err(e) => {
                    tracing::warn!(row_id = %row_id, error = %e, "skipping malformed record row")
                }
            }
        }
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
            // Stored with microsecond precision; truncate so the returned
            // record matches what a later fetch yields.
            created_at: record.created_at.unwrap_or_else(Utc::now).trunc_subsecs(6),
        };

        self.conn.execute(
            "INSERT INTO records (id, owner_id, kind, ciphertext, nonce, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                stored.id.to_string(),
                stored.owner_id.as_str(),
                stored.kind.as_str(),
                stored.ciphertext,
                stored.nonce,
                // Fixed precision so lexical order matches time order.
                stored
                    .created_at
                    .to_rfc3339_opts(SecondsFormat::Micros, true),
            ],
        )?;

        Ok(stored)
    }

    fn delete(&mut self, id: &RecordId) -> Result<()> {
        let affected = self
            .conn
            .execute("DELETE FROM records WHERE id = ?1", params![id.to_string()])?;
        if affected == 0 {
            return Err(VaultError::RecordNotFound(*id));
        }
        Ok(())
    }
}
