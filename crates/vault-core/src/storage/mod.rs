//! Record store collaborators.
//!
//! The record store only ever sees ciphertext, nonces, record kinds, owner
//! ids and timestamps. Two implementations are provided:
//!
//! - [`MemoryRecordStore`]: in-process, for tests and embedding
//! - [`SqliteRecordStore`]: a plain SQLite file (the file itself is not
//!   encrypted; every payload in it already is)

mod memory;
pub mod sqlite;
mod traits;

pub use memory::MemoryRecordStore;
pub use sqlite::SqliteRecordStore;
pub use traits::RecordStore;
