//! JSON interchange snapshot.
//!
//! The file is unencrypted and says so in its `notice` field.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::{ExportOptions, Selected};
use crate::error::Result;
use crate::record::{Answer, DecryptedRecord};

/// Identifies the snapshot format.
pub const FORMAT_NAME: &str = "journal-vault-export";
pub const FORMAT_VERSION: u32 = 1;

const NOTICE: &str = "This file contains your decrypted journal in plain text. \
It is not encrypted; store it somewhere only you can read.";

#[derive(Serialize)]
struct Snapshot<'a> {
    format: &'static str,
    version: u32,
    title: &'a str,
    exported_at: DateTime<Utc>,
    notice: &'static str,
    entries: Vec<EntryJson<'a>>,
    assessments: Vec<AssessmentJson<'a>>,
}

#[derive(Serialize)]
struct EntryJson<'a> {
    id: Uuid,
    created_at: DateTime<Utc>,
    content: Option<&'a str>,
    #[serde(skip_serializing_if = "is_false")]
    decryption_failed: bool,
}

#[derive(Serialize)]
struct AssessmentJson<'a> {
    id: Uuid,
    created_at: DateTime<Utc>,
    template_id: Option<&'a str>,
    answers: Option<&'a BTreeMap<String, Answer>>,
    #[serde(skip_serializing_if = "is_false")]
    decryption_failed: bool,
}

fn is_false(value: &bool) -> bool {
    !*value
}

fn entry_json(record: &DecryptedRecord) -> EntryJson<'_> {
    EntryJson {
        id: record.id(),
        created_at: record.created_at(),
        content: record.content(),
        decryption_failed: record.decryption_failed(),
    }
}

fn assessment_json(record: &DecryptedRecord) -> AssessmentJson<'_> {
    let response = record.assessment();
    AssessmentJson {
        id: record.id(),
        created_at: record.created_at(),
        template_id: response.and_then(|r| r.template_id.as_deref()),
        answers: response.map(|r| &r.answers),
        decryption_failed: record.decryption_failed(),
    }
}

/// Render the selection as pretty-printed JSON.
pub fn render(selected: &Selected<'_>, options: &ExportOptions) -> Result<Vec<u8>> {
    let snapshot = Snapshot {
        format: FORMAT_NAME,
        version: FORMAT_VERSION,
        title: &options.title,
        exported_at: options.generated_at,
        notice: NOTICE,
        entries: selected.entries.iter().map(|r| entry_json(r)).collect(),
        assessments: selected
            .assessments
            .iter()
            .map(|r| assessment_json(r))
            .collect(),
    };
    Ok(serde_json::to_vec_pretty(&snapshot)?)
}
