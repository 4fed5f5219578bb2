//! Selective export of decrypted records.
//!
//! The pipeline reads only already-decrypted, in-memory records and returns
//! bytes. It performs no storage or network I/O and never sees ciphertext or
//! key material.
//!
//! Both artifact formats are **unencrypted plaintext**. Callers must treat
//! the returned bytes with the same care as the journal itself.
//!
//! - **Document**: paginated, human-readable text ([`document`])
//! - **Interchange**: JSON snapshot for personal archival ([`interchange`])

pub mod document;
pub mod interchange;

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};

use crate::error::{Result, VaultError};
use crate::record::{DecryptedRecord, RecordKind};
use crate::selection::ExportSelection;
use crate::template::TemplateSource;

/// Artifact encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Document,
    Interchange,
}

impl ExportFormat {
    pub fn media_type(&self) -> &'static str {
        match self {
            ExportFormat::Document => "text/plain; charset=utf-8",
            ExportFormat::Interchange => "application/json",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Document => "txt",
            ExportFormat::Interchange => "json",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportFormat::Document => f.write_str("document"),
            ExportFormat::Interchange => f.write_str("interchange"),
        }
    }
}

impl FromStr for ExportFormat {
    type Err = VaultError;

    fn from_str(value: &str) -> Result<Self> {
        match value {
            "document" | "doc" | "txt" => Ok(ExportFormat::Document),
            "interchange" | "json" => Ok(ExportFormat::Interchange),
            other => Err(VaultError::InvalidInput(format!(
                "Unsupported export format: {} (use document or interchange)",
                other
            ))),
        }
    }
}

/// Rendering options.
#[derive(Debug, Clone)]
pub struct ExportOptions {
    pub title: String,
    pub generated_at: DateTime<Utc>,
    /// Maximum characters per document line
    pub page_width: usize,
    /// Lines per document page, footer included
    pub page_height: usize,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            title: "Journal Export".to_string(),
            generated_at: Utc::now(),
            page_width: 78,
            page_height: 60,
        }
    }
}

/// A rendered export.
///
/// The bytes are plaintext. Nothing here re-encrypts them.
#[derive(Debug, Clone)]
pub struct Artifact {
    pub format: ExportFormat,
    pub media_type: &'static str,
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl Artifact {
    /// Always `true`: exports carry decrypted content.
    pub fn is_plaintext(&self) -> bool {
        true
    }
}

/// Selected records split by kind, order preserved.
pub struct Selected<'a> {
    pub entries: Vec<&'a DecryptedRecord>,
    pub assessments: Vec<&'a DecryptedRecord>,
}

impl<'a> Selected<'a> {
    pub fn filter(records: &'a [DecryptedRecord], selection: &ExportSelection) -> Self {
        let mut entries = Vec::new();
        let mut assessments = Vec::new();
        for record in records {
            if !selection.contains(record.kind(), &record.id()) {
                continue;
            }
            match record.kind() {
                RecordKind::JournalEntry => entries.push(record),
                RecordKind::AssessmentResponse => assessments.push(record),
            }
        }
        Self {
            entries,
            assessments,
        }
    }
}

/// Render the records in `selection` as `format`.
///
/// Records not in `selection` never reach the renderer. Unreadable records
/// that are selected render as a failure placeholder.
pub fn export(
    records: &[DecryptedRecord],
    selection: &ExportSelection,
    format: ExportFormat,
    templates: &dyn TemplateSource,
    options: &ExportOptions,
) -> Result<Artifact> {
    if options.page_width < 20 || options.page_height < 10 {
        return Err(VaultError::InvalidInput(
            "Page must be at least 20 columns by 10 lines".to_string(),
        ));
    }

    let selected = Selected::filter(records, selection);
    let bytes = match format {
        ExportFormat::Document => document::render(&selected, templates, options).into_bytes(),
        ExportFormat::Interchange => interchange::render(&selected, options)?,
    };

    tracing::info!(
        %format,
        entries = selected.entries.len(),
        assessments = selected.assessments.len(),
        "export rendered"
    );

    Ok(Artifact {
        format,
        media_type: format.media_type(),
        file_name: format!(
            "journal-export-{}.{}",
            options.generated_at.format("%Y%m%dT%H%M%SZ"),
            format.extension()
        ),
        bytes,
    })
}
