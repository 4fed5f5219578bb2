//! Output formatting helpers for the CLI.

use std::io::IsTerminal;

use comfy_table::presets::NOTHING;
use comfy_table::{Cell, Color, ContentArrangement, Table};
use owo_colors::OwoColorize;
use vault_core::record::Answer;
use vault_core::{
    AnswerType, AssessmentResponse, DecryptedRecord, RecordKind, TemplateSource, UnlockReport,
};

use crate::constants::{SHORT_ID_LEN, SUMMARY_WIDTH};

/// Shown in place of content that could not be decrypted.
pub const UNREADABLE: &str = "[unreadable]";

pub fn use_color() -> bool {
    std::io::stdout().is_terminal() && std::env::var_os("NO_COLOR").is_none()
}

pub fn short_id(record: &DecryptedRecord) -> String {
    record.id().to_string().chars().take(SHORT_ID_LEN).collect()
}

pub fn kind_label(kind: RecordKind) -> &'static str {
    match kind {
        RecordKind::JournalEntry => "journal",
        RecordKind::AssessmentResponse => "assessment",
    }
}

/// One-line summary: the first line of a journal entry, or the template and
/// answer count of an assessment.
pub fn summary(record: &DecryptedRecord, templates: &dyn TemplateSource) -> String {
    if let Some(text) = record.content() {
        let first = text.lines().next().unwrap_or_default();
        return truncate(first, SUMMARY_WIDTH);
    }
    if let Some(response) = record.assessment() {
        let title = response
            .template_id
            .as_deref()
            .map(|id| {
                templates
                    .template(id)
                    .map(|template| template.title)
                    .unwrap_or_else(|| id.to_string())
            })
            .unwrap_or_else(|| "Assessment".to_string());
        return format!("{} ({} answers)", title, response.answers.len());
    }
    UNREADABLE.to_string()
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut out: String = text.chars().take(width.saturating_sub(3)).collect();
    out.push_str("...");
    out
}

/// Render records as a borderless table.
pub fn records_table(
    records: &[&DecryptedRecord],
    templates: &dyn TemplateSource,
    color: bool,
) -> String {
    let mut table = Table::new();
    table.load_preset(NOTHING);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["ID", "CREATED", "KIND", "SUMMARY"]);

    for record in records {
        let mut summary_cell = Cell::new(summary(record, templates));
        if record.decryption_failed() && color {
            summary_cell = summary_cell.fg(Color::Red);
        }
        table.add_row(vec![
            Cell::new(short_id(record)),
            Cell::new(record.created_at().format("%Y-%m-%d %H:%M")),
            Cell::new(kind_label(record.kind())),
            summary_cell,
        ]);
    }

    table.to_string()
}

/// Convert a record to JSON for output. Plaintext is included only for
/// readable records.
pub fn record_json(record: &DecryptedRecord) -> serde_json::Value {
    let mut value = serde_json::json!({
        "id": record.id(),
        "kind": record.kind(),
        "created_at": record.created_at(),
        "decryption_failed": record.decryption_failed(),
    });
    if let Some(text) = record.content() {
        value["content"] = serde_json::Value::String(text.to_string());
    }
    if let Some(response) = record.assessment() {
        value["template_id"] = serde_json::json!(response.template_id);
        value["answers"] = serde_json::json!(response.answers);
    }
    value
}

/// Print a single record in human-readable form.
pub fn print_record(
    record: &DecryptedRecord,
    templates: &dyn TemplateSource,
    quiet: bool,
    color: bool,
) {
    if !quiet {
        println!("ID: {}", record.id());
        println!("Kind: {}", kind_label(record.kind()));
        println!("Created: {}", record.created_at().format("%Y-%m-%d %H:%M UTC"));
        println!();
    }

    if let Some(text) = record.content() {
        println!("{}", text);
    } else if let Some(response) = record.assessment() {
        print_assessment(response, templates);
    } else {
        let reason = record
            .failure()
            .map(|failure| failure.to_string())
            .unwrap_or_default();
        if color {
            println!("{} {}", UNREADABLE.red(), reason.dimmed());
        } else {
            println!("{} {}", UNREADABLE, reason);
        }
    }
}

fn print_assessment(response: &AssessmentResponse, templates: &dyn TemplateSource) {
    let template = response
        .template_id
        .as_deref()
        .and_then(|id| templates.template(id));

    let Some(template) = template else {
        if let Some(id) = response.template_id.as_deref() {
            println!("Template {} is not configured", id);
        }
        for (question_id, answer) in &response.answers {
            println!("{}: {}", question_id, answer);
        }
        return;
    };

    println!("{}", template.title);
    for (index, question) in template.questions.iter().enumerate() {
        let answer = answer_text(response.answers.get(&question.id), question.answer_type);
        println!("{}. {}", index + 1, question.text);
        println!("   {}", answer);
    }
    for (question_id, answer) in &response.answers {
        if template.question(question_id).is_none() {
            println!("{}: {}", question_id, answer);
        }
    }
}

fn answer_text(answer: Option<&Answer>, answer_type: AnswerType) -> String {
    match (answer, answer_type) {
        (None, _) => "unanswered".to_string(),
        (Some(answer), _) if answer.is_blank() => "unanswered".to_string(),
        (Some(Answer::Number(value)), AnswerType::Scale { max, .. }) => {
            format!("{} / {}", value, max)
        }
        (Some(answer), _) => answer.to_string(),
    }
}

/// Tell the user when the passphrase opened nothing, or only part of the vault.
pub fn print_unlock_hint(report: &UnlockReport, quiet: bool) {
    if report.all_failed() {
        eprintln!(
            "Warning: none of the {} records could be decrypted.\nHint: Check your passphrase or VAULT_PASSPHRASE.",
            report.total
        );
    } else if !report.failed.is_empty() && !quiet {
        eprintln!(
            "Warning: {} of {} records could not be decrypted and are shown as {}.",
            report.failed.len(),
            report.total,
            UNREADABLE
        );
    }
}
