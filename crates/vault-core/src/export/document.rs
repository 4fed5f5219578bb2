//! Paginated plain-text document.
//!
//! Pages are separated by a form feed and end with a `Page i of n` footer.
//! Assessment answers are laid out against their template's question list;
//! a question without an answer is printed as `unanswered`.

use chrono::{DateTime, Utc};

use super::{ExportOptions, Selected};
use crate::record::{Answer, AssessmentResponse, DecryptedRecord};
use crate::template::{AnswerType, AssessmentTemplate, TemplateSource};

const UNANSWERED: &str = "unanswered";
const UNREADABLE: &str = "[This record could not be decrypted and is not included.]";
const INDENT: &str = "  ";

/// Render the selection as a paginated document.
pub fn render(
    selected: &Selected<'_>,
    templates: &dyn TemplateSource,
    options: &ExportOptions,
) -> String {
    let mut doc = Lines::new(options.page_width);

    doc.push(&options.title);
    doc.push(&format!(
        "Exported {}",
        format_datetime(&options.generated_at)
    ));
    doc.push(&"=".repeat(options.page_width));
    doc.blank();

    doc.push(&format!("JOURNAL ENTRIES ({})", selected.entries.len()));
    doc.push(&"-".repeat(options.page_width));
    if selected.entries.is_empty() {
        doc.push("(none selected)");
        doc.blank();
    }
    for entry in &selected.entries {
        render_entry(&mut doc, entry);
    }

    doc.push(&format!("SELF-ASSESSMENTS ({})", selected.assessments.len()));
    doc.push(&"-".repeat(options.page_width));
    if selected.assessments.is_empty() {
        doc.push("(none selected)");
        doc.blank();
    }
    for record in &selected.assessments {
        render_assessment(&mut doc, record, templates);
    }

    paginate(&doc.lines, options.page_width, options.page_height)
}

fn render_entry(doc: &mut Lines, entry: &DecryptedRecord) {
    doc.push(&format!("[{}]", format_datetime(&entry.created_at())));
    match entry.content() {
        Some(text) => doc.wrapped(INDENT, text),
        None => doc.wrapped(INDENT, UNREADABLE),
    }
    doc.blank();
}

fn render_assessment(doc: &mut Lines, record: &DecryptedRecord, templates: &dyn TemplateSource) {
    let timestamp = format_datetime(&record.created_at());
    let Some(response) = record.assessment() else {
        doc.push(&format!("[{}]", timestamp));
        doc.wrapped(INDENT, UNREADABLE);
        doc.blank();
        return;
    };

    let template = response
        .template_id
        .as_deref()
        .and_then(|id| templates.template(id));

    match template {
        Some(template) => {
            doc.push(&format!("[{}] {}", timestamp, template.title));
            render_against_template(doc, response, &template);
        }
        None => {
            let label = response
                .template_id
                .as_deref()
                .map(|id| format!("Unknown assessment ({})", id))
                .unwrap_or_else(|| "Assessment".to_string());
            doc.push(&format!("[{}] {}", timestamp, label));
            doc.wrapped(INDENT, "(template unavailable; answers listed by question id)");
            if response.answers.is_empty() {
                doc.wrapped(INDENT, "(no answers recorded)");
            }
            for (question_id, answer) in &response.answers {
                doc.wrapped(INDENT, &format!("{}: {}", question_id, plain_answer(answer)));
            }
        }
    }
    doc.blank();
}

fn render_against_template(
    doc: &mut Lines,
    response: &AssessmentResponse,
    template: &AssessmentTemplate,
) {
    for (index, question) in template.questions.iter().enumerate() {
        doc.wrapped(INDENT, &format!("{}. {}", index + 1, question.text));
        let answer = response
            .answers
            .get(&question.id)
            .filter(|answer| !answer.is_blank())
            .map(|answer| format_answer(answer, question.answer_type))
            .unwrap_or_else(|| UNANSWERED.to_string());
        doc.wrapped("     ", &format!("-> {}", answer));
    }

    let extra: Vec<_> = response
        .answers
        .iter()
        .filter(|(id, _)| template.question(id).is_none())
        .collect();
    if !extra.is_empty() {
        doc.wrapped(INDENT, "Other responses:");
        for (question_id, answer) in extra {
            doc.wrapped("    ", &format!("{}: {}", question_id, plain_answer(answer)));
        }
    }
}

fn plain_answer(answer: &Answer) -> String {
    if answer.is_blank() {
        UNANSWERED.to_string()
    } else {
        answer.to_string()
    }
}

fn format_answer(answer: &Answer, answer_type: AnswerType) -> String {
    match (answer, answer_type) {
        (Answer::Number(value), AnswerType::Scale { max, .. }) => format!("{} / {}", value, max),
        _ => answer.to_string(),
    }
}

fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.format("%Y-%m-%d %H:%M UTC").to_string()
}

/// Logical document lines, already wrapped to the page width.
struct Lines {
    width: usize,
    lines: Vec<String>,
}

impl Lines {
    fn new(width: usize) -> Self {
        Self {
            width,
            lines: Vec::new(),
        }
    }

    fn push(&mut self, line: &str) {
        self.wrapped("", line);
    }

    fn blank(&mut self) {
        self.lines.push(String::new());
    }

    fn wrapped(&mut self, indent: &str, text: &str) {
        let width = self.width.saturating_sub(indent.len()).max(1);
        for line in wrap(text, width) {
            if line.is_empty() {
                self.lines.push(String::new());
            } else {
                self.lines.push(format!("{}{}", indent, line));
            }
        }
    }
}

/// Wrap text to a given width, preserving newlines.
///
/// Words longer than `width` are split.
fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();

    for paragraph in text.split('\n') {
        let paragraph = paragraph.trim_end_matches('\r');
        if paragraph.trim().is_empty() {
            lines.push(String::new());
            continue;
        }

        let mut current_line = String::new();
        for word in paragraph.split_whitespace() {
            let mut word: Vec<char> = word.chars().collect();
            while word.len() > width {
                if !current_line.is_empty() {
                    lines.push(std::mem::take(&mut current_line));
                }
                let rest = word.split_off(width);
                lines.push(word.into_iter().collect());
                word = rest;
            }
            let word: String = word.into_iter().collect();
            if current_line.is_empty() {
                current_line = word;
            } else if current_line.chars().count() + 1 + word.chars().count() <= width {
                current_line.push(' ');
                current_line.push_str(&word);
            } else {
                lines.push(std::mem::replace(&mut current_line, word));
            }
        }
        if !current_line.is_empty() {
            lines.push(current_line);
        }
    }

    lines
}

/// Split lines into pages of `height` lines, the last two being a spacer
/// and the footer.
fn paginate(lines: &[String], width: usize, height: usize) -> String {
    let body_height = height - 2;
    let mut pages: Vec<&[String]> = lines.chunks(body_height).collect();
    if pages.is_empty() {
        pages.push(&[]);
    }
    let total = pages.len();

    let rendered: Vec<String> = pages
        .iter()
        .enumerate()
        .map(|(index, body)| {
            let mut page = String::new();
            for line in body.iter() {
                page.push_str(line);
                page.push('\n');
            }
            let footer = format!("Page {} of {}", index + 1, total);
            let pad = width.saturating_sub(footer.len()) / 2;
            page.push('\n');
            page.push_str(&" ".repeat(pad));
            page.push_str(&footer);
            page.push('\n');
            page
        })
        .collect();

    rendered.join("\x0c")
}
