//! Parsing helpers for command arguments.

use chrono::{DateTime, NaiveDate, Utc};
use vault_core::record::Answer;
use vault_core::{AnswerType, AssessmentTemplate};

use crate::errors::CliError;

/// Parse a datetime string (ISO-8601 or YYYY-MM-DD).
pub fn parse_datetime(value: &str) -> anyhow::Result<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Ok(parsed.with_timezone(&Utc));
    }

    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        let naive = date
            .and_hms_opt(0, 0, 0)
            .ok_or_else(|| anyhow::anyhow!("Invalid date value: {}", value))?;
        return Ok(DateTime::<Utc>::from_naive_utc_and_offset(naive, Utc));
    }

    Err(CliError::invalid_input(format!(
        "Invalid date/time (expected ISO-8601 or YYYY-MM-DD): {}",
        value
    ))
    .into())
}

/// Split a `question_id=value` argument.
pub fn split_answer(raw: &str) -> anyhow::Result<(&str, &str)> {
    let (question_id, value) = raw.split_once('=').ok_or_else(|| {
        CliError::invalid_input(format!(
            "Invalid answer '{}' (expected QUESTION=VALUE)",
            raw
        ))
    })?;
    let question_id = question_id.trim();
    if question_id.is_empty() {
        return Err(CliError::invalid_input(format!("Answer '{}' has no question id", raw)).into());
    }
    Ok((question_id, value.trim()))
}

/// Check an answer against its question and convert it to the stored form.
pub fn parse_answer(
    template: &AssessmentTemplate,
    question_id: &str,
    value: &str,
) -> anyhow::Result<Answer> {
    let question = template.question(question_id).ok_or_else(|| {
        CliError::invalid_input(format!(
            "Template '{}' has no question '{}'",
            template.id, question_id
        ))
    })?;

    match question.answer_type {
        AnswerType::FreeText => Ok(Answer::Text(value.to_string())),
        AnswerType::Scale { min, max } => {
            let number: i64 = value.parse().map_err(|_| {
                CliError::invalid_input(format!(
                    "Answer for '{}' must be a whole number from {} to {}",
                    question_id, min, max
                ))
            })?;
            if number < min || number > max {
                return Err(CliError::invalid_input(format!(
                    "Answer for '{}' must be between {} and {}, got {}",
                    question_id, min, max, number
                ))
                .into());
            }
            Ok(Answer::Number(number))
        }
    }
}
