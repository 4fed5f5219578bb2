//! Add a journal entry or an assessment response.

use std::io::{IsTerminal, Read};

use dialoguer::Input;
use vault_core::{AssessmentResponse, RecordPayload, RecordStore, StaticTemplates, TemplateSource};

use crate::app::AppContext;
use crate::cli::AddArgs;
use crate::errors::CliError;
use crate::helpers::{parse_answer, parse_datetime, split_answer};
use crate::output::kind_label;

pub fn handle_add(ctx: &AppContext, args: &AddArgs) -> anyhow::Result<()> {
    let interactive = ctx.interactive(args.no_input);
    let mut vault = ctx.open_vault()?;

    let payload = match &args.template {
        Some(template_id) => RecordPayload::Assessment(build_response(
            &vault.templates,
            template_id,
            &args.answer,
            interactive,
        )?),
        None => RecordPayload::journal(read_body(args.body.as_deref(), interactive)?),
    };
    let created_at = args.date.as_deref().map(parse_datetime).transpose()?;

    vault.unlock_for_write(interactive)?;
    let mut sealed = vault.session.seal(&payload)?;
    if let Some(created_at) = created_at {
        sealed = sealed.with_created_at(created_at);
    }
    let stored = vault.store.insert(&sealed)?;
    let id = stored.id;
    vault.session.receive(stored)?;
    vault.session.lock();

    if ctx.quiet() {
        println!("{}", id);
    } else {
        println!("Added {} {}", kind_label(payload.kind()), id);
    }
    Ok(())
}

fn read_body(body: Option<&str>, interactive: bool) -> anyhow::Result<String> {
    let text = match body {
        Some(body) => body.to_string(),
        None if !std::io::stdin().is_terminal() => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .map_err(|e| anyhow::anyhow!("Failed to read entry from stdin: {}", e))?;
            buffer
        }
        None if interactive => Input::<String>::new()
            .with_prompt("Entry")
            .interact_text()
            .map_err(|e| anyhow::anyhow!("Failed to read entry: {}", e))?,
        None => {
            return Err(CliError::invalid_input(
                "No entry text provided. Use --body, pipe text on stdin, or drop --no-input.",
            )
            .into())
        }
    };

    let text = text.trim_end().to_string();
    if text.trim().is_empty() {
        return Err(CliError::invalid_input("Entry text must not be empty").into());
    }
    Ok(text)
}

fn build_response(
    templates: &StaticTemplates,
    template_id: &str,
    raw_answers: &[String],
    interactive: bool,
) -> anyhow::Result<AssessmentResponse> {
    let template = templates.template(template_id).ok_or_else(|| {
        CliError::not_found(
            format!("Template '{}' not found", template_id),
            "Hint: Run `vault templates` to see configured templates.",
        )
    })?;

    let mut response = AssessmentResponse::new(template.id.clone());
    for raw in raw_answers {
        let (question_id, value) = split_answer(raw)?;
        let answer = parse_answer(&template, question_id, value)?;
        response = response.with_answer(question_id, answer);
    }

    if response.answers.is_empty() && interactive {
        for question in &template.questions {
            let value: String = Input::new()
                .with_prompt(question.text.as_str())
                .allow_empty(true)
                .interact_text()
                .map_err(|e| anyhow::anyhow!("Failed to read answer: {}", e))?;
            if value.trim().is_empty() {
                continue;
            }
            let answer = parse_answer(&template, &question.id, value.trim())?;
            response = response.with_answer(question.id.clone(), answer);
        }
    }

    if response.answers.is_empty() {
        return Err(CliError::invalid_input(format!(
            "No answers given for template '{}'. Use --answer QUESTION=VALUE.",
            template_id
        ))
        .into());
    }
    Ok(response)
}
