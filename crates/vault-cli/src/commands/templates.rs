use comfy_table::presets::NOTHING;
use comfy_table::{ContentArrangement, Table};
use vault_core::{AnswerType, TemplateSource};

use crate::app::AppContext;
use crate::cli::TemplatesArgs;
use crate::errors::CliError;

pub fn handle_templates(ctx: &AppContext, args: &TemplatesArgs) -> anyhow::Result<()> {
    let config = ctx.load_config()?;
    let templates = config.template_source();

    if let Some(id) = &args.id {
        let template = templates.template(id).ok_or_else(|| {
            CliError::not_found(
                format!("Template '{}' not found", id),
                "Hint: Run `vault templates` to see configured templates.",
            )
        })?;
        if args.json {
            println!("{}", serde_json::to_string_pretty(&template)?);
            return Ok(());
        }
        println!("{} ({})", template.title, template.id);
        for (index, question) in template.questions.iter().enumerate() {
            let shape = match question.answer_type {
                AnswerType::FreeText => "free text".to_string(),
                AnswerType::Scale { min, max } => format!("scale {}-{}", min, max),
            };
            println!("{}. [{}] {} ({})", index + 1, question.id, question.text, shape);
        }
        return Ok(());
    }

    let listed = templates.list();
    if args.json {
        println!("{}", serde_json::to_string_pretty(&listed)?);
        return Ok(());
    }
    if listed.is_empty() {
        if !ctx.quiet() {
            println!("No templates configured. Add [[templates]] to the config file.");
        }
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(NOTHING);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["ID", "TITLE", "QUESTIONS"]);
    for template in listed {
        table.add_row(vec![
            template.id.clone(),
            template.title.clone(),
            template.questions.len().to_string(),
        ]);
    }
    println!("{}", table);
    Ok(())
}
