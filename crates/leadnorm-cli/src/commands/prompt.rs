use anyhow::{Context as _, Result};
use clap::Args;
use leadnorm_core::{build_prompt, LeadId, PROMPT_VERSION};
use serde::Serialize;

use crate::commands::{print_json, Context};
use crate::error::{invalid_input, not_found};
use crate::runner::load_settings;
use crate::util::parse_lead_id;

#[derive(Debug, Args)]
pub struct PromptArgs {
    pub lead_id: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PromptDto {
    lead_id: LeadId,
    prompt_version: &'static str,
    fields: Vec<String>,
    prompt: String,
}

pub fn prompt(ctx: &Context<'_>, args: PromptArgs) -> Result<()> {
    let id = parse_lead_id(&args.lead_id)?;
    let lead = ctx
        .store
        .leads()
        .get(&id)?
        .ok_or_else(|| not_found(format!("lead {id}")))?;
    let settings = load_settings(ctx.store, &ctx.config.normalization.settings)
        .with_context(|| "load normalization settings")?;

    let raw = lead.fields_to_normalize(&settings.fields);
    if raw.is_empty() {
        return Err(invalid_input(format!("lead {id} has no fields to normalize")));
    }
    let dto = PromptDto {
        lead_id: lead.id,
        prompt_version: PROMPT_VERSION,
        fields: raw.iter().map(|(name, _)| name.clone()).collect(),
        prompt: build_prompt(&raw)?,
    };

    if ctx.json {
        return print_json(&dto);
    }
    println!("{}", dto.prompt);
    Ok(())
}
