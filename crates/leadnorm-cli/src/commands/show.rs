use anyhow::Result;
use clap::Args;
use leadnorm_core::time::format_timestamp_datetime;
use leadnorm_core::{FieldMap, LeadId};
use serde::Serialize;

use crate::commands::{print_json, Context};
use crate::error::not_found;
use crate::util::parse_lead_id;

#[derive(Debug, Args)]
pub struct ShowArgs {
    pub lead_id: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct LeadDetailDto {
    lead_id: LeadId,
    fields: FieldMap,
    normalized_at: Option<i64>,
    normalized_data: Option<FieldMap>,
    created_at: i64,
    updated_at: i64,
}

pub fn show(ctx: &Context<'_>, args: ShowArgs) -> Result<()> {
    let id = parse_lead_id(&args.lead_id)?;
    let lead = ctx
        .store
        .leads()
        .get(&id)?
        .ok_or_else(|| not_found(format!("lead {id}")))?;

    let detail = LeadDetailDto {
        lead_id: lead.id,
        fields: lead.fields,
        normalized_at: lead.normalized_at,
        normalized_data: lead.normalized_data,
        created_at: lead.created_at,
        updated_at: lead.updated_at,
    };

    if ctx.json {
        print_json(&detail)?;
        return Ok(());
    }

    println!("lead: {}", detail.lead_id);
    for (name, value) in &detail.fields {
        println!("  {}: {}", name, value);
    }
    match detail.normalized_at {
        Some(at) => println!("normalized_at: {}", format_timestamp_datetime(at)),
        None => println!("normalized_at: never"),
    }
    if let Some(data) = &detail.normalized_data {
        println!("normalized_data:");
        for (name, value) in data {
            println!("  {}: {}", name, value);
        }
    }
    println!(
        "updated_at: {}",
        format_timestamp_datetime(detail.updated_at)
    );
    Ok(())
}
