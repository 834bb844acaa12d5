use anyhow::Result;
use clap::Args;
use leadnorm_core::time::now_utc;
use leadnorm_core::{FieldMap, LeadId};
use leadnorm_store::repo::LeadNew;
use serde::Serialize;
use serde_json::{Map, Value};
use std::path::PathBuf;

use crate::commands::{print_json, Context};
use crate::error::invalid_input;
use crate::util::read_json_file;

const ID_KEY: &str = "leadId";
const RESERVED_KEYS: [&str; 5] = [ID_KEY, "normalizedAt", "normalizedData", "createdAt", "updatedAt"];

#[derive(Debug, Args)]
pub struct ImportArgs {
    /// JSON file holding an array of lead objects
    pub file: PathBuf,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ImportReport {
    imported: usize,
    lead_ids: Vec<LeadId>,
}

pub fn import(ctx: &Context<'_>, args: ImportArgs) -> Result<()> {
    let value = read_json_file(&args.file)?;
    let Value::Array(entries) = value else {
        return Err(invalid_input("expected a JSON array of leads"));
    };

    let mut inputs = Vec::with_capacity(entries.len());
    for (index, entry) in entries.into_iter().enumerate() {
        let Value::Object(object) = entry else {
            return Err(invalid_input(format!("entry {index} is not an object")));
        };
        inputs.push(lead_from_object(index, object)?);
    }

    let now = now_utc();
    let mut lead_ids = Vec::with_capacity(inputs.len());
    for input in inputs {
        let lead = ctx.store.leads().upsert(now, input)?;
        lead_ids.push(lead.id);
    }

    let report = ImportReport {
        imported: lead_ids.len(),
        lead_ids,
    };
    if ctx.json {
        return print_json(&report);
    }
    println!("imported {} leads", report.imported);
    Ok(())
}

fn lead_from_object(index: usize, object: Map<String, Value>) -> Result<LeadNew> {
    let id = match object.get(ID_KEY) {
        None | Some(Value::Null) => None,
        Some(Value::String(raw)) => Some(
            LeadId::new(raw).map_err(|_| invalid_input(format!("entry {index}: empty leadId")))?,
        ),
        Some(_) => {
            return Err(invalid_input(format!(
                "entry {index}: leadId must be a string"
            )))
        }
    };

    let mut fields = FieldMap::new();
    for (key, value) in object {
        if RESERVED_KEYS.contains(&key.as_str()) {
            continue;
        }
        let text = match value {
            Value::String(text) => text,
            Value::Number(number) => number.to_string(),
            Value::Bool(flag) => flag.to_string(),
            Value::Null | Value::Array(_) | Value::Object(_) => continue,
        };
        fields.insert(key, text);
    }
    Ok(LeadNew { id, fields })
}
