use anyhow::{Context as _, Result};
use clap::Args;
use leadnorm_core::{validate_field_name, Canonicalizer, FieldKind};
use serde::Serialize;

use crate::commands::print_json;
use crate::error::invalid_input;

#[derive(Debug, Args)]
pub struct CanonArgs {
    /// Field name deciding which rules apply (e.g. ciudad, empresa)
    #[arg(long)]
    pub field: String,
    pub value: String,
}

#[derive(Debug, Serialize)]
struct CanonDto<'a> {
    field: &'a str,
    kind: &'static str,
    input: &'a str,
    canonical: String,
}

pub fn canon(args: CanonArgs, json: bool) -> Result<()> {
    let field = validate_field_name(&args.field)?;
    if args.value.trim().is_empty() {
        return Err(invalid_input("value cannot be empty"));
    }

    let canonicalizer = Canonicalizer::builtin().with_context(|| "build canonicalizer")?;
    let dto = CanonDto {
        field: &field,
        kind: FieldKind::classify(&field).label(),
        input: &args.value,
        canonical: canonicalizer.canonicalize(&field, &args.value),
    };

    if json {
        return print_json(&dto);
    }
    println!("{}", dto.canonical);
    Ok(())
}
