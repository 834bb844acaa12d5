use anyhow::{Context as _, Result};
use clap::{Args, Subcommand};
use leadnorm_core::time::now_utc;
use leadnorm_core::{NormalizationConfig, SettingsDocument, SETTINGS_KEY};
use serde::Serialize;
use tracing::warn;

use crate::commands::{print_json, Context};
use crate::error::invalid_input;
use crate::runner::load_settings;

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show the stored settings document and the effective settings
    Show,
    /// Update attributes of the stored settings document
    Set(SetArgs),
    /// Remove the stored settings document
    Reset,
}

#[derive(Debug, Args)]
pub struct SetArgs {
    #[arg(long)]
    pub enabled: Option<bool>,
    #[arg(long, value_delimiter = ',')]
    pub fields: Option<Vec<String>>,
    #[arg(long)]
    pub batch_size: Option<i64>,
    #[arg(long, alias = "max-leads-per-run")]
    pub max_records_per_run: Option<i64>,
    #[arg(long)]
    pub ttl_days: Option<i64>,
}

#[derive(Debug, Serialize)]
struct ConfigDto {
    stored: Option<serde_json::Value>,
    effective: NormalizationConfig,
}

pub fn show(ctx: &Context<'_>) -> Result<()> {
    let stored = ctx
        .store
        .settings()
        .get(SETTINGS_KEY)?
        .map(|raw| serde_json::from_str(&raw).unwrap_or(serde_json::Value::String(raw)));
    let effective = load_settings(ctx.store, &ctx.config.normalization.settings)
        .with_context(|| "load normalization settings")?;
    let dto = ConfigDto { stored, effective };

    if ctx.json {
        return print_json(&dto);
    }
    let effective = &dto.effective;
    println!("enabled: {}", effective.enabled);
    println!("fields: {}", effective.fields.join(", "));
    println!("batch_size: {}", effective.batch_size);
    println!("max_records_per_run: {}", effective.max_records_per_run);
    println!("ttl_days: {}", effective.ttl_days);
    println!(
        "stored: {}",
        if dto.stored.is_some() { "yes" } else { "no" }
    );
    Ok(())
}

pub fn set(ctx: &Context<'_>, args: SetArgs) -> Result<()> {
    let SetArgs {
        enabled,
        fields,
        batch_size,
        max_records_per_run,
        ttl_days,
    } = args;
    if enabled.is_none()
        && fields.is_none()
        && batch_size.is_none()
        && max_records_per_run.is_none()
        && ttl_days.is_none()
    {
        return Err(invalid_input("nothing to set"));
    }

    let mut document = stored_document(ctx)?;
    if enabled.is_some() {
        document.enabled = enabled;
    }
    if fields.is_some() {
        document.fields_to_normalize = fields;
    }
    if batch_size.is_some() {
        document.batch_size = batch_size;
    }
    if max_records_per_run.is_some() {
        document.max_records_per_run = max_records_per_run;
    }
    if ttl_days.is_some() {
        document.ttl_days = ttl_days;
    }

    let effective = ctx.config.normalization.settings.with_document(&document)?;
    let raw = serde_json::to_string(&document)?;
    ctx.store.settings().put(now_utc(), SETTINGS_KEY, &raw)?;

    if ctx.json {
        return print_json(&effective);
    }
    println!("settings updated");
    Ok(())
}

pub fn reset(ctx: &Context<'_>) -> Result<()> {
    let removed = ctx.store.settings().delete(SETTINGS_KEY)?;
    if ctx.json {
        return print_json(&serde_json::json!({ "reset": removed }));
    }
    if removed {
        println!("settings reset to defaults");
    } else {
        println!("no stored settings");
    }
    Ok(())
}

fn stored_document(ctx: &Context<'_>) -> Result<SettingsDocument> {
    let Some(raw) = ctx.store.settings().get(SETTINGS_KEY)? else {
        return Ok(SettingsDocument::default());
    };
    match serde_json::from_str(&raw) {
        Ok(document) => Ok(document),
        Err(err) => {
            warn!(error = %err, "replacing unreadable stored settings");
            Ok(SettingsDocument::default())
        }
    }
}
