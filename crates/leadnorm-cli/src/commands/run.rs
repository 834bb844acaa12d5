use anyhow::{Context as _, Result};
use clap::Args;
use leadnorm_core::{Canonicalizer, Invocation, RecordOutcome, RunReport, TriggerEvent};
use leadnorm_generate::{MessagesClient, MessagesSettings};
use std::env;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;
use tracing::warn;

use crate::commands::{print_json, Context};
use crate::runner::Runner;

#[derive(Debug, Args)]
pub struct RunArgs {
    /// Reprocess every lead regardless of when it was last normalized
    #[arg(long)]
    pub force_all: bool,
    /// Trigger event document (JSON)
    #[arg(long, value_name = "FILE")]
    pub event: Option<PathBuf>,
}

pub fn run(ctx: &Context<'_>, args: RunArgs) -> Result<()> {
    let invocation = resolve_invocation(&args)?;
    let canon = Canonicalizer::builtin().with_context(|| "build canonicalizer")?;

    let generation = &ctx.config.generation;
    let client = MessagesClient::new(MessagesSettings {
        base_url: generation.base_url.clone(),
        model: generation.model.clone(),
        api_key_env: generation.api_key_env.clone(),
        api_key: env::var(&generation.api_key_env).ok(),
        max_tokens: generation.max_tokens,
        timeout_secs: generation.timeout_secs,
    })
    .with_context(|| "build generation client")?;

    let normalization = &ctx.config.normalization;
    let report = Runner::new(ctx.store, &client, &canon, &normalization.settings)
        .with_batch_delay(Duration::from_millis(normalization.batch_delay_ms))
        .run(invocation)
        .with_context(|| "normalization run failed")?;

    if ctx.json {
        print_json(&report)?;
    } else {
        print_report(&report);
    }
    Ok(())
}

fn resolve_invocation(args: &RunArgs) -> Result<Invocation> {
    let event = match &args.event {
        Some(path) => {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("read event {}", path.display()))?;
            TriggerEvent::from_json(&raw)
                .with_context(|| format!("parse event {}", path.display()))?
        }
        None => TriggerEvent::default(),
    };
    let invocation = event.invocation()?;

    if !args.force_all {
        return Ok(invocation);
    }
    match invocation {
        Invocation::Scheduled => {
            warn!("--force-all ignored for scheduled events");
            Ok(invocation)
        }
        Invocation::Manual { .. } => Ok(Invocation::Manual { force_all: true }),
    }
}

fn print_report(report: &RunReport) {
    println!("{}", report.message);
    let Some(summary) = &report.summary else {
        return;
    };
    println!(
        "processed: {} normalized: {} skipped: {} errors: {} ({} ms)",
        summary.records_processed,
        summary.records_normalized,
        summary.records_skipped,
        summary.records_errored,
        summary.duration_ms
    );
    for detail in &summary.details {
        match &detail.outcome {
            RecordOutcome::Normalized { fields_normalized } => {
                println!("  {} normalized [{}]", detail.lead_id, fields_normalized.join(", "));
            }
            RecordOutcome::Skipped { reason } => {
                println!("  {} skipped: {}", detail.lead_id, reason);
            }
            RecordOutcome::Errored { error } => {
                println!("  {} error: {}", detail.lead_id, error);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{resolve_invocation, RunArgs};
    use leadnorm_core::Invocation;
    use std::fs;
    use tempfile::TempDir;

    fn args(force_all: bool, event: Option<&str>) -> (RunArgs, TempDir) {
        let temp = TempDir::new().expect("tempdir");
        let event = event.map(|body| {
            let path = temp.path().join("event.json");
            fs::write(&path, body).expect("write event");
            path
        });
        (RunArgs { force_all, event }, temp)
    }

    #[test]
    fn no_event_is_a_manual_run() {
        let (args, _temp) = args(false, None);
        assert_eq!(
            resolve_invocation(&args).unwrap(),
            Invocation::Manual { force_all: false }
        );
    }

    #[test]
    fn flag_overrides_manual_event() {
        let (args, _temp) = args(true, Some(r#"{"forceAll": false}"#));
        assert!(resolve_invocation(&args).unwrap().force_all());
    }

    #[test]
    fn flag_never_forces_scheduled_event() {
        let (args, _temp) = args(true, Some(r#"{"source": "aws.events"}"#));
        assert_eq!(resolve_invocation(&args).unwrap(), Invocation::Scheduled);
    }
}
