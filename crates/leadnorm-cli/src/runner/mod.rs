pub mod settings;

use std::thread;
use std::time::{Duration, Instant};

use leadnorm_core::time::now_utc;
use leadnorm_core::{
    build_prompt, parse_response, Canonicalizer, CoreError, EffectiveConfig, EligibilityPolicy,
    FieldMap, Invocation, Lead, LeadId, NormalizationConfig, ParseError, RecordOutcome, RunReport,
    RunSummary, PROMPT_VERSION,
};
use leadnorm_generate::{GenerateError, TextGenerator};
use leadnorm_store::error::StoreError;
use leadnorm_store::Store;
use thiserror::Error;
use tracing::{debug, info, warn};

pub use settings::load_settings;

pub const SCAN_PAGE_SIZE: usize = 100;
pub const SKIP_NO_FIELDS: &str = "No fields to normalize";

#[derive(Debug, Error)]
pub enum RunError {
    #[error("invalid normalization settings: {0}")]
    Settings(#[source] CoreError),
    #[error("lead scan failed: {0}")]
    Scan(#[source] StoreError),
}

#[derive(Debug, Error)]
enum RecordError {
    #[error(transparent)]
    Prompt(#[from] CoreError),
    #[error(transparent)]
    Generate(#[from] GenerateError),
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error("persist failed: {0}")]
    Persist(#[from] StoreError),
}

pub struct Runner<'a> {
    store: &'a Store,
    generator: &'a dyn TextGenerator,
    canon: &'a Canonicalizer,
    defaults: &'a NormalizationConfig,
    batch_delay: Duration,
}

impl<'a> Runner<'a> {
    pub fn new(
        store: &'a Store,
        generator: &'a dyn TextGenerator,
        canon: &'a Canonicalizer,
        defaults: &'a NormalizationConfig,
    ) -> Self {
        Self {
            store,
            generator,
            canon,
            defaults,
            batch_delay: Duration::ZERO,
        }
    }

    pub fn with_batch_delay(mut self, delay: Duration) -> Self {
        self.batch_delay = delay;
        self
    }

    pub fn run(&self, invocation: Invocation) -> Result<RunReport, RunError> {
        let started = Instant::now();
        info!(
            invocation = invocation.label(),
            force_all = invocation.force_all(),
            prompt_version = PROMPT_VERSION,
            generator = self.generator.name(),
            "starting normalization run"
        );

        let config = load_settings(self.store, self.defaults).map_err(RunError::Settings)?;
        if !config.enabled {
            info!("normalization disabled by settings");
            return Ok(RunReport::disabled());
        }

        let policy = EligibilityPolicy::new(now_utc(), &config, invocation.force_all());
        let leads = select_eligible(self.store, &config, &policy).map_err(RunError::Scan)?;
        if leads.is_empty() {
            info!("no leads require normalization");
            return Ok(RunReport::nothing_eligible(elapsed_ms(started)));
        }
        info!(count = leads.len(), "found leads to normalize");

        let mut summary = RunSummary::default();
        let batches: Vec<&[Lead]> = leads.chunks(config.batch_size).collect();
        let last_batch = batches.len().saturating_sub(1);
        for (index, batch) in batches.into_iter().enumerate() {
            for lead in batch {
                let outcome = self.normalize_lead(lead, &config.fields);
                summary.record(lead.id.clone(), outcome);
            }
            if index < last_batch && !self.batch_delay.is_zero() {
                thread::sleep(self.batch_delay);
            }
        }

        summary.duration_ms = elapsed_ms(started);
        summary.effective_config = Some(EffectiveConfig {
            batch_size: config.batch_size,
            max_records_per_run: leads.len().min(config.max_records_per_run),
            fields_normalized: config.fields.clone(),
        });
        info!(
            normalized = summary.records_normalized,
            skipped = summary.records_skipped,
            errors = summary.records_errored,
            duration_ms = summary.duration_ms,
            "normalization complete"
        );
        Ok(RunReport::complete(summary))
    }

    fn normalize_lead(&self, lead: &Lead, requested: &[String]) -> RecordOutcome {
        let raw = lead.fields_to_normalize(requested);
        if raw.is_empty() {
            debug!(lead_id = %lead.id, "no fields to normalize");
            return RecordOutcome::Skipped {
                reason: SKIP_NO_FIELDS.to_string(),
            };
        }

        match self.try_normalize(&lead.id, &raw) {
            Ok(fields_normalized) => RecordOutcome::Normalized { fields_normalized },
            Err(err) => {
                warn!(lead_id = %lead.id, error = %err, "lead normalization failed");
                RecordOutcome::Errored {
                    error: err.to_string(),
                }
            }
        }
    }

    fn try_normalize(
        &self,
        id: &LeadId,
        raw: &[(String, String)],
    ) -> Result<Vec<String>, RecordError> {
        let instruction = build_prompt(raw)?;
        let output = self.generator.generate(&instruction)?;
        if output.trim().is_empty() {
            return Err(GenerateError::EmptyResponse.into());
        }

        let parsed = parse_response(&output, self.canon)?;
        let mut normalized = FieldMap::new();
        for (field, value) in parsed {
            if raw.iter().any(|(name, _)| name == &field) {
                normalized.insert(field, value);
            } else {
                debug!(lead_id = %id, field = %field, "dropping unrequested field");
            }
        }

        self.store
            .leads()
            .apply_normalization(now_utc(), id, &normalized)?;

        Ok(raw
            .iter()
            .filter(|(name, _)| normalized.contains_key(name))
            .map(|(name, _)| name.clone())
            .collect())
    }
}

/// Pages through the whole store collecting eligible leads until the store
/// is exhausted or the per-run cap is reached. The result never exceeds the
/// cap.
pub fn select_eligible(
    store: &Store,
    config: &NormalizationConfig,
    policy: &EligibilityPolicy,
) -> Result<Vec<Lead>, StoreError> {
    let mut projection = config.fields.clone();
    projection.sort();
    let mut selected = Vec::new();
    let mut cursor: Option<LeadId> = None;

    loop {
        let page = store
            .leads()
            .scan_page(cursor.as_ref(), SCAN_PAGE_SIZE, Some(&projection))?;
        selected.extend(page.leads.into_iter().filter(|lead| policy.admits(lead)));
        if selected.len() >= config.max_records_per_run {
            break;
        }
        match page.last_evaluated {
            Some(next) => cursor = Some(next),
            None => break,
        }
    }

    selected.truncate(config.max_records_per_run);
    Ok(selected)
}

fn elapsed_ms(started: Instant) -> u64 {
    u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)
}
