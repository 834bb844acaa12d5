use crate::domain::{validate_field_name, DEFAULT_FIELDS};
use crate::error::CoreError;
use serde::{Deserialize, Serialize};

pub const SETTINGS_KEY: &str = "normalization-settings";
pub const DEFAULT_BATCH_SIZE: usize = 10;
pub const DEFAULT_MAX_RECORDS_PER_RUN: usize = 50;
pub const DEFAULT_TTL_DAYS: i64 = 7;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizationConfig {
    pub enabled: bool,
    #[serde(rename = "fieldsToNormalize")]
    pub fields: Vec<String>,
    pub batch_size: usize,
    pub max_records_per_run: usize,
    #[serde(rename = "normalizationTTLDays")]
    pub ttl_days: i64,
}

impl Default for NormalizationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            fields: DEFAULT_FIELDS.iter().map(|field| field.to_string()).collect(),
            batch_size: DEFAULT_BATCH_SIZE,
            max_records_per_run: DEFAULT_MAX_RECORDS_PER_RUN,
            ttl_days: DEFAULT_TTL_DAYS,
        }
    }
}

/// Stored settings. Every attribute is optional; missing ones keep the
/// defaults they are layered over.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields_to_normalize: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub batch_size: Option<i64>,
    #[serde(
        default,
        alias = "maxLeadsPerRun",
        skip_serializing_if = "Option::is_none"
    )]
    pub max_records_per_run: Option<i64>,
    #[serde(
        default,
        rename = "normalizationTTLDays",
        skip_serializing_if = "Option::is_none"
    )]
    pub ttl_days: Option<i64>,
}

impl NormalizationConfig {
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.batch_size == 0 {
            return Err(CoreError::InvalidBatchSize(0));
        }
        if self.max_records_per_run == 0 {
            return Err(CoreError::InvalidMaxRecords(0));
        }
        if self.ttl_days < 0 {
            return Err(CoreError::InvalidTtlDays(self.ttl_days));
        }
        if self.enabled && self.fields.is_empty() {
            return Err(CoreError::EmptyFieldSet);
        }
        Ok(())
    }

    pub fn with_document(&self, doc: &SettingsDocument) -> Result<Self, CoreError> {
        let mut merged = self.clone();

        if let Some(enabled) = doc.enabled {
            merged.enabled = enabled;
        }
        if let Some(fields) = &doc.fields_to_normalize {
            merged.fields = dedup_fields(fields)?;
        }
        if let Some(batch_size) = doc.batch_size {
            merged.batch_size = positive(batch_size).ok_or(CoreError::InvalidBatchSize(batch_size))?;
        }
        if let Some(max_records) = doc.max_records_per_run {
            merged.max_records_per_run =
                positive(max_records).ok_or(CoreError::InvalidMaxRecords(max_records))?;
        }
        if let Some(ttl_days) = doc.ttl_days {
            merged.ttl_days = ttl_days;
        }

        merged.validate()?;
        Ok(merged)
    }
}

/// Ordered, duplicate-free list of validated field names.
pub fn dedup_fields(fields: &[String]) -> Result<Vec<String>, CoreError> {
    let mut out: Vec<String> = Vec::with_capacity(fields.len());
    for field in fields {
        let name = validate_field_name(field)?;
        if !out.contains(&name) {
            out.push(name);
        }
    }
    Ok(out)
}

fn positive(value: i64) -> Option<usize> {
    if value <= 0 {
        return None;
    }
    usize::try_from(value).ok()
}
