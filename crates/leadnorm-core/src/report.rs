use crate::domain::LeadId;
use serde::Serialize;

pub const MESSAGE_DISABLED: &str = "Normalization is disabled";
pub const MESSAGE_NOTHING_ELIGIBLE: &str = "No leads require normalization";
pub const MESSAGE_COMPLETE: &str = "Normalization complete";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RecordOutcome {
    Normalized {
        #[serde(rename = "fieldsNormalized")]
        fields_normalized: Vec<String>,
    },
    Skipped {
        reason: String,
    },
    #[serde(rename = "error")]
    Errored {
        error: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordDetail {
    pub lead_id: LeadId,
    #[serde(flatten)]
    pub outcome: RecordOutcome,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EffectiveConfig {
    pub batch_size: usize,
    pub max_records_per_run: usize,
    pub fields_normalized: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunSummary {
    pub records_processed: usize,
    pub records_normalized: usize,
    pub records_skipped: usize,
    pub records_errored: usize,
    pub details: Vec<RecordDetail>,
    pub duration_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub effective_config: Option<EffectiveConfig>,
}

impl RunSummary {
    pub fn record(&mut self, lead_id: LeadId, outcome: RecordOutcome) {
        self.records_processed += 1;
        match &outcome {
            RecordOutcome::Normalized { .. } => self.records_normalized += 1,
            RecordOutcome::Skipped { .. } => self.records_skipped += 1,
            RecordOutcome::Errored { .. } => self.records_errored += 1,
        }
        self.details.push(RecordDetail { lead_id, outcome });
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunReport {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(flatten)]
    pub summary: Option<RunSummary>,
}

impl RunReport {
    pub fn disabled() -> Self {
        Self {
            message: MESSAGE_DISABLED.to_string(),
            enabled: Some(false),
            summary: None,
        }
    }

    pub fn nothing_eligible(duration_ms: u64) -> Self {
        Self {
            message: MESSAGE_NOTHING_ELIGIBLE.to_string(),
            enabled: None,
            summary: Some(RunSummary {
                duration_ms,
                ..RunSummary::default()
            }),
        }
    }

    pub fn complete(summary: RunSummary) -> Self {
        Self {
            message: MESSAGE_COMPLETE.to_string(),
            enabled: None,
            summary: Some(summary),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{RecordOutcome, RunReport, RunSummary};
    use crate::domain::LeadId;
    use serde_json::json;

    #[test]
    fn disabled_report_is_minimal() {
        let value = serde_json::to_value(RunReport::disabled()).unwrap();
        assert_eq!(
            value,
            json!({"message": "Normalization is disabled", "enabled": false})
        );
    }

    #[test]
    fn summary_counts_each_outcome() {
        let mut summary = RunSummary::default();
        summary.record(
            LeadId::new("a").unwrap(),
            RecordOutcome::Normalized {
                fields_normalized: vec!["nombres".to_string()],
            },
        );
        summary.record(
            LeadId::new("b").unwrap(),
            RecordOutcome::Skipped {
                reason: "No fields to normalize".to_string(),
            },
        );
        summary.record(
            LeadId::new("c").unwrap(),
            RecordOutcome::Errored {
                error: "empty response".to_string(),
            },
        );
        assert_eq!(summary.records_processed, 3);
        assert_eq!(summary.records_normalized, 1);
        assert_eq!(summary.records_skipped, 1);
        assert_eq!(summary.records_errored, 1);

        let value = serde_json::to_value(RunReport::complete(summary)).unwrap();
        assert_eq!(value["message"], "Normalization complete");
        assert_eq!(value["recordsProcessed"], 3);
        assert_eq!(
            value["details"][0],
            json!({"leadId": "a", "status": "normalized", "fieldsNormalized": ["nombres"]})
        );
        assert_eq!(value["details"][2]["status"], "error");
        assert!(value.get("enabled").is_none());
    }
}
