use crate::domain::Lead;
use crate::rules::settings::NormalizationConfig;

pub const SECONDS_PER_DAY: i64 = 24 * 60 * 60;

pub fn staleness_cutoff(now_utc: i64, ttl_days: i64) -> i64 {
    now_utc.saturating_sub(ttl_days.saturating_mul(SECONDS_PER_DAY))
}

pub fn is_eligible(normalized_at: Option<i64>, cutoff: i64, force_all: bool) -> bool {
    if force_all {
        return true;
    }
    match normalized_at {
        None => true,
        Some(at) => at < cutoff,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EligibilityPolicy {
    pub cutoff: i64,
    pub force_all: bool,
}

impl EligibilityPolicy {
    pub fn new(now_utc: i64, config: &NormalizationConfig, force_all: bool) -> Self {
        Self {
            cutoff: staleness_cutoff(now_utc, config.ttl_days),
            force_all,
        }
    }

    pub fn admits(&self, lead: &Lead) -> bool {
        is_eligible(lead.normalized_at, self.cutoff, self.force_all)
    }
}
