pub mod eligibility;
pub mod settings;

pub use eligibility::{is_eligible, staleness_cutoff, EligibilityPolicy, SECONDS_PER_DAY};
pub use settings::{
    NormalizationConfig, SettingsDocument, DEFAULT_BATCH_SIZE, DEFAULT_MAX_RECORDS_PER_RUN,
    DEFAULT_TTL_DAYS, SETTINGS_KEY,
};
