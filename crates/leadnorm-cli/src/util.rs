use anyhow::{Context as _, Result};
use leadnorm_core::LeadId;
use std::fs;
use std::path::Path;

use crate::error::invalid_input;

pub fn parse_lead_id(raw: &str) -> Result<LeadId> {
    LeadId::new(raw).map_err(|_| invalid_input("lead id cannot be empty"))
}

pub fn read_json_file(path: &Path) -> Result<serde_json::Value> {
    let raw = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let value =
        serde_json::from_str(&raw).with_context(|| format!("parse JSON in {}", path.display()))?;
    Ok(value)
}
