use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LeadId(String);

impl LeadId {
    pub fn new(raw: &str) -> Result<Self, CoreError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(CoreError::EmptyLeadId);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LeadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for LeadId {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::LeadId;
    use crate::error::CoreError;

    #[test]
    fn lead_id_trims_input() {
        let id = LeadId::new("  lead-42 ").unwrap();
        assert_eq!(id.as_str(), "lead-42");
    }

    #[test]
    fn lead_id_rejects_blank() {
        assert_eq!(LeadId::new("   "), Err(CoreError::EmptyLeadId));
    }

    #[test]
    fn generated_ids_are_distinct() {
        assert_ne!(LeadId::generate(), LeadId::generate());
    }
}
