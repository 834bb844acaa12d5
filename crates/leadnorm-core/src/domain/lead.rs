use crate::domain::ids::LeadId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub type FieldMap = BTreeMap<String, String>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lead {
    pub id: LeadId,
    pub fields: FieldMap,
    pub normalized_at: Option<i64>,
    pub normalized_data: Option<FieldMap>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Lead {
    /// Requested fields that carry a value, in request order.
    pub fn fields_to_normalize(&self, requested: &[String]) -> Vec<(String, String)> {
        requested
            .iter()
            .filter_map(|name| {
                let value = self.fields.get(name)?;
                if value.trim().is_empty() {
                    return None;
                }
                Some((name.clone(), value.clone()))
            })
            .collect()
    }
}
