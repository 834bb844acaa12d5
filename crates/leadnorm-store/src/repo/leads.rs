use crate::error::{Result, StoreError};
use leadnorm_core::domain::{FieldMap, Lead, LeadId};
use rusqlite::{params, Connection};
use std::str::FromStr;

const LEAD_COLUMNS: &str =
    "lead_id, fields, normalized_at, normalized_data, created_at, updated_at";

#[derive(Debug, Clone, Default)]
pub struct LeadNew {
    pub id: Option<LeadId>,
    pub fields: FieldMap,
}

/// One page of a full scan. `last_evaluated` is set only when the page came
/// back full, so a scan ends on the first short page.
#[derive(Debug, Clone, Default)]
pub struct ScanPage {
    pub leads: Vec<Lead>,
    pub last_evaluated: Option<LeadId>,
}

pub struct LeadsRepo<'a> {
    conn: &'a Connection,
}

impl<'a> LeadsRepo<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Inserts the lead or replaces the raw fields of an existing one.
    /// Normalization state is left untouched.
    pub fn upsert(&self, now_utc: i64, input: LeadNew) -> Result<Lead> {
        let id = input.id.unwrap_or_else(LeadId::generate);
        let fields = encode_fields(&input.fields)?;
        self.conn.execute(
            "INSERT INTO leads (lead_id, fields, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?3)
             ON CONFLICT(lead_id) DO UPDATE SET
                fields = excluded.fields,
                updated_at = excluded.updated_at;",
            params![id.as_str(), fields, now_utc],
        )?;
        self.get(&id)?
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    pub fn get(&self, id: &LeadId) -> Result<Option<Lead>> {
        let sql = format!("SELECT {LEAD_COLUMNS} FROM leads WHERE lead_id = ?1;");
        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query([id.as_str()])?;
        if let Some(row) = rows.next()? {
            Ok(Some(lead_from_row(row, None)?))
        } else {
            Ok(None)
        }
    }

    pub fn count(&self) -> Result<i64> {
        let count = self
            .conn
            .query_row("SELECT COUNT(*) FROM leads;", [], |row| row.get(0))?;
        Ok(count)
    }

    /// Reads up to `limit` leads ordered by id, starting after `after`.
    /// With a projection only the named fields are kept on each lead.
    pub fn scan_page(
        &self,
        after: Option<&LeadId>,
        limit: usize,
        projection: Option<&[String]>,
    ) -> Result<ScanPage> {
        if limit == 0 {
            return Ok(ScanPage::default());
        }
        let limit_param = i64::try_from(limit).unwrap_or(i64::MAX);
        let mut leads = Vec::new();
        match after {
            Some(after) => {
                let sql = format!(
                    "SELECT {LEAD_COLUMNS} FROM leads WHERE lead_id > ?1
                     ORDER BY lead_id ASC LIMIT ?2;"
                );
                let mut stmt = self.conn.prepare(&sql)?;
                let mut rows = stmt.query(params![after.as_str(), limit_param])?;
                while let Some(row) = rows.next()? {
                    leads.push(lead_from_row(row, projection)?);
                }
            }
            None => {
                let sql = format!("SELECT {LEAD_COLUMNS} FROM leads ORDER BY lead_id ASC LIMIT ?1;");
                let mut stmt = self.conn.prepare(&sql)?;
                let mut rows = stmt.query([limit_param])?;
                while let Some(row) = rows.next()? {
                    leads.push(lead_from_row(row, projection)?);
                }
            }
        }

        let last_evaluated = if leads.len() == limit {
            leads.last().map(|lead| lead.id.clone())
        } else {
            None
        };
        Ok(ScanPage {
            leads,
            last_evaluated,
        })
    }

    /// Records a normalization result on one lead in a single statement.
    pub fn apply_normalization(
        &self,
        now_utc: i64,
        id: &LeadId,
        normalized: &FieldMap,
    ) -> Result<Lead> {
        let data = encode_fields(normalized)?;
        let tx = self.conn.unchecked_transaction()?;
        let updated = tx.execute(
            "UPDATE leads
             SET normalized_at = ?1, normalized_data = ?2, updated_at = ?1
             WHERE lead_id = ?3;",
            params![now_utc, data, id.as_str()],
        )?;
        if updated == 0 {
            return Err(StoreError::NotFound(id.to_string()));
        }
        tx.commit()?;
        self.get(id)?
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }
}

fn encode_fields(fields: &FieldMap) -> Result<String> {
    serde_json::to_string(fields).map_err(|err| StoreError::InvalidData {
        key: "fields".to_string(),
        message: err.to_string(),
    })
}

fn decode_fields(lead_id: &str, raw: &str) -> Result<FieldMap> {
    let value: serde_json::Value =
        serde_json::from_str(raw).map_err(|err| StoreError::InvalidData {
            key: lead_id.to_string(),
            message: err.to_string(),
        })?;
    let serde_json::Value::Object(object) = value else {
        return Err(StoreError::InvalidData {
            key: lead_id.to_string(),
            message: "expected a JSON object".to_string(),
        });
    };

    // Non-string attributes are not form fields; keep strings only.
    Ok(object
        .into_iter()
        .filter_map(|(key, value)| match value {
            serde_json::Value::String(text) => Some((key, text)),
            _ => None,
        })
        .collect())
}

fn lead_from_row(row: &rusqlite::Row<'_>, projection: Option<&[String]>) -> Result<Lead> {
    let id_str: String = row.get(0)?;
    let id = LeadId::from_str(&id_str).map_err(|_| StoreError::InvalidId(id_str.clone()))?;
    let fields_raw: String = row.get(1)?;
    let mut fields = decode_fields(&id_str, &fields_raw)?;
    if let Some(projection) = projection {
        fields.retain(|name, _| projection.contains(name));
    }
    let normalized_raw: Option<String> = row.get(3)?;
    let normalized_data = normalized_raw
        .map(|raw| decode_fields(&id_str, &raw))
        .transpose()?;
    Ok(Lead {
        id,
        fields,
        normalized_at: row.get(2)?,
        normalized_data,
        created_at: row.get(4)?,
        updated_at: row.get(5)?,
    })
}
