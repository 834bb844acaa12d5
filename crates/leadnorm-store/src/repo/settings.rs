use crate::error::Result;
use rusqlite::{params, Connection, OptionalExtension};

/// Raw settings documents keyed by config id. Decoding is left to the
/// caller so an unreadable document can fall back to defaults.
pub struct SettingsRepo<'a> {
    conn: &'a Connection,
}

impl<'a> SettingsRepo<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    pub fn get(&self, config_id: &str) -> Result<Option<String>> {
        let settings = self
            .conn
            .query_row(
                "SELECT settings FROM normalization_config WHERE config_id = ?1;",
                [config_id],
                |row| row.get(0),
            )
            .optional()?;
        Ok(settings)
    }

    pub fn put(&self, now_utc: i64, config_id: &str, settings: &str) -> Result<()> {
        self.conn.execute(
            "INSERT INTO normalization_config (config_id, settings, updated_at)
             VALUES (?1, ?2, ?3)
             ON CONFLICT(config_id) DO UPDATE SET
                settings = excluded.settings,
                updated_at = excluded.updated_at;",
            params![config_id, settings, now_utc],
        )?;
        Ok(())
    }

    pub fn delete(&self, config_id: &str) -> Result<bool> {
        let removed = self.conn.execute(
            "DELETE FROM normalization_config WHERE config_id = ?1;",
            [config_id],
        )?;
        Ok(removed > 0)
    }
}
