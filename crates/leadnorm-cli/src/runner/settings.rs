use leadnorm_core::{CoreError, NormalizationConfig, SettingsDocument, SETTINGS_KEY};
use leadnorm_store::Store;
use tracing::{debug, warn};

/// Stored settings layered over `defaults`.
///
/// A missing, unreadable or undecodable document falls back to the defaults
/// with a warning. A document that decodes but carries invalid values is an
/// error.
pub fn load_settings(
    store: &Store,
    defaults: &NormalizationConfig,
) -> Result<NormalizationConfig, CoreError> {
    let raw = match store.settings().get(SETTINGS_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => {
            debug!("no stored settings, using defaults");
            return Ok(defaults.clone());
        }
        Err(err) => {
            warn!(error = %err, "settings lookup failed, using defaults");
            return Ok(defaults.clone());
        }
    };

    let document: SettingsDocument = match serde_json::from_str(&raw) {
        Ok(document) => document,
        Err(err) => {
            warn!(error = %err, "stored settings unreadable, using defaults");
            return Ok(defaults.clone());
        }
    };
    defaults.with_document(&document)
}

#[cfg(test)]
mod tests {
    use super::load_settings;
    use leadnorm_core::{CoreError, NormalizationConfig, SETTINGS_KEY};
    use leadnorm_store::Store;

    fn store() -> Store {
        let store = Store::open_in_memory().expect("open in memory");
        store.migrate().expect("migrate");
        store
    }

    #[test]
    fn missing_document_yields_defaults() {
        let store = store();
        let defaults = NormalizationConfig::default();
        assert_eq!(load_settings(&store, &defaults).unwrap(), defaults);
    }

    #[test]
    fn undecodable_document_yields_defaults() {
        let store = store();
        store
            .settings()
            .put(1, SETTINGS_KEY, "{\"batchSize\": \"ten\"}")
            .expect("put");
        let defaults = NormalizationConfig::default();
        assert_eq!(load_settings(&store, &defaults).unwrap(), defaults);
    }

    #[test]
    fn stored_values_override_defaults() {
        let store = store();
        store
            .settings()
            .put(1, SETTINGS_KEY, "{\"enabled\": false, \"maxLeadsPerRun\": 5}")
            .expect("put");
        let loaded = load_settings(&store, &NormalizationConfig::default()).unwrap();
        assert!(!loaded.enabled);
        assert_eq!(loaded.max_records_per_run, 5);
        assert_eq!(loaded.batch_size, 10);
    }

    #[test]
    fn invalid_values_are_corruption() {
        let store = store();
        store
            .settings()
            .put(1, SETTINGS_KEY, "{\"batchSize\": 0}")
            .expect("put");
        let err = load_settings(&store, &NormalizationConfig::default()).unwrap_err();
        assert_eq!(err, CoreError::InvalidBatchSize(0));
    }
}
