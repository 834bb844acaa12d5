use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use leadnorm_core::rules::settings::dedup_fields;
use leadnorm_core::NormalizationConfig;
use serde::Deserialize;
use thiserror::Error;

const APP_DIR: &str = "leadnorm";
const CONFIG_FILENAME: &str = "config.toml";

pub const DEFAULT_BATCH_DELAY_MS: u64 = 500;
pub const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";
pub const DEFAULT_MODEL: &str = "claude-3-haiku-20240307";
pub const DEFAULT_API_KEY_ENV: &str = "ANTHROPIC_API_KEY";
pub const DEFAULT_MAX_TOKENS: u32 = 1000;
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub normalization: NormalizationDefaults,
    pub generation: GenerationConfig,
}

#[derive(Debug, Clone)]
pub struct NormalizationDefaults {
    pub settings: NormalizationConfig,
    pub batch_delay_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationConfig {
    pub base_url: String,
    pub model: String,
    pub api_key_env: String,
    pub max_tokens: u32,
    pub timeout_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            normalization: NormalizationDefaults {
                settings: NormalizationConfig::default(),
                batch_delay_ms: DEFAULT_BATCH_DELAY_MS,
            },
            generation: GenerationConfig {
                base_url: DEFAULT_BASE_URL.to_string(),
                model: DEFAULT_MODEL.to_string(),
                api_key_env: DEFAULT_API_KEY_ENV.to_string(),
                max_tokens: DEFAULT_MAX_TOKENS,
                timeout_secs: DEFAULT_TIMEOUT_SECS,
            },
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing home directory")]
    MissingHomeDir,
    #[error("invalid config path: {0}")]
    InvalidConfigPath(PathBuf),
    #[error("config file not found: {0}")]
    MissingConfigFile(PathBuf),
    #[error("config file permissions too permissive: {0}")]
    InsecurePermissions(PathBuf),
    #[error("invalid {key} value: {value}")]
    InvalidValue { key: &'static str, value: String },
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    normalization: Option<NormalizationFile>,
    generation: Option<GenerationFile>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct NormalizationFile {
    enabled: Option<bool>,
    fields: Option<Vec<String>>,
    batch_size: Option<i64>,
    max_records_per_run: Option<i64>,
    ttl_days: Option<i64>,
    batch_delay_ms: Option<u64>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct GenerationFile {
    base_url: Option<String>,
    model: Option<String>,
    api_key_env: Option<String>,
    max_tokens: Option<u32>,
    timeout_secs: Option<u64>,
}

pub fn load(config_path: Option<PathBuf>) -> Result<AppConfig> {
    let required = config_path.is_some();
    let path = match resolve_config_path(config_path.clone()) {
        Ok(path) => path,
        Err(ConfigError::MissingHomeDir) if !required => return Ok(AppConfig::default()),
        Err(ConfigError::InvalidConfigPath(_)) if !required => return Ok(AppConfig::default()),
        Err(err) => return Err(err),
    };
    match load_at_path(&path, required)? {
        Some(config) => Ok(config),
        None => Ok(AppConfig::default()),
    }
}

pub fn resolve_config_path(custom: Option<PathBuf>) -> Result<PathBuf> {
    match custom {
        Some(path) => {
            if path.as_os_str().is_empty() {
                return Err(ConfigError::InvalidConfigPath(path));
            }
            Ok(path)
        }
        None => {
            let base = if let Some(dir) = env::var_os("XDG_CONFIG_HOME") {
                let path = PathBuf::from(dir);
                if path.as_os_str().is_empty() {
                    return Err(ConfigError::InvalidConfigPath(path));
                }
                path
            } else {
                let home = dirs::home_dir().ok_or(ConfigError::MissingHomeDir)?;
                home.join(".config")
            };
            Ok(base.join(APP_DIR).join(CONFIG_FILENAME))
        }
    }
}

fn load_at_path(path: &Path, required: bool) -> Result<Option<AppConfig>> {
    if !path.exists() {
        if required {
            return Err(ConfigError::MissingConfigFile(path.to_path_buf()));
        }
        return Ok(None);
    }

    ensure_permissions(path)?;
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let parsed: ConfigFile = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(Some(merge_config(parsed)?))
}

fn merge_config(parsed: ConfigFile) -> Result<AppConfig> {
    let mut config = AppConfig::default();

    if let Some(normalization) = parsed.normalization {
        merge_normalization(&mut config.normalization, normalization)?;
    }
    if let Some(generation) = parsed.generation {
        merge_generation(&mut config.generation, generation)?;
    }

    Ok(config)
}

fn merge_normalization(
    defaults: &mut NormalizationDefaults,
    file: NormalizationFile,
) -> Result<()> {
    let settings = &mut defaults.settings;

    if let Some(enabled) = file.enabled {
        settings.enabled = enabled;
    }
    if let Some(fields) = file.fields {
        settings.fields = dedup_fields(&fields).map_err(|err| ConfigError::InvalidValue {
            key: "normalization.fields",
            value: err.to_string(),
        })?;
        if settings.fields.is_empty() {
            return Err(invalid("normalization.fields", "[]"));
        }
    }
    if let Some(batch_size) = file.batch_size {
        settings.batch_size = positive("normalization.batch_size", batch_size)?;
    }
    if let Some(max_records) = file.max_records_per_run {
        settings.max_records_per_run =
            positive("normalization.max_records_per_run", max_records)?;
    }
    if let Some(ttl_days) = file.ttl_days {
        if ttl_days < 0 {
            return Err(invalid("normalization.ttl_days", ttl_days));
        }
        settings.ttl_days = ttl_days;
    }
    if let Some(delay) = file.batch_delay_ms {
        defaults.batch_delay_ms = delay;
    }

    Ok(())
}

fn merge_generation(config: &mut GenerationConfig, file: GenerationFile) -> Result<()> {
    if let Some(base_url) = file.base_url {
        let trimmed = base_url.trim();
        if trimmed.is_empty() {
            return Err(invalid("generation.base_url", base_url));
        }
        config.base_url = trimmed.trim_end_matches('/').to_string();
    }
    if let Some(model) = file.model {
        if model.trim().is_empty() {
            return Err(invalid("generation.model", model));
        }
        config.model = model.trim().to_string();
    }
    if let Some(api_key_env) = file.api_key_env {
        if api_key_env.trim().is_empty() {
            return Err(invalid("generation.api_key_env", api_key_env));
        }
        config.api_key_env = api_key_env.trim().to_string();
    }
    if let Some(max_tokens) = file.max_tokens {
        if max_tokens == 0 {
            return Err(invalid("generation.max_tokens", max_tokens));
        }
        config.max_tokens = max_tokens;
    }
    if let Some(timeout_secs) = file.timeout_secs {
        if timeout_secs == 0 {
            return Err(invalid("generation.timeout_secs", timeout_secs));
        }
        config.timeout_secs = timeout_secs;
    }
    Ok(())
}

fn positive(key: &'static str, value: i64) -> Result<usize> {
    if value <= 0 {
        return Err(invalid(key, value));
    }
    usize::try_from(value).map_err(|_| invalid(key, value))
}

fn invalid(key: &'static str, value: impl ToString) -> ConfigError {
    ConfigError::InvalidValue {
        key,
        value: value.to_string(),
    }
}

#[cfg(unix)]
fn ensure_permissions(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let metadata = fs::metadata(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let mode = metadata.permissions().mode();
    if mode & 0o077 != 0 {
        return Err(ConfigError::InsecurePermissions(path.to_path_buf()));
    }
    Ok(())
}

#[cfg(not(unix))]
fn ensure_permissions(_path: &Path) -> Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{load_at_path, merge_config, ConfigFile, GenerationFile, NormalizationFile};
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn restrict_permissions(path: &Path) {
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mut perms = fs::metadata(path).expect("metadata").permissions();
            perms.set_mode(0o600);
            fs::set_permissions(path, perms).expect("chmod");
        }
    }

    fn normalization_file() -> NormalizationFile {
        NormalizationFile {
            enabled: None,
            fields: None,
            batch_size: None,
            max_records_per_run: None,
            ttl_days: None,
            batch_delay_ms: None,
        }
    }

    #[test]
    fn merge_config_applies_values() {
        let parsed = ConfigFile {
            normalization: Some(NormalizationFile {
                fields: Some(vec!["nombres".to_string(), "ciudad".to_string()]),
                batch_size: Some(5),
                ttl_days: Some(14),
                batch_delay_ms: Some(0),
                ..normalization_file()
            }),
            generation: Some(GenerationFile {
                base_url: Some("http://localhost:8080/".to_string()),
                model: Some("claude-3-5-haiku-latest".to_string()),
                api_key_env: None,
                max_tokens: Some(512),
                timeout_secs: None,
            }),
        };
        let merged = merge_config(parsed).expect("merge");
        assert_eq!(merged.normalization.settings.fields, vec!["nombres", "ciudad"]);
        assert_eq!(merged.normalization.settings.batch_size, 5);
        assert_eq!(merged.normalization.settings.max_records_per_run, 50);
        assert_eq!(merged.normalization.settings.ttl_days, 14);
        assert_eq!(merged.normalization.batch_delay_ms, 0);
        assert_eq!(merged.generation.base_url, "http://localhost:8080");
        assert_eq!(merged.generation.model, "claude-3-5-haiku-latest");
        assert_eq!(merged.generation.api_key_env, "ANTHROPIC_API_KEY");
        assert_eq!(merged.generation.max_tokens, 512);
    }

    #[test]
    fn merge_config_rejects_zero_batch_size() {
        let parsed = ConfigFile {
            normalization: Some(NormalizationFile {
                batch_size: Some(0),
                ..normalization_file()
            }),
            generation: None,
        };
        let err = merge_config(parsed).unwrap_err();
        assert!(err.to_string().contains("normalization.batch_size"));
    }

    #[test]
    fn load_at_path_requires_file_when_requested() {
        let temp = TempDir::new().expect("tempdir");
        let missing = temp.path().join("config.toml");
        let err = load_at_path(&missing, true).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("config file not found"));
    }

    #[test]
    fn load_at_path_parses_toml() {
        let temp = TempDir::new().expect("tempdir");
        let path = temp.path().join("config.toml");
        fs::write(
            &path,
            "[normalization]\nmax_records_per_run = 5\n[generation]\ntimeout_secs = 10\n",
        )
        .expect("write config");
        restrict_permissions(&path);

        let config = load_at_path(&path, true).expect("load").expect("config");
        assert_eq!(config.normalization.settings.max_records_per_run, 5);
        assert_eq!(config.generation.timeout_secs, 10);
    }

    #[test]
    fn load_at_path_rejects_unknown_keys() {
        let temp = TempDir::new().expect("tempdir");
        let path = temp.path().join("config.toml");
        fs::write(&path, "[normalization]\nbatchsize = 5\n").expect("write config");
        restrict_permissions(&path);

        let err = load_at_path(&path, true).unwrap_err();
        assert!(err.to_string().contains("failed to parse config file"));
    }
}
