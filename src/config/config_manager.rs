// ==========================================
// Tupacery Reports - Config Manager
// ==========================================
// Resolution order:
// 1. $MINING_REPORTS_CONFIG
// 2. <config_dir>/mining-reports/config.json
// 3. built-in defaults
// ==========================================

use crate::config::report_config::ReportConfig;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

pub const CONFIG_ENV_VAR: &str = "MINING_REPORTS_CONFIG";
const CONFIG_DIR_NAME: &str = "mining-reports";
const CONFIG_FILE_NAME: &str = "config.json";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    NotFound(String),

    #[error("config file read failed ({path}): {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("config file invalid ({path}): {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("config value invalid: {0}")]
    Invalid(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

// ==========================================
// ConfigManager
// ==========================================
pub struct ConfigManager;

impl ConfigManager {
    /// Loads a JSON override file on top of the defaults
    ///
    /// # Errors
    /// - NotFound / Read when the file cannot be read
    /// - Parse when the JSON does not match `ReportConfig`
    /// - Invalid when a constant is out of range
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<ReportConfig> {
        let path = path.as_ref();
        let shown = path.display().to_string();
        if !path.exists() {
            return Err(ConfigError::NotFound(shown));
        }

        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: shown.clone(),
            source,
        })?;
        let config: ReportConfig =
            serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
                path: shown.clone(),
                source,
            })?;

        Self::validate(&config)?;
        info!(path = %shown, "report config loaded");
        Ok(config)
    }

    /// Environment variable, then user config dir, then defaults
    pub fn resolve() -> ConfigResult<ReportConfig> {
        if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
            if !path.trim().is_empty() {
                return Self::load(path.trim());
            }
        }

        if let Some(path) = Self::default_path() {
            if path.exists() {
                return Self::load(path);
            }
        }

        debug!("no config file, using built-in defaults");
        Ok(ReportConfig::default())
    }

    /// `<config_dir>/mining-reports/config.json`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    pub fn validate(config: &ReportConfig) -> ConfigResult<()> {
        let production = &config.production;
        if production.line_daily_target <= 0.0 {
            return Err(ConfigError::Invalid(
                "production.line_daily_target must be positive".to_string(),
            ));
        }
        if production.lump_daily_target < 0.0
            || production.lump_daily_target > production.line_daily_target
        {
            return Err(ConfigError::Invalid(
                "production.lump_daily_target must lie within the line target".to_string(),
            ));
        }
        if production.header_depth == 0 || config.quality.header_depth == 0 {
            return Err(ConfigError::Invalid("header_depth must be at least 1".to_string()));
        }
        if production.moving_average_window == 0
            || production.trend_window == 0
            || config.quality.trend_window == 0
        {
            return Err(ConfigError::Invalid("windows must be at least 1".to_string()));
        }
        if config.quality.fallback_blocks.iter().any(|b| b.start > b.end) {
            return Err(ConfigError::Invalid(
                "quality.fallback_blocks start must not exceed end".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(json: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_overrides_selected_fields() {
        let file = write_config(r#"{ "production": { "initial_stock": 150000.0 } }"#);
        let config = ConfigManager::load(file.path()).unwrap();
        assert_eq!(config.production.initial_stock, 150000.0);
        assert_eq!(config.production.sheet_name, "BD_Real");
    }

    #[test]
    fn test_load_missing_file() {
        let result = ConfigManager::load("/nonexistent/mining-reports.json");
        assert!(matches!(result, Err(ConfigError::NotFound(_))));
    }

    #[test]
    fn test_load_rejects_bad_json() {
        let file = write_config("{ not json");
        assert!(matches!(
            ConfigManager::load(file.path()),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_lump_above_target() {
        let file = write_config(r#"{ "production": { "lump_daily_target": 6000.0 } }"#);
        assert!(matches!(
            ConfigManager::load(file.path()),
            Err(ConfigError::Invalid(_))
        ));
    }
}
