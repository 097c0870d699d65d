//! Database configuration

use crate::storage::dir_storage::DEFAULT_CHUNK_SIZE;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("I/O error reading config: {0}")]
    Io(#[from] std::io::Error),
    /// Config text is not valid JSON for this schema
    #[error("Parse error in config: {0}")]
    Parse(#[from] serde_json::Error),
    /// A value is out of range
    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Result type for configuration loading
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Database configuration
///
/// Every field has a default, so `{}` is a valid config.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Container directory holding one file per stream
    pub data_dir: PathBuf,
    /// Memoize resolved schemas per table name
    pub cache_schemas: bool,
    /// Positional read size used when loading a stream
    pub read_chunk_size: usize,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./data"),
            cache_schemas: true,
            read_chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

impl DatabaseConfig {
    /// Default config rooted at `data_dir`
    pub fn with_data_dir(data_dir: impl AsRef<Path>) -> Self {
        Self {
            data_dir: data_dir.as_ref().to_path_buf(),
            ..Self::default()
        }
    }

    /// Parse and validate a JSON config
    pub fn from_json_str(text: &str) -> ConfigResult<Self> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON config file
    pub fn from_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Check value ranges
    pub fn validate(&self) -> ConfigResult<()> {
        if self.read_chunk_size == 0 {
            return Err(ConfigError::Invalid(
                "read_chunk_size must be greater than zero".to_string(),
            ));
        }
        if self.data_dir.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("data_dir must not be empty".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_defaults() {
        let config = DatabaseConfig::default();
        assert_eq!(config.data_dir, PathBuf::from("./data"));
        assert!(config.cache_schemas);
        assert_eq!(config.read_chunk_size, 64 * 1024);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_empty_json_uses_defaults() {
        let config = DatabaseConfig::from_json_str("{}").unwrap();
        assert_eq!(config, DatabaseConfig::default());
    }

    #[test]
    fn test_config_partial_json() {
        let config =
            DatabaseConfig::from_json_str(r#"{"data_dir": "/srv/pkg", "cache_schemas": false}"#)
                .unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/srv/pkg"));
        assert!(!config.cache_schemas);
        assert_eq!(config.read_chunk_size, DEFAULT_CHUNK_SIZE);
    }

    #[test]
    fn test_config_rejects_zero_chunk() {
        let result = DatabaseConfig::from_json_str(r#"{"read_chunk_size": 0}"#);
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_config_rejects_bad_json() {
        let result = DatabaseConfig::from_json_str(r#"{"cache_schemas": "yes"}"#);
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_config_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("db.json");
        let config = DatabaseConfig::with_data_dir(temp_dir.path().join("streams"));
        fs::write(&path, serde_json::to_string(&config).unwrap()).unwrap();

        let loaded = DatabaseConfig::from_file(&path).unwrap();
        assert_eq!(loaded, config);

        assert!(matches!(
            DatabaseConfig::from_file(temp_dir.path().join("missing.json")),
            Err(ConfigError::Io(_))
        ));
    }
}
