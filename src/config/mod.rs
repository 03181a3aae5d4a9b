//! Configuration management for esq
//!
//! Settings are layered: built-in defaults, then the TOML config file, then
//! `ESQ_*` environment variables, then command-line flags.

use crate::error::{EsqError, Result};
use crate::options::{AuthOptions, ElasticOptions, OutputOptions, QueryArgs};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

mod validator;

pub use validator::ConfigValidator;

/// Prefix for environment overrides
pub const ENV_PREFIX: &str = "ESQ_";

/// Fully merged settings for one invocation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub elastic: ElasticOptions,
    pub auth: AuthOptions,
    pub query: QueryArgs,
    pub output: OutputOptions,
}

impl Settings {
    /// Load settings from a file
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(EsqError::ConfigNotFound {
                path: path.to_path_buf(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| EsqError::Io {
            source: e,
            context: format!("Failed to read config file: {:?}", path),
        })?;
        let settings: Settings = toml::from_str(&content)?;
        tracing::debug!("Using config file: {}", path.display());

        Ok(settings)
    }

    /// Load from `path`, or from the default location when `None`.
    ///
    /// A missing default file is not an error; an explicit path must exist.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => {
                let path = Self::default_path()?;
                if path.exists() {
                    Self::load(&path)
                } else {
                    tracing::debug!("No config file at {}, using defaults", path.display());
                    Ok(Self::default())
                }
            }
        }
    }

    /// Save settings to a file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(|e| EsqError::Io {
            source: e,
            context: format!("Failed to write config file: {:?}", path),
        })?;
        Ok(())
    }

    /// Apply environment variable overrides from the process environment
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        self.apply_overrides(std::env::vars())
    }

    /// Apply `ESQ_*` overrides from an arbitrary key/value source
    pub fn apply_overrides<I>(&mut self, vars: I) -> Result<()>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        for (key, value) in vars {
            if let Some(config_key) = key.strip_prefix(ENV_PREFIX) {
                self.set_value_from_env(config_key, &value)?;
            }
        }
        Ok(())
    }

    fn set_value_from_env(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "NODE" => self.elastic.node = Some(value.to_string()),
            "INDEX" => self.elastic.index = Some(value.to_string()),
            "API_KEY" => self.auth.api_key = Some(value.to_string()),
            "USERNAME" => self.auth.username = Some(value.to_string()),
            "PASSWORD" => self.auth.password = Some(value.to_string()),
            "SIZE" => {
                self.query.size = value.parse().map_err(|_| EsqError::InvalidConfigValue {
                    path: format!("{ENV_PREFIX}{key}"),
                    message: format!("Cannot parse '{}' as a non-negative integer", value),
                })?;
            }
            "TIMESTAMP_FIELD" => self.query.timestamp_field = value.to_string(),
            "OUTPUT" => self.output.format = value.to_string(),
            _ => {
                tracing::debug!("Unknown env config key: {}", key);
            }
        }
        Ok(())
    }

    /// Copy safe to print
    pub fn redacted(&self) -> Self {
        Self {
            auth: self.auth.redacted(),
            ..self.clone()
        }
    }

    /// Get the default configuration file path
    pub fn default_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| EsqError::Config("Cannot determine config directory".to_string()))?;

        Ok(config_dir.join("esq").join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.query.size, 100);
        assert_eq!(settings.query.timestamp_field, "@timestamp");
        assert_eq!(settings.output.format, "text");
    }

    #[test]
    fn test_load_partial_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
[elastic]
node = "http://localhost:9200"
index = "my-logs-*"

[query]
size = 10
timestamp_field = "timestamp"
"#,
        )
        .unwrap();

        let settings = Settings::load(&path).unwrap();
        assert_eq!(settings.elastic.node(), Some("http://localhost:9200"));
        assert_eq!(settings.elastic.index(), Some("my-logs-*"));
        assert_eq!(settings.query.size, 10);
        assert_eq!(settings.query.timestamp_field, "timestamp");
        assert_eq!(settings.output.format, "text");
    }

    #[test]
    fn test_explicit_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nope.toml");
        assert!(matches!(
            Settings::load_or_default(Some(&path)).unwrap_err(),
            EsqError::ConfigNotFound { .. }
        ));
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");

        let mut settings = Settings::default();
        settings.elastic.node = Some("https://es.example.com".to_string());
        settings.output.format = "json".to_string();
        settings.save(&path).unwrap();

        assert_eq!(Settings::load(&path).unwrap(), settings);
    }

    #[test]
    fn test_env_overrides() {
        let mut settings = Settings::default();
        settings
            .apply_overrides(vars(&[
                ("ESQ_NODE", "http://es:9200"),
                ("ESQ_USERNAME", "elastic"),
                ("ESQ_SIZE", "25"),
                ("ESQ_OUTPUT", "json"),
                ("ESQ_SOMETHING_ELSE", "ignored"),
                ("HOME", "/root"),
            ]))
            .unwrap();

        assert_eq!(settings.elastic.node(), Some("http://es:9200"));
        assert_eq!(settings.auth.username(), Some("elastic"));
        assert_eq!(settings.query.size, 25);
        assert_eq!(settings.output.format, "json");
    }

    #[test]
    fn test_bad_env_size() {
        let mut settings = Settings::default();
        let err = settings
            .apply_overrides(vars(&[("ESQ_SIZE", "-3")]))
            .unwrap_err();
        assert!(matches!(err, EsqError::InvalidConfigValue { path, .. } if path == "ESQ_SIZE"));
    }
}
