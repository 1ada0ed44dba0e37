//! Runtime configuration for hosts embedding the candidate repository.
//!
//! # Responsibility
//! - Describe where the document database lives and how logging is set up.
//! - Load settings from a JSON file with environment overrides.
//!
//! # Invariants
//! - `log_level` is one of `trace|debug|info|warn|error` after validation.
//! - `log_dir`, when set, is absolute.
//! - No `db_path` means an in-memory database.

use crate::logging::{default_log_level, normalize_level};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

pub const ENV_DB_PATH: &str = "TALENT_DB_PATH";
pub const ENV_LOG_LEVEL: &str = "TALENT_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "TALENT_LOG_DIR";

pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug)]
pub enum ConfigError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    Invalid(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to read config `{}`: {source}", path.display())
            }
            Self::Parse { path, source } => {
                write!(f, "failed to parse config `{}`: {source}", path.display())
            }
            Self::Invalid(message) => write!(f, "invalid config: {message}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse { source, .. } => Some(source),
            Self::Invalid(_) => None,
        }
    }
}

/// Settings for opening the store and starting logging.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TalentConfig {
    /// SQLite file holding candidate documents; in-memory when `None`.
    pub db_path: Option<PathBuf>,
    pub log_level: String,
    /// Directory for rolling log files; logging stays off when `None`.
    pub log_dir: Option<PathBuf>,
}

impl Default for TalentConfig {
    fn default() -> Self {
        Self {
            db_path: None,
            log_level: default_log_level().to_string(),
            log_dir: None,
        }
    }
}

impl TalentConfig {
    /// Reads a JSON config file. Missing keys keep their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Settings from an optional JSON file, then `lookup` overrides on top.
    pub fn resolve(
        path: Option<&Path>,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> ConfigResult<Self> {
        let base = match path {
            Some(path) => Self::from_json_file(path)?,
            None => Self::default(),
        };
        Ok(base.with_overrides(lookup))
    }

    /// Overlays non-blank values returned by `lookup` for the `TALENT_*` keys.
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let lookup = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(path) = lookup(ENV_DB_PATH) {
            self.db_path = Some(PathBuf::from(path));
        }
        if let Some(level) = lookup(ENV_LOG_LEVEL) {
            self.log_level = level;
        }
        if let Some(dir) = lookup(ENV_LOG_DIR) {
            self.log_dir = Some(PathBuf::from(dir));
        }
        self
    }

    /// Checks and normalizes the settings in place.
    pub fn validate(&mut self) -> ConfigResult<()> {
        self.log_level = normalize_level(&self.log_level)
            .map_err(ConfigError::Invalid)?
            .to_string();

        if let Some(dir) = &self.log_dir {
            if !dir.is_absolute() {
                return Err(ConfigError::Invalid(format!(
                    "log_dir must be an absolute path, got `{}`",
                    dir.display()
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn overrides_ignore_blank_values() {
        let env: HashMap<&str, &str> = HashMap::from([
            (ENV_DB_PATH, "/tmp/talent.sqlite3"),
            (ENV_LOG_LEVEL, "  "),
        ]);
        let config = TalentConfig::default()
            .with_overrides(|key| env.get(key).map(|value| value.to_string()));

        assert_eq!(
            config.db_path.as_deref(),
            Some(Path::new("/tmp/talent.sqlite3"))
        );
        assert_eq!(config.log_level, default_log_level());
        assert_eq!(config.log_dir, None);
    }

    #[test]
    fn validate_normalizes_level_and_rejects_relative_dir() {
        let mut config = TalentConfig {
            log_level: " WARNING ".to_string(),
            ..TalentConfig::default()
        };
        config.validate().unwrap();
        assert_eq!(config.log_level, "warn");

        config.log_dir = Some(PathBuf::from("logs"));
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("absolute"));

        config.log_dir = None;
        config.log_level = "loud".to_string();
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn json_file_fills_missing_keys_with_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("talent.json");
        std::fs::write(&path, r#"{ "log_level": "error" }"#).unwrap();

        let config = TalentConfig::from_json_file(&path).unwrap();
        assert_eq!(config.log_level, "error");
        assert_eq!(config.db_path, None);

        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(
            TalentConfig::from_json_file(&path),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn environment_overrides_file_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("talent.json");
        std::fs::write(
            &path,
            r#"{ "db_path": "/srv/file.sqlite3", "log_level": "error" }"#,
        )
        .unwrap();
        let env: HashMap<&str, &str> = HashMap::from([(ENV_LOG_LEVEL, "debug")]);

        let config = TalentConfig::resolve(Some(path.as_path()), |key| {
            env.get(key).map(|value| value.to_string())
        })
        .unwrap();
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.db_path.as_deref(), Some(Path::new("/srv/file.sqlite3")));

        let defaults = TalentConfig::resolve(None, |_| None).unwrap();
        assert_eq!(defaults, TalentConfig::default());
    }
}
