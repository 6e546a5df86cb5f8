use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, VetError};

pub const DEFAULT_CONFIG_FILE: &str = ".srcvetrc";

/// Tunable analysis thresholds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleConfig {
    /// Cyclomatic complexity above which a synthetic issue is emitted.
    pub complexity_threshold: i64,
}

impl Default for RuleConfig {
    fn default() -> Self {
        Self {
            complexity_threshold: 10,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub rules: RuleConfig,
    /// Paths containing any of these substrings are skipped by the engine.
    pub ignore_patterns: Vec<String>,
}

impl Config {
    /// Loads configuration from `path`, or from `.srcvetrc` in the current
    /// directory when no path is given.
    ///
    /// # Errors
    ///
    /// A missing file yields defaults; an unreadable or malformed one is
    /// an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = path.map_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE), Path::to_path_buf);
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(&path).map_err(|source| VetError::Io {
            source,
            path: path.clone(),
        })?;
        Ok(serde_yaml::from_str(&text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.rules.complexity_threshold, 10);
        assert!(config.ignore_patterns.is_empty());
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let config = Config::load(Some(Path::new("/nonexistent/.srcvetrc"))).unwrap();
        assert_eq!(config.rules.complexity_threshold, 10);
    }

    #[test]
    fn test_partial_yaml_fills_defaults() {
        let config: Config = serde_yaml::from_str("rules:\n  complexity_threshold: 15\n").unwrap();
        assert_eq!(config.rules.complexity_threshold, 15);
        assert!(config.ignore_patterns.is_empty());
    }
}
