//! Configuration model.
//!
//! Everything the engine treats as a table rather than logic lives here:
//! which strategy to run, how many workers to spawn, the recommendation
//! rules, and language-table overrides.

use crate::error::{Result, RevuError};
use crate::language::LanguageMap;
use crate::rules::RecommendationRules;
use serde::{Deserialize, Serialize};
use std::path::Path;

fn default_strategy() -> String {
    "heuristic".to_string()
}

fn default_workers() -> usize {
    4
}

/// Top-level configuration for a revu deployment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevuConfig {
    /// Name of the analysis strategy to run (see `revu-analysis`).
    #[serde(default = "default_strategy")]
    pub strategy: String,
    /// Number of worker tasks pulling from the dispatch queue.
    #[serde(default = "default_workers")]
    pub workers: usize,
    #[serde(default)]
    pub rules: RecommendationRules,
    #[serde(default)]
    pub languages: LanguageMap,
}

impl Default for RevuConfig {
    fn default() -> Self {
        Self {
            strategy: default_strategy(),
            workers: default_workers(),
            rules: RecommendationRules::default(),
            languages: LanguageMap::default(),
        }
    }
}

impl RevuConfig {
    /// Parses a configuration from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| RevuError::config(format!("invalid config: {}", e)))
    }

    /// Loads a configuration file, or the defaults when the path does
    /// not exist.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)
            .map_err(|e| RevuError::config(format!("failed to read {}: {}", path.display(), e)))?;
        Self::from_toml_str(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RevuConfig::default();
        assert_eq!(config.strategy, "heuristic");
        assert_eq!(config.workers, 4);
        assert!(!config.rules.severity_rules.is_empty());
    }

    #[test]
    fn test_partial_toml_fills_in_defaults() {
        let config = RevuConfig::from_toml_str("workers = 2\n").unwrap();
        assert_eq!(config.workers, 2);
        assert_eq!(config.strategy, "heuristic");
    }

    #[test]
    fn test_rule_table_is_overridable() {
        let text = r#"
strategy = "heuristic"

[[rules.severity_rules]]
severity = "critical"
message = "Stop the line: {count} critical finding(s)"
"#;
        let config = RevuConfig::from_toml_str(text).unwrap();
        assert_eq!(config.rules.severity_rules.len(), 1);
        assert!(config.rules.severity_rules[0].message.starts_with("Stop"));
    }

    #[test]
    fn test_invalid_toml_is_a_config_error() {
        let err = RevuConfig::from_toml_str("workers = \"many\"").unwrap_err();
        assert!(matches!(err, RevuError::Config(_)));
    }
}
