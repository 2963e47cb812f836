use log::warn;
use serde::{Deserialize, Serialize};

use std::path::Path;
use std::time::Duration;

use crate::error::ConfigError;
use crate::evaluator::Evaluator;
use crate::policy::{Difficulty, DifficultyPolicy};
use crate::search::SearchLimits;
use crate::transposition_table::DEFAULT_CAPACITY;
use crate::{HEIGHT, WIDTH};

/// Top-level engine configuration, loadable from TOML.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// The tier the computer starts at
    pub difficulty: Difficulty,
    pub search: SearchConfig,
    pub evaluator: Evaluator,
    /// Seed for the random tiers, for reproducible games
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub hard_depth: usize,
    pub very_hard_depth: usize,
    pub max_nodes: Option<u64>,
    pub time_limit_ms: Option<u64>,
    pub table_capacity: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            difficulty: Difficulty::default(),
            search: SearchConfig::default(),
            evaluator: Evaluator::default(),
            seed: None,
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            hard_depth: DifficultyPolicy::DEFAULT_HARD_DEPTH,
            very_hard_depth: DifficultyPolicy::DEFAULT_VERY_HARD_DEPTH,
            max_nodes: None,
            time_limit_ms: Some(5000),
            table_capacity: DEFAULT_CAPACITY,
        }
    }
}

impl SearchConfig {
    pub fn limits(&self) -> SearchLimits {
        SearchLimits {
            max_nodes: self.max_nodes,
            time_limit: self.time_limit_ms.map(Duration::from_millis),
        }
    }
}

impl EngineConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_toml(&content)
    }

    /// Load configuration from a TOML file, falling back to defaults if the file
    /// does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            warn!("config file '{}' not found, using defaults", path.display());
            Ok(Self::default())
        }
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let max_depth = WIDTH * HEIGHT;
        for (name, depth) in [
            ("search.hard_depth", self.search.hard_depth),
            ("search.very_hard_depth", self.search.very_hard_depth),
        ]
        .iter()
        {
            if *depth == 0 || *depth > max_depth {
                return Err(ConfigError::Validation(format!(
                    "{} must be between 1 and {}",
                    name, max_depth
                )));
            }
        }
        if self.search.table_capacity == 0 {
            return Err(ConfigError::Validation(
                "search.table_capacity must be > 0".into(),
            ));
        }
        if self.search.max_nodes == Some(0) {
            return Err(ConfigError::Validation(
                "search.max_nodes must be > 0".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = EngineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.difficulty, Difficulty::Medium);
        assert_eq!(config.search.hard_depth, 6);
        assert_eq!(config.search.very_hard_depth, 9);
        assert!(config.evaluator.gravity_aware);
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config = EngineConfig::from_toml(
            r#"
            difficulty = "very-hard"
            seed = 42

            [search]
            very_hard_depth = 7
            max_nodes = 100000

            [evaluator.weights]
            opponent_three = -60
            "#,
        )
        .unwrap();

        assert_eq!(config.difficulty, Difficulty::VeryHard);
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.search.very_hard_depth, 7);
        assert_eq!(config.search.hard_depth, 6);
        assert_eq!(config.search.limits().max_nodes, Some(100000));
        assert_eq!(config.evaluator.weights.opponent_three, -60);
        assert_eq!(config.evaluator.weights.center, 3);
    }

    #[test]
    fn rejects_unknown_tier_and_bad_depth() {
        assert!(matches!(
            EngineConfig::from_toml("difficulty = \"impossible\""),
            Err(ConfigError::TomlParse(_))
        ));
        assert!(matches!(
            EngineConfig::from_toml("[search]\nhard_depth = 0"),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let config = EngineConfig::load_or_default(Path::new("does/not/exist.toml")).unwrap();
        assert_eq!(config, EngineConfig::default());
    }
}
