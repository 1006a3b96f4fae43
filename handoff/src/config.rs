///
/// # Run Configuration
///
/// Settings for one handoff run, loaded from a TOML file and/or overridden
/// from the command line. Every field has a default, so an empty file is a
/// valid configuration.
///
/// ## Example handoff.toml
///
/// ```toml
/// iterations = 10
/// discipline = "lock-held"
/// seed = 42
/// unit_ms = 1000
/// min_delay = 1
/// max_delay = 5
/// ```
///

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::slot::Discipline;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Iterations performed by each role
    pub iterations: usize,
    pub discipline: Discipline,
    /// Random seed; seeded from the clock when absent
    pub seed: Option<u64>,
    /// Length of one simulated time unit in milliseconds
    pub unit_ms: u64,
    pub min_delay: u32,
    pub max_delay: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            iterations: 10,
            discipline: Discipline::Signaling,
            seed: None,
            unit_ms: 1000,
            min_delay: 1,
            max_delay: 5,
        }
    }
}

impl Config {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str::<Config>(&content)
            .map_err(|e| ConfigError::Parse {
                path: path.to_path_buf(),
                reason: e.message().to_string(),
            })?
            .validate()
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        toml::from_str::<Config>(content)
            .map_err(|e| ConfigError::Invalid(e.message().to_string()))?
            .validate()
    }

    pub fn validate(self) -> Result<Self, ConfigError> {
        if self.unit_ms == 0 {
            return Err(ConfigError::Invalid("unit_ms must be at least 1".to_string()));
        }
        if self.max_delay == 0 {
            return Err(ConfigError::Invalid("max_delay must be at least 1".to_string()));
        }
        if self.min_delay > self.max_delay {
            return Err(ConfigError::Invalid(format!(
                "min_delay ({}) is greater than max_delay ({})",
                self.min_delay, self.max_delay
            )));
        }
        Ok(self)
    }

    pub fn unit(&self) -> Duration {
        Duration::from_millis(self.unit_ms)
    }
}
