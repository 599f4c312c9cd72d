//! Zoo configuration, loadable from YAML. Every field has a default so a
//! partial file (or no file at all) yields a runnable zoo.

use crate::types::{Species, Thresholds};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Errors from loading or validating a [`ZooConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("zoo name must not be empty")]
    EmptyName,
    #[error("species label at position {0} is empty")]
    EmptySpecies(usize),
    #[error("tick interval must be at least 1 ms")]
    ZeroInterval,
    #[error("dead threshold ({dead}) must be above dying threshold ({dying})")]
    ThresholdOrder { dying: u32, dead: u32 },
}

/// Construction input for a zoo.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZooConfig {
    pub name: String,
    pub size: u32,
    pub slogan: String,
    /// Ordered list of species to stock; order is preserved in the population.
    pub species: Vec<Species>,
    pub simulation: SimulationConfig,
    pub roster: RosterConfig,
}

/// Timer and threshold settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Milliseconds between ticks.
    pub interval_ms: u64,
    /// Seed for population stocking. `None` picks one from the clock.
    pub seed: Option<u64>,
    pub thresholds: Thresholds,
}

/// Where to fetch the staff roster from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RosterConfig {
    pub enabled: bool,
    pub url: String,
    pub timeout_secs: u64,
}

impl Default for ZooConfig {
    fn default() -> Self {
        Self {
            name: "Zootopia".into(),
            size: 500,
            slogan: "Like a beast!".into(),
            species: ["monkey", "elephant", "giraffe", "otter"]
                .into_iter()
                .map(String::from)
                .collect(),
            simulation: SimulationConfig::default(),
            roster: RosterConfig::default(),
        }
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            interval_ms: 1000,
            seed: None,
            thresholds: Thresholds::default(),
        }
    }
}

impl Default for RosterConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            url: "https://reqres.in/api/users?delay=2".into(),
            timeout_secs: 5,
        }
    }
}

impl ZooConfig {
    /// Parse and validate a config from YAML text.
    pub fn from_yaml(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a YAML config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_yaml(&text)
    }

    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.name.trim().is_empty() {
            return Err(ConfigError::EmptyName);
        }
        if let Some(pos) = self.species.iter().position(|s| s.trim().is_empty()) {
            return Err(ConfigError::EmptySpecies(pos));
        }
        if self.simulation.interval_ms == 0 {
            return Err(ConfigError::ZeroInterval);
        }
        let Thresholds { dying, dead } = self.simulation.thresholds;
        if dead <= dying {
            return Err(ConfigError::ThresholdOrder { dying, dead });
        }
        Ok(())
    }
}
