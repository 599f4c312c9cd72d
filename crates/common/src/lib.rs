//! Shared types for the zoo simulator: configuration and hunger thresholds.

pub mod config;
pub mod types;

pub use config::{ConfigError, RosterConfig, SimulationConfig, ZooConfig};
pub use types::{Species, Thresholds};
