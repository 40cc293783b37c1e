//! Typed, serde-deserializable configuration for the engine (SPEC_FULL §10).

mod error;

pub use error::ConfigError;

use std::thread::available_parallelism;

use pex_types::U256;
use serde::{Deserialize, Serialize};

fn default_round_count() -> u32 {
    8
}

fn default_runner_cap() -> usize {
    4096
}

fn default_parallelism() -> usize {
    available_parallelism().map(|n| n.get()).unwrap_or(1)
}

fn default_min_gas_price() -> U256 {
    U256::ZERO
}

fn default_reorder_seed() -> u64 {
    0
}

/// Runtime configuration for an `Engine`. Deserializable from YAML (the
/// teacher's node-config format) with every field defaulted so a bare `{}`
/// produces a usable, single-threaded-capable configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub round_count: u32,
    pub runner_cap: usize,
    pub parallelism: usize,
    pub min_gas_price: U256,
    /// Only used by tests/tools that call `prepare()` without being handed a
    /// seed by an upstream caller; production callers always pass their own.
    pub default_reorder_seed: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            round_count: default_round_count(),
            runner_cap: default_runner_cap(),
            parallelism: default_parallelism(),
            min_gas_price: default_min_gas_price(),
            default_reorder_seed: default_reorder_seed(),
        }
    }
}

impl EngineConfig {
    /// Parse from YAML, then validate.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(yaml).map_err(ConfigError::Deserialize)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.round_count == 0 {
            return Err(ConfigError::ZeroField { field: "round_count" });
        }
        if self.runner_cap == 0 {
            return Err(ConfigError::ZeroField { field: "runner_cap" });
        }
        if self.parallelism == 0 {
            return Err(ConfigError::ZeroField { field: "parallelism" });
        }
        Ok(())
    }
}
