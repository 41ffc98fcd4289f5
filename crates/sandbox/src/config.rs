//! TOML configuration for the sandbox binary.
//!
//! Every section and field is optional; missing values fall back to the
//! defaults below.

use crate::generation::FloorConfig;
use anyhow::{Context, Result};
use sandtick_engine::EngineConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SandboxConfig {
    pub engine: EngineConfig,
    pub floor: FloorConfig,
    pub demo: DemoConfig,
}

/// What the headless demo builds and how long it runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    pub ticks: u64,
    /// Log a tick report every N ticks (0 disables).
    pub report_every: u64,
    /// Side length of the sand block dropped into the scene.
    pub sand_size: i64,
    /// Width of the water pool.
    pub pool_width: i64,
    /// Height of the wooden pillar set alight.
    pub tree_height: i64,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            ticks: 200,
            report_every: 20,
            sand_size: 12,
            pool_width: 24,
            tree_height: 10,
        }
    }
}

impl SandboxConfig {
    pub fn from_toml(text: &str) -> Result<Self> {
        toml::from_str(text).context("invalid sandbox configuration")
    }

    /// Load from `path`, or the defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Self::from_toml(&text).with_context(|| format!("while loading {}", path.display()))
    }
}
