//! Engine Configuration
//!
//! Knobs for the parts of the engine that live outside the graph itself: how
//! fast the driver ticks, whether it starts ticking right away, and the
//! default log filter for the replay tool.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::Result;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Milliseconds between ticks while the driver is active.
    pub tick_interval_ms: u64,

    /// Whether a new session ticks before receiving `activate`.
    pub start_active: bool,

    /// `tracing-subscriber` filter used when `RUST_LOG` is not set.
    pub log_filter: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: 16,
            start_active: false,
            log_filter: "info".to_owned(),
        }
    }
}

impl EngineConfig {
    /// Parse from JSON; missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Tick period, never shorter than one millisecond.
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms.max(1))
    }
}
