/*!
 * Simulator Configuration
 *
 * Startup settings for the memory manager, loaded from defaults or the
 * environment.
 */

use super::limits::{DEFAULT_TICK_INTERVAL, DEFAULT_TOTAL_MEMORY, ENV_TICK_MS, ENV_TOTAL_MEMORY};
use log::warn;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Memory manager configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulatorConfig {
    /// Initial size of the address space (default: 1024)
    pub total_memory: usize,

    /// Wall-clock length of one scheduler tick (default: 1s)
    pub tick_interval: Duration,
}

impl SimulatorConfig {
    /// Create default configuration
    pub fn new() -> Self {
        Self {
            total_memory: DEFAULT_TOTAL_MEMORY,
            tick_interval: DEFAULT_TICK_INTERVAL,
        }
    }

    /// Load configuration from `MEMSIM_TOTAL_MEMORY` and `MEMSIM_TICK_MS`
    ///
    /// Missing variables keep their defaults. Unparseable or zero values are
    /// reported and ignored.
    pub fn from_env() -> Self {
        let mut config = Self::new();

        if let Some(total) = read_positive(ENV_TOTAL_MEMORY) {
            config.total_memory = total as usize;
        }
        if let Some(millis) = read_positive(ENV_TICK_MS) {
            config.tick_interval = Duration::from_millis(millis);
        }

        config
    }

    pub fn with_total_memory(mut self, total_memory: usize) -> Self {
        self.total_memory = total_memory;
        self
    }

    pub fn with_tick_interval(mut self, tick_interval: Duration) -> Self {
        self.tick_interval = tick_interval;
        self
    }
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self::new()
    }
}

fn read_positive(var: &str) -> Option<u64> {
    let raw = std::env::var(var).ok()?;
    match raw.trim().parse::<u64>() {
        Ok(0) => {
            warn!("{} must be positive, ignoring", var);
            None
        }
        Ok(value) => Some(value),
        Err(e) => {
            warn!("Invalid {}={:?} ({}), using default", var, raw, e);
            None
        }
    }
}
