/*!
 * Memory Manager Builder
 * Builder pattern for MemoryManager construction
 */

use super::MemoryManager;
use crate::core::config::SimulatorConfig;
use crate::core::limits::DEFAULT_TICK_INTERVAL;
use crate::monitoring::EventBus;
use log::{info, warn};
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;

/// How the expiry task finds its runtime
enum RuntimeChoice {
    /// Use the runtime current at `build()`, if any
    Detect,
    Explicit(Handle),
    /// Never spawn; expiration only advances through manual ticks
    Manual,
}

/// Builder for MemoryManager
pub struct MemoryManagerBuilder {
    config: SimulatorConfig,
    event_bus: Option<Arc<EventBus>>,
    runtime: RuntimeChoice,
}

impl MemoryManagerBuilder {
    /// Create a new builder with default configuration
    pub fn new() -> Self {
        Self {
            config: SimulatorConfig::default(),
            event_bus: None,
            runtime: RuntimeChoice::Detect,
        }
    }

    /// Replace the whole configuration
    pub fn with_config(mut self, config: SimulatorConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_total_memory(mut self, total_memory: usize) -> Self {
        self.config.total_memory = total_memory;
        self
    }

    pub fn with_tick_interval(mut self, tick_interval: Duration) -> Self {
        self.config.tick_interval = tick_interval;
        self
    }

    /// Share an existing notification bus
    pub fn with_event_bus(mut self, event_bus: Arc<EventBus>) -> Self {
        self.event_bus = Some(event_bus);
        self
    }

    /// Spawn the expiry task on `runtime`
    pub fn with_runtime(mut self, runtime: Handle) -> Self {
        self.runtime = RuntimeChoice::Explicit(runtime);
        self
    }

    /// Never spawn the expiry task
    pub fn with_manual_ticks(mut self) -> Self {
        self.runtime = RuntimeChoice::Manual;
        self
    }

    /// Build the MemoryManager
    pub fn build(self) -> MemoryManager {
        let mut total = self.config.total_memory;
        if total == 0 {
            warn!("Memory size must be positive, using 1 unit");
            total = 1;
        }

        let mut tick_interval = self.config.tick_interval;
        if tick_interval.is_zero() {
            warn!(
                "Tick interval must be non-zero, using {:?}",
                DEFAULT_TICK_INTERVAL
            );
            tick_interval = DEFAULT_TICK_INTERVAL;
        }

        let runtime = match self.runtime {
            RuntimeChoice::Detect => Handle::try_current().ok(),
            RuntimeChoice::Explicit(handle) => Some(handle),
            RuntimeChoice::Manual => None,
        };

        info!(
            "Memory manager initialized with {} units ({:?} per tick, {} expiration)",
            total,
            tick_interval,
            if runtime.is_some() { "background" } else { "manual" }
        );

        MemoryManager::from_parts(
            total,
            self.event_bus.unwrap_or_default(),
            tick_interval,
            runtime,
        )
    }
}

impl Default for MemoryManagerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
