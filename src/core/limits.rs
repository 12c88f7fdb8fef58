/*!
 * Simulator Limits and Constants
 *
 * Centralized location for defaults, thresholds, and magic numbers.
 * Organized by domain for discoverability.
 */

use std::time::Duration;

// =============================================================================
// MEMORY
// =============================================================================

/// Default size of the simulated address space (1024 units)
pub const DEFAULT_TOTAL_MEMORY: usize = 1024;

/// Usage ratio at which pressure is reported as MEDIUM
pub const PRESSURE_MEDIUM_THRESHOLD: f64 = 0.60;

/// Usage ratio at which pressure is reported as HIGH
pub const PRESSURE_HIGH_THRESHOLD: f64 = 0.80;

/// Usage ratio at which pressure is reported as CRITICAL
pub const PRESSURE_CRITICAL_THRESHOLD: f64 = 0.95;

// =============================================================================
// PARTITIONS
// =============================================================================

/// Percentages summing to within this distance of 100 are left untouched by
/// normalization
pub const PARTITION_SUM_TOLERANCE: f64 = 0.1;

// =============================================================================
// SCHEDULER
// =============================================================================

/// Length of one simulated time unit
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_secs(1);

// =============================================================================
// ENVIRONMENT
// =============================================================================

/// Overrides the initial memory size
pub const ENV_TOTAL_MEMORY: &str = "MEMSIM_TOTAL_MEMORY";

/// Overrides the tick interval, in milliseconds
pub const ENV_TICK_MS: &str = "MEMSIM_TICK_MS";

/// Enables JSON trace output when set to `1` or `true`
pub const ENV_TRACE_JSON: &str = "MEMSIM_TRACE_JSON";
