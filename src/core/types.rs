/*!
 * Core Types
 * Common types used across the simulator
 */

/// Offset into the simulated address space (whole units)
pub type Address = usize;

/// Size of a region in whole units
pub type Size = usize;

/// Number of scheduler ticks
pub type Ticks = u64;

/// Index of a static partition, assigned sequentially from 0
pub type PartitionId = usize;
