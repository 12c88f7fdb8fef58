/*!
 * Memory Allocation Simulator Library
 *
 * Contiguous allocation over a simulated address space: first/best/worst-fit
 * placement, static partitions, resizing, coalescing, and time-driven
 * expiration of processes.
 */

pub mod core;
pub mod memory;
pub mod monitoring;
pub mod scheduler;

// Re-exports
pub use crate::core::{Address, PartitionId, SimulatorConfig, Size, Ticks};
pub use memory::{
    Algorithm, MemoryBlock, MemoryError, MemoryManager, MemoryManagerBuilder, MemoryPressure,
    MemoryResult, MemoryStats, Process,
};
pub use monitoring::{init_tracing, Event, EventBus, EventKind, ObserverId};
