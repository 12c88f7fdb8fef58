/*!
 * Memory Types
 * Common types for the block table, processes and errors
 */

use super::strategy::Algorithm;
use crate::core::limits::{
    PRESSURE_CRITICAL_THRESHOLD, PRESSURE_HIGH_THRESHOLD, PRESSURE_MEDIUM_THRESHOLD,
};
use crate::core::types::{Address, PartitionId, Size, Ticks};
use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Memory operation result
pub type MemoryResult<T> = Result<T, MemoryError>;

/// Memory errors
///
/// Every error is reported before any state is touched, so a failed operation
/// is always a complete no-op.
#[derive(Error, Debug, Clone, PartialEq, Diagnostic)]
pub enum MemoryError {
    #[error("Invalid process {name:?}: {reason}")]
    #[diagnostic(
        code(memory::invalid_process),
        help("Processes need a non-empty name, a positive size and a positive duration.")
    )]
    InvalidProcess { name: String, reason: &'static str },

    #[error("No free block fits {requested} units using {algorithm} (largest free block: {largest_free})")]
    #[diagnostic(
        code(memory::no_fit),
        help("Free or shrink other processes, or coalesce by deallocating neighbours.")
    )]
    NoFit {
        requested: Size,
        algorithm: Algorithm,
        largest_free: Size,
    },

    #[error("Cannot shrink to {requested} units: {used} units are allocated")]
    #[diagnostic(
        code(memory::shrink_below_used),
        help("Deallocate processes until used memory fits the new size.")
    )]
    ShrinkBelowUsed { requested: Size, used: Size },

    #[error("Invalid memory size: {0}")]
    #[diagnostic(code(memory::invalid_size), help("Memory size must be positive."))]
    InvalidSize(Size),

    #[error("Process {0:?} not found")]
    #[diagnostic(
        code(memory::process_not_found),
        help("The process may have expired or never been allocated.")
    )]
    ProcessNotFound(String),

    #[error("Invalid partition percentage at index {index}: {value}")]
    #[diagnostic(
        code(memory::invalid_partition),
        help("Partition percentages must be finite and positive.")
    )]
    InvalidPartition { index: usize, value: f64 },

    #[error("Cannot create {count} partitions in {total} units of memory")]
    #[diagnostic(
        code(memory::too_many_partitions),
        help("Every partition needs at least one unit. Use fewer partitions or grow memory.")
    )]
    TooManyPartitions { count: usize, total: Size },

    #[error("Partitions before the last one take {claimed} of {total} units, leaving nothing for the last")]
    #[diagnostic(
        code(memory::partition_overflow),
        help("Normalize the percentages so they sum to 100.")
    )]
    PartitionOverflow { claimed: Size, total: Size },

    #[error("Unknown allocation algorithm: {0:?}")]
    #[diagnostic(
        code(memory::unknown_algorithm),
        help("Use one of: first_fit, best_fit, worst_fit.")
    )]
    UnknownAlgorithm(String),
}

/// A contiguous region of the address space, free or owned by one process
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryBlock {
    pub start: Address,
    pub size: Size,
    pub free: bool,
    pub owner: Option<String>,
    pub partition: Option<PartitionId>,
}

impl MemoryBlock {
    /// Create a free block
    pub fn free(start: Address, size: Size, partition: Option<PartitionId>) -> Self {
        Self {
            start,
            size,
            free: true,
            owner: None,
            partition,
        }
    }

    /// Create a block owned by `owner`
    pub fn used(start: Address, size: Size, owner: String, partition: Option<PartitionId>) -> Self {
        Self {
            start,
            size,
            free: false,
            owner: Some(owner),
            partition,
        }
    }

    /// Inclusive last address of the block
    pub fn end(&self) -> Address {
        self.start + self.size - 1
    }

    pub fn is_free(&self) -> bool {
        self.free
    }

    pub fn is_owned_by(&self, name: &str) -> bool {
        self.owner.as_deref() == Some(name)
    }

    /// Release ownership and mark the block free
    pub fn release(&mut self) {
        self.free = true;
        self.owner = None;
    }
}

/// A time-bounded process holding one contiguous allocation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Process {
    pub name: String,
    pub size: Size,
    pub duration: Ticks,
    pub elapsed: Ticks,
    pub algorithm: Option<Algorithm>,
}

impl Process {
    pub fn new(name: impl Into<String>, size: Size, duration: Ticks) -> Self {
        Self {
            name: name.into(),
            size,
            duration,
            elapsed: 0,
            algorithm: None,
        }
    }

    /// Reject processes that could never be placed or would never expire
    pub fn validate(&self) -> MemoryResult<()> {
        let reason = if self.name.is_empty() {
            "name must not be empty"
        } else if self.size == 0 {
            "size must be positive"
        } else if self.duration == 0 {
            "duration must be positive"
        } else {
            return Ok(());
        };

        Err(MemoryError::InvalidProcess {
            name: self.name.clone(),
            reason,
        })
    }

    /// Ticks left before expiry
    pub fn remaining(&self) -> Ticks {
        self.duration.saturating_sub(self.elapsed)
    }

    pub fn is_expired(&self) -> bool {
        self.elapsed >= self.duration
    }
}

impl fmt::Display for Process {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} MB)", self.name, self.size)
    }
}

/// Memory statistics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryStats {
    pub total_memory: Size,
    pub used_memory: Size,
    pub free_memory: Size,
    pub usage_percentage: f64,
    pub allocated_blocks: usize,
    pub free_blocks: usize,
    pub largest_free_block: Size,
    /// External fragmentation: share of free memory outside the largest free
    /// block, in `[0, 1]`
    pub fragmentation: f64,
    pub partition_count: usize,
}

impl MemoryStats {
    pub fn memory_pressure(&self) -> MemoryPressure {
        let ratio = self.usage_percentage / 100.0;
        if ratio >= PRESSURE_CRITICAL_THRESHOLD {
            MemoryPressure::Critical
        } else if ratio >= PRESSURE_HIGH_THRESHOLD {
            MemoryPressure::High
        } else if ratio >= PRESSURE_MEDIUM_THRESHOLD {
            MemoryPressure::Medium
        } else {
            MemoryPressure::Low
        }
    }
}

/// Memory pressure levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MemoryPressure {
    Low,
    Medium,
    High,
    Critical,
}

impl fmt::Display for MemoryPressure {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            MemoryPressure::Low => write!(f, "LOW"),
            MemoryPressure::Medium => write!(f, "MEDIUM"),
            MemoryPressure::High => write!(f, "HIGH"),
            MemoryPressure::Critical => write!(f, "CRITICAL"),
        }
    }
}
