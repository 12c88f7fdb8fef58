/*!
 * Memory Traits
 * Memory management abstractions
 */

use super::strategy::Algorithm;
use super::types::*;
use super::MemoryManager;
use crate::core::types::{Address, PartitionId, Size};

/// Contiguous allocator interface
pub trait Allocator: Send + Sync {
    /// Place `process` using `algorithm`
    fn allocate(&self, process: Process, algorithm: Algorithm) -> MemoryResult<Address>;

    /// Release the block held by a process
    fn deallocate(&self, name: &str) -> MemoryResult<()>;

    /// Partition holding a process's block
    fn process_partition(&self, name: &str) -> Option<PartitionId>;
}

/// Memory statistics provider
pub trait MemoryInfo: Send + Sync {
    /// Get overall memory statistics
    fn stats(&self) -> MemoryStats;

    /// Get memory info as (total, used, available)
    fn info(&self) -> (Size, Size, Size);

    /// Snapshot of the block table
    fn blocks(&self) -> Vec<MemoryBlock>;

    /// Get memory pressure level
    fn pressure(&self) -> MemoryPressure {
        self.stats().memory_pressure()
    }
}

impl Allocator for MemoryManager {
    fn allocate(&self, process: Process, algorithm: Algorithm) -> MemoryResult<Address> {
        MemoryManager::allocate(self, process, algorithm)
    }

    fn deallocate(&self, name: &str) -> MemoryResult<()> {
        MemoryManager::deallocate(self, name)
    }

    fn process_partition(&self, name: &str) -> Option<PartitionId> {
        MemoryManager::process_partition(self, name)
    }
}

impl MemoryInfo for MemoryManager {
    fn stats(&self) -> MemoryStats {
        MemoryManager::stats(self)
    }

    fn info(&self) -> (Size, Size, Size) {
        MemoryManager::info(self)
    }

    fn blocks(&self) -> Vec<MemoryBlock> {
        MemoryManager::blocks(self)
    }
}
