/*!
 * Memory Allocator Implementation
 * Allocation, deallocation and inspection
 */

use super::super::strategy::Algorithm;
use super::super::table::BlockTable;
use super::super::types::{
    MemoryBlock, MemoryError, MemoryPressure, MemoryResult, MemoryStats, Process,
};
use super::MemoryManager;
use crate::core::types::{Address, PartitionId, Size};
use crate::monitoring::ObserverId;
use log::{info, warn};

impl MemoryManager {
    /// Allocate a contiguous block for `process` using `algorithm`
    ///
    /// A process that already holds a block is moved: its old block is
    /// released and the placement runs on the table as it would look without
    /// it. On failure nothing changes, including the old block.
    pub fn allocate(&self, mut process: Process, algorithm: Algorithm) -> MemoryResult<Address> {
        if let Err(e) = process.validate() {
            warn!("Rejected allocation: {}", e);
            return Err(e);
        }

        self.inner.transact(|state, events| {
            let address = if state.registry.contains_key(&process.name) {
                let mut scratch = state.table.clone();
                scratch.release(&process.name);
                scratch.merge_free_blocks();

                let address = place(&mut scratch, &process, algorithm)?;
                state.table = scratch;
                state.registry.shift_remove(&process.name);
                info!("Replaced previous allocation of {}", process.name);
                address
            } else {
                place(&mut state.table, &process, algorithm)?
            };

            process.elapsed = 0;
            process.algorithm = Some(algorithm);
            state.registry.insert(process.name.clone(), process);

            events.push(state.blocks_changed());
            self.ensure_scheduler(state);
            Ok(address)
        })
    }

    /// Release the block held by `name`
    pub fn deallocate(&self, name: &str) -> MemoryResult<()> {
        self.inner.transact(|state, events| {
            if !state.release_process(name) {
                warn!("Attempted to deallocate unknown process {}", name);
                return Err(MemoryError::ProcessNotFound(name.to_string()));
            }

            info!(
                "Deallocated {} ({} units now free)",
                name,
                state.table.total() - state.table.used()
            );
            events.push(state.blocks_changed());
            Ok(())
        })
    }

    /// Free everything and stop the expiration scheduler
    ///
    /// Partitions, if any, survive as empty partitions.
    pub fn clear_all(&self) {
        self.inner.transact(|state, events| {
            let dropped = state.registry.len();
            state.table = state.table.cleared();
            state.registry.clear();
            state.scheduler.stop();

            info!("Cleared all memory ({} processes dropped)", dropped);
            events.push(state.blocks_changed());
        })
    }

    /// Partition holding `name`'s block, if partitioned and allocated
    pub fn process_partition(&self, name: &str) -> Option<PartitionId> {
        self.inner.read(|state| state.table.partition_of(name))
    }

    /// Snapshot of the block table
    pub fn blocks(&self) -> Vec<MemoryBlock> {
        self.inner.read(|state| state.table.blocks().to_vec())
    }

    /// Snapshot of live processes in registry order
    pub fn processes(&self) -> Vec<Process> {
        self.inner.read(|state| state.registry.values().cloned().collect())
    }

    pub fn process(&self, name: &str) -> Option<Process> {
        self.inner.read(|state| state.registry.get(name).cloned())
    }

    pub fn total_memory(&self) -> Size {
        self.inner.read(|state| state.table.total())
    }

    pub fn is_partitioned(&self) -> bool {
        self.inner.read(|state| state.is_partitioned())
    }

    /// Stored partition percentages, empty when unpartitioned
    pub fn partitions(&self) -> Vec<f64> {
        self.inner.read(|state| state.partitions.clone())
    }

    /// Whether a background expiry task is currently ticking
    ///
    /// Always false for a manager without an async runtime: there is no task
    /// to start, and processes age only through [`MemoryManager::tick`].
    pub fn is_scheduler_running(&self) -> bool {
        self.inner.read(|state| state.scheduler.is_running())
    }

    /// Get memory info as (total, used, available)
    pub fn info(&self) -> (Size, Size, Size) {
        self.inner.read(|state| {
            let total = state.table.total();
            let used = state.table.used();
            (total, used, total - used)
        })
    }

    pub fn stats(&self) -> MemoryStats {
        self.inner.read(|state| {
            let table = &state.table;
            let total = table.total();
            let used = table.used();
            let free = total - used;
            let largest_free = table.largest_free();
            let free_blocks = table.blocks().iter().filter(|b| b.is_free()).count();

            MemoryStats {
                total_memory: total,
                used_memory: used,
                free_memory: free,
                usage_percentage: used as f64 / total as f64 * 100.0,
                allocated_blocks: table.len() - free_blocks,
                free_blocks,
                largest_free_block: largest_free,
                fragmentation: if free == 0 {
                    0.0
                } else {
                    1.0 - largest_free as f64 / free as f64
                },
                partition_count: state.partitions.len(),
            }
        })
    }

    pub fn pressure(&self) -> MemoryPressure {
        self.stats().memory_pressure()
    }

    /// Register a block-change observer on the manager's bus
    pub fn on_blocks_changed<F>(&self, observer: F) -> ObserverId
    where
        F: Fn(&[MemoryBlock]) + Send + Sync + 'static,
    {
        self.inner.bus.on_blocks_changed(observer)
    }

    /// Register a process-expired observer on the manager's bus
    pub fn on_process_expired<F>(&self, observer: F) -> ObserverId
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        self.inner.bus.on_process_expired(observer)
    }

    /// Register a time-update observer on the manager's bus
    pub fn on_time_update<F>(&self, observer: F) -> ObserverId
    where
        F: Fn(&[Process]) + Send + Sync + 'static,
    {
        self.inner.bus.on_time_update(observer)
    }
}

fn place(table: &mut BlockTable, process: &Process, algorithm: Algorithm) -> MemoryResult<Address> {
    let Some(index) = algorithm.select(table.blocks(), process.size) else {
        let largest_free = table.largest_free();
        warn!(
            "No fit: {} requested {} units with {}, largest free block is {}",
            process.name, process.size, algorithm, largest_free
        );
        return Err(MemoryError::NoFit {
            requested: process.size,
            algorithm,
            largest_free,
        });
    };

    let address = table.allocate_at(index, &process.name, process.size);
    info!(
        "Allocated {} units at {} for {} using {}",
        process.size, address, process.name, algorithm
    );
    Ok(address)
}
