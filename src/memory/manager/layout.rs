/*!
 * Address Space Layout
 * Resizing and static partitioning
 */

use super::super::table::BlockTable;
use super::super::types::{MemoryError, MemoryResult};
use super::MemoryManager;
use crate::core::types::Size;
use log::{info, warn};

impl MemoryManager {
    /// Change the size of the address space
    ///
    /// Shrinking fails when allocated memory would not fit. An unpartitioned
    /// space keeps every allocation. A partitioned space is rebuilt from its
    /// stored percentages, discarding all allocations; each discarded process
    /// is reported as expired.
    pub fn resize(&self, new_size: Size) -> MemoryResult<()> {
        self.inner.transact(|state, events| {
            let total = state.table.total();
            let used = state.table.used();

            if new_size == 0 {
                warn!("Rejected resize to 0 units");
                return Err(MemoryError::InvalidSize(new_size));
            }
            if new_size < total && used > new_size {
                warn!(
                    "Rejected shrink from {} to {} units: {} units allocated",
                    total, new_size, used
                );
                return Err(MemoryError::ShrinkBelowUsed {
                    requested: new_size,
                    used,
                });
            }

            if state.is_partitioned() {
                let table = BlockTable::partitioned(&state.partitions, new_size)?;
                state.discard_processes(events);
                state.table = table;
            } else {
                state.table = state.table.resized(new_size)?;
            }

            info!("Resized memory from {} to {} units", total, new_size);
            events.push(state.blocks_changed());
            Ok(())
        })
    }

    /// Split the address space into partitions sized by `percentages`
    ///
    /// An empty list removes partitioning. Either way every live process is
    /// discarded and reported as expired, in registry order, before the
    /// block-change notification. Percentages are used as given; see
    /// [`crate::memory::partition::normalize`] for rescaling user input.
    pub fn create_partitions(&self, percentages: &[f64]) -> MemoryResult<()> {
        self.inner.transact(|state, events| {
            let total = state.table.total();

            let table = if percentages.is_empty() {
                BlockTable::new(total)
            } else {
                BlockTable::partitioned(percentages, total).map_err(|e| {
                    warn!("Rejected partition layout {:?}: {}", percentages, e);
                    e
                })?
            };

            state.partitions = percentages.to_vec();
            state.discard_processes(events);
            state.table = table;

            if percentages.is_empty() {
                info!("Removed partitioning ({} units in one block)", total);
            } else {
                info!(
                    "Memory partitioned into {} sections: {:?}",
                    percentages.len(),
                    state.table.blocks().iter().map(|b| b.size).collect::<Vec<_>>()
                );
            }
            events.push(state.blocks_changed());
            Ok(())
        })
    }
}
