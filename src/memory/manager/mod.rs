/*!
 * Memory Management
 *
 * Contiguous allocator over a simulated address space with time-bounded
 * processes.
 *
 * ## Features
 *
 * - **Placement**: first-fit, best-fit and worst-fit over an ordered block table
 * - **Block splitting**: larger blocks are split, the remainder stays free
 * - **Coalescing**: adjacent free blocks merge, never across partitions
 * - **Static partitions**: the space can be carved into fixed sub-ranges
 * - **Resizing**: the space grows or shrinks without losing allocations
 * - **Expiration**: a background task ages processes and reclaims them when
 *   their duration runs out
 *
 * ## Concurrency
 *
 * The block table, process registry, partition list and scheduler flag live
 * behind one reentrant lock. Every operation and every scheduler tick holds it
 * from the first read until its last notification has been delivered, so
 * observers see events in mutation order. Observers run on the mutating
 * thread and may call back into the manager.
 */

mod allocator;
mod builder;
mod expiry;
mod layout;

pub use builder::MemoryManagerBuilder;

use super::table::BlockTable;
use super::types::Process;
use crate::core::types::Size;
use crate::monitoring::{Event, EventBus};
use crate::scheduler::{ExpiryTask, SchedulerState};
use indexmap::IndexMap;
use log::debug;
use parking_lot::ReentrantMutex;
use std::cell::RefCell;
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;

/// Engine state guarded as one unit
#[derive(Debug)]
pub(crate) struct MemoryState {
    pub(super) table: BlockTable,
    /// Live processes in allocation order
    pub(super) registry: IndexMap<String, Process>,
    /// Partition percentages, empty when unpartitioned
    pub(super) partitions: Vec<f64>,
    pub(super) scheduler: SchedulerState,
}

impl MemoryState {
    fn new(total: Size) -> Self {
        Self {
            table: BlockTable::new(total),
            registry: IndexMap::new(),
            partitions: Vec::new(),
            scheduler: SchedulerState::new(),
        }
    }

    pub(super) fn is_partitioned(&self) -> bool {
        !self.partitions.is_empty()
    }

    pub(super) fn blocks_changed(&self) -> Event {
        Event::BlocksChanged(self.table.blocks().to_vec())
    }

    /// Free a live process's block, drop it from the registry and coalesce
    pub(super) fn release_process(&mut self, name: &str) -> bool {
        if self.registry.shift_remove(name).is_none() {
            return false;
        }
        self.table.release(name);
        self.table.merge_free_blocks();
        true
    }

    /// Emit an expiry for every live process, in registry order, then forget
    /// them all
    pub(super) fn discard_processes(&mut self, events: &mut Vec<Event>) {
        events.extend(
            self.registry
                .drain(..)
                .map(|(name, _)| Event::ProcessExpired(name)),
        );
    }
}

pub(crate) struct Shared {
    state: ReentrantMutex<RefCell<MemoryState>>,
    bus: Arc<EventBus>,
    tick_interval: Duration,
    runtime: Option<Handle>,
}

impl Shared {
    /// Run `op` inside the exclusion domain, then deliver the events it
    /// produced before releasing it
    pub(super) fn transact<R>(&self, op: impl FnOnce(&mut MemoryState, &mut Vec<Event>) -> R) -> R {
        let guard = self.state.lock();
        let mut events = Vec::new();

        let result = {
            let mut state = guard.borrow_mut();
            let result = op(&mut state, &mut events);
            debug_assert_eq!(state.table.validate(), Ok(()));
            result
        };

        self.bus.publish_all(events);
        result
    }

    pub(super) fn read<R>(&self, op: impl FnOnce(&MemoryState) -> R) -> R {
        let guard = self.state.lock();
        let state = guard.borrow();
        op(&state)
    }
}

/// Memory manager
///
/// Cheap to clone; clones share the same engine.
#[derive(Clone)]
pub struct MemoryManager {
    inner: Arc<Shared>,
}

impl MemoryManager {
    /// Manager over `total` units with default settings
    pub fn new(total: Size) -> Self {
        Self::builder().with_total_memory(total).build()
    }

    pub fn builder() -> MemoryManagerBuilder {
        MemoryManagerBuilder::new()
    }

    fn from_parts(
        total: Size,
        bus: Arc<EventBus>,
        tick_interval: Duration,
        runtime: Option<Handle>,
    ) -> Self {
        Self {
            inner: Arc::new(Shared {
                state: ReentrantMutex::new(RefCell::new(MemoryState::new(total))),
                bus,
                tick_interval,
                runtime,
            }),
        }
    }

    /// The notification bus observers are registered on
    pub fn event_bus(&self) -> &Arc<EventBus> {
        &self.inner.bus
    }

    pub fn tick_interval(&self) -> Duration {
        self.inner.tick_interval
    }

    /// Start the expiry task unless one is already running
    ///
    /// Without an async runtime the scheduler stays idle and processes age
    /// only through [`MemoryManager::tick`].
    fn ensure_scheduler(&self, state: &mut MemoryState) {
        let Some(runtime) = &self.inner.runtime else {
            debug!("No async runtime attached, expiration relies on manual ticks");
            return;
        };

        if let Some(generation) = state.scheduler.start() {
            ExpiryTask::spawn(
                runtime,
                Arc::downgrade(&self.inner),
                generation,
                self.inner.tick_interval,
            );
        }
    }
}

impl Default for MemoryManager {
    fn default() -> Self {
        Self::builder().build()
    }
}
