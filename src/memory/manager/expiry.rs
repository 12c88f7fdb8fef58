/*!
 * Process Expiration
 * One scheduler tick: age every live process and reclaim the expired ones
 */

use super::{MemoryManager, Shared};
use crate::monitoring::Event;
use crate::scheduler::TickTarget;
use log::{info, trace};

impl Shared {
    /// Run one tick, or report that there is nothing to tick
    ///
    /// With `generation` set, the tick only runs for the expiry task that is
    /// current. Returns `None` when the scheduler should go idle, otherwise
    /// the names expired by this tick in registry order.
    fn tick(&self, generation: Option<u64>) -> Option<Vec<String>> {
        let guard = self.state.lock();

        let (snapshot, expired) = {
            let mut state = guard.borrow_mut();

            if generation.map_or(false, |g| !state.scheduler.is_current(g)) {
                return None;
            }
            if state.registry.is_empty() {
                if state.scheduler.stop() {
                    info!("Expiration scheduler idle: no active processes");
                }
                return None;
            }

            let mut expired = Vec::new();
            for process in state.registry.values_mut() {
                process.elapsed += 1;
                if process.is_expired() {
                    expired.push(process.name.clone());
                }
            }

            let snapshot: Vec<_> = state.registry.values().cloned().collect();
            (snapshot, expired)
        };

        trace!("Tick: {} active, {} expired", snapshot.len(), expired.len());
        self.bus.publish(&Event::TimeUpdate(snapshot));

        for name in &expired {
            info!("Process {} expired", name);
            self.bus.publish(&Event::ProcessExpired(name.clone()));

            // An expiry observer may already have released it
            let blocks = {
                let mut state = guard.borrow_mut();
                if state.release_process(name) {
                    debug_assert_eq!(state.table.validate(), Ok(()));
                    Some(state.blocks_changed())
                } else {
                    None
                }
            };
            if let Some(event) = blocks {
                self.bus.publish(&event);
            }
        }

        Some(expired)
    }
}

impl TickTarget for Shared {
    fn on_tick(&self, generation: u64) -> bool {
        self.tick(Some(generation)).is_some()
    }
}

impl MemoryManager {
    /// Advance time by one unit right now
    ///
    /// Runs the same iteration as the background scheduler and returns the
    /// names of the processes it expired. With no live processes this only
    /// puts the scheduler to sleep.
    pub fn tick(&self) -> Vec<String> {
        self.inner.tick(None).unwrap_or_default()
    }
}
