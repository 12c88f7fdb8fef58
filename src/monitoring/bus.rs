/*!
 * Notification Bus
 *
 * Fans engine events out to registered observers. Observers of one kind are
 * called in registration order. Delivery is synchronous on the thread that
 * performed the mutation.
 */

use super::events::Event;
use crate::memory::{MemoryBlock, Process};
use log::{debug, info};
use parking_lot::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Handle returned on registration, used to unregister
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

struct Registry<F: ?Sized> {
    observers: RwLock<Vec<(ObserverId, Arc<F>)>>,
}

impl<F: ?Sized> Registry<F> {
    fn new() -> Self {
        Self {
            observers: RwLock::new(Vec::new()),
        }
    }

    fn push(&self, id: ObserverId, observer: Arc<F>) {
        self.observers.write().push((id, observer));
    }

    fn remove(&self, id: ObserverId) -> bool {
        let mut observers = self.observers.write();
        let before = observers.len();
        observers.retain(|(existing, _)| *existing != id);
        observers.len() != before
    }

    /// Copy out the observer list so callbacks run without the lock held
    fn snapshot(&self) -> Vec<Arc<F>> {
        self.observers
            .read()
            .iter()
            .map(|(_, observer)| Arc::clone(observer))
            .collect()
    }

    fn len(&self) -> usize {
        self.observers.read().len()
    }
}

/// Observer registries for the three event kinds
pub struct EventBus {
    blocks: Registry<dyn Fn(&[MemoryBlock]) + Send + Sync>,
    expiry: Registry<dyn Fn(&str) + Send + Sync>,
    time: Registry<dyn Fn(&[Process]) + Send + Sync>,
    next_id: AtomicU64,
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            blocks: Registry::new(),
            expiry: Registry::new(),
            time: Registry::new(),
            next_id: AtomicU64::new(1),
        }
    }

    fn next_id(&self) -> ObserverId {
        ObserverId(self.next_id.fetch_add(1, Ordering::SeqCst))
    }

    /// Register an observer for block table changes
    pub fn on_blocks_changed<F>(&self, observer: F) -> ObserverId
    where
        F: Fn(&[MemoryBlock]) + Send + Sync + 'static,
    {
        let id = self.next_id();
        self.blocks.push(id, Arc::new(observer));
        info!("Registered block-change observer {}", id.0);
        id
    }

    /// Register an observer for process expirations
    pub fn on_process_expired<F>(&self, observer: F) -> ObserverId
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        let id = self.next_id();
        self.expiry.push(id, Arc::new(observer));
        info!("Registered process-expired observer {}", id.0);
        id
    }

    /// Register an observer for scheduler tick snapshots
    pub fn on_time_update<F>(&self, observer: F) -> ObserverId
    where
        F: Fn(&[Process]) + Send + Sync + 'static,
    {
        let id = self.next_id();
        self.time.push(id, Arc::new(observer));
        info!("Registered time-update observer {}", id.0);
        id
    }

    /// Remove an observer of any kind
    pub fn unregister(&self, id: ObserverId) -> bool {
        let removed = self.blocks.remove(id) || self.expiry.remove(id) || self.time.remove(id);
        if removed {
            info!("Unregistered observer {}", id.0);
        }
        removed
    }

    /// Total number of registered observers
    pub fn observer_count(&self) -> usize {
        self.blocks.len() + self.expiry.len() + self.time.len()
    }

    /// Deliver one event to every observer of its kind
    pub fn publish(&self, event: &Event) {
        debug!("Publishing {} event", event.kind());
        match event {
            Event::BlocksChanged(blocks) => {
                for observer in self.blocks.snapshot() {
                    observer(blocks.as_slice());
                }
            }
            Event::ProcessExpired(name) => {
                for observer in self.expiry.snapshot() {
                    observer(name.as_str());
                }
            }
            Event::TimeUpdate(processes) => {
                for observer in self.time.snapshot() {
                    observer(processes.as_slice());
                }
            }
        }
    }

    /// Deliver events in order
    pub fn publish_all<I>(&self, events: I)
    where
        I: IntoIterator<Item = Event>,
    {
        for event in events {
            self.publish(&event);
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
