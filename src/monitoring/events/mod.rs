/*!
 * Event System
 * Strongly-typed state-change notifications emitted by the memory manager
 */

use crate::memory::{MemoryBlock, Process};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Event kind for filtering and logging
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum EventKind {
    BlocksChanged,
    ProcessExpired,
    TimeUpdate,
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventKind::BlocksChanged => write!(f, "blocks_changed"),
            EventKind::ProcessExpired => write!(f, "process_expired"),
            EventKind::TimeUpdate => write!(f, "time_update"),
        }
    }
}

/// Notification payload
///
/// Every event is emitted only after the mutation that caused it has left the
/// block table consistent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum Event {
    /// Full block table snapshot after a mutation
    BlocksChanged(Vec<MemoryBlock>),
    /// A process reached its duration, or was discarded by a repartition
    ProcessExpired(String),
    /// Registry snapshot after a scheduler tick aged every process
    TimeUpdate(Vec<Process>),
}

impl Event {
    pub fn kind(&self) -> EventKind {
        match self {
            Event::BlocksChanged(_) => EventKind::BlocksChanged,
            Event::ProcessExpired(_) => EventKind::ProcessExpired,
            Event::TimeUpdate(_) => EventKind::TimeUpdate,
        }
    }
}
