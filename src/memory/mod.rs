/*!
 * Memory Module
 * Contiguous allocation, partitioning and expiration
 */

mod coalesce;
pub mod manager;
pub mod partition;
mod resize;
pub mod strategy;
pub mod table;
pub mod traits;
pub mod types;

// Re-export for convenience
pub use manager::{MemoryManager, MemoryManagerBuilder};
pub use strategy::Algorithm;
pub use table::BlockTable;
pub use traits::*;
pub use types::*;
