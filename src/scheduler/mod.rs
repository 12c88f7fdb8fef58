/*!
 * Expiration Scheduler
 * Periodic aging of live allocations
 */

mod task;
pub mod traits;
pub mod types;

pub use task::ExpiryTask;
pub use traits::TickTarget;
pub use types::SchedulerState;
