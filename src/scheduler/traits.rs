/*!
 * Scheduler Traits
 * Interface between the expiry task and the state it ages
 */

/// Something the expiry task can advance by one time unit
pub trait TickTarget: Send + Sync + 'static {
    /// Run one tick on behalf of the task started as `generation`
    ///
    /// Returns `false` once the task should exit: the scheduler was stopped,
    /// restarted under a newer generation, or found no live processes.
    fn on_tick(&self, generation: u64) -> bool;
}
