/*!
 * Scheduler Types
 */

/// Running flag of the expiration scheduler
///
/// Each start bumps the generation so a task left over from an earlier run
/// can tell it has been superseded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SchedulerState {
    running: bool,
    generation: u64,
}

impl SchedulerState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Transition idle -> running, returning the new generation
    pub fn start(&mut self) -> Option<u64> {
        if self.running {
            return None;
        }
        self.running = true;
        self.generation += 1;
        Some(self.generation)
    }

    /// Transition to idle, returning whether the scheduler was running
    pub fn stop(&mut self) -> bool {
        std::mem::replace(&mut self.running, false)
    }

    /// Whether a task started as `generation` should keep ticking
    pub fn is_current(&self, generation: u64) -> bool {
        self.running && self.generation == generation
    }
}
