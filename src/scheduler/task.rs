/*!
 * Expiry Task
 *
 * Background task that ticks once per time unit while processes are alive.
 * It holds only a weak reference to its target, so dropping the memory
 * manager also ends the task.
 */

use super::traits::TickTarget;
use log::{debug, info};
use std::sync::Weak;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

/// Spawner for the periodic expiry loop
pub struct ExpiryTask;

impl ExpiryTask {
    /// Spawn a loop ticking `target` every `period`, first tick one period
    /// from now
    pub fn spawn<T: TickTarget>(
        runtime: &Handle,
        target: Weak<T>,
        generation: u64,
        period: Duration,
    ) -> JoinHandle<()> {
        info!(
            "Expiration scheduler started (generation {}, {:?} per tick)",
            generation, period
        );
        runtime.spawn(run_expiry_loop(target, generation, period))
    }
}

async fn run_expiry_loop<T: TickTarget>(target: Weak<T>, generation: u64, period: Duration) {
    let mut interval = tokio::time::interval_at(Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        interval.tick().await;

        let Some(target) = target.upgrade() else {
            debug!("Expiration scheduler target dropped, exiting");
            break;
        };

        if !target.on_tick(generation) {
            break;
        }
    }

    info!("Expiration scheduler stopped (generation {})", generation);
}
