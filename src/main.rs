/*!
 * Memory Simulator - Main Entry Point
 *
 * Drives a short scripted session against the allocator:
 * - contiguous placement with each fit algorithm
 * - static partitioning
 * - automatic expiration on the background scheduler
 */

use anyhow::Context;
use memsim::memory::partition;
use memsim::{init_tracing, Algorithm, MemoryManager, Process, SimulatorConfig};
use tracing::{debug, info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = SimulatorConfig::from_env();
    info!(
        total_memory = config.total_memory,
        tick_ms = config.tick_interval.as_millis() as u64,
        "Memory simulator starting"
    );

    let manager = MemoryManager::builder().with_config(config.clone()).build();

    manager.on_blocks_changed(|blocks| {
        let used = blocks.iter().filter(|b| !b.is_free()).count();
        info!(blocks = blocks.len(), used, "Block table changed");
    });
    manager.on_process_expired(|name| info!(process = name, "Process expired"));
    manager.on_time_update(|processes| {
        for process in processes {
            info!(
                process = %process,
                remaining = process.remaining(),
                "Tick"
            );
        }
    });

    let unit = (config.total_memory / 16).max(1);
    let workload = [
        (Process::new("editor", unit * 4, 3), Algorithm::FirstFit),
        (Process::new("compiler", unit * 3, 2), Algorithm::BestFit),
        (Process::new("browser", unit * 5, 4), Algorithm::WorstFit),
    ];

    for (process, algorithm) in workload {
        let name = process.name.clone();
        match manager.allocate(process, algorithm) {
            Ok(address) => info!(process = %name, address, %algorithm, "Allocated"),
            Err(e) => warn!(process = %name, error = %e, "Allocation failed"),
        }
    }

    manager
        .deallocate("compiler")
        .context("compiler should have been allocated")?;
    report(&manager);

    let percentages = partition::normalize(&[40.0, 40.0, 40.0]);
    manager
        .create_partitions(&percentages)
        .context("partitioning the default memory size")?;

    for (index, (process, algorithm)) in [
        (Process::new("db", unit * 2, 2), Algorithm::BestFit),
        (Process::new("cache", unit, 3), Algorithm::FirstFit),
    ]
    .into_iter()
    .enumerate()
    {
        let name = process.name.clone();
        manager
            .allocate(process, algorithm)
            .with_context(|| format!("allocating workload item {}", index))?;
        info!(
            process = %name,
            partition = ?manager.process_partition(&name),
            "Placed in partition"
        );
    }
    report(&manager);

    info!("Waiting for all processes to expire...");
    let mut ticker = tokio::time::interval(config.tick_interval);
    while manager.is_scheduler_running() {
        ticker.tick().await;
    }

    report(&manager);
    manager.clear_all();
    info!("Memory simulator finished");
    Ok(())
}

fn report(manager: &MemoryManager) {
    let stats = manager.stats();
    info!(
        used = stats.used_memory,
        free = stats.free_memory,
        largest_free = stats.largest_free_block,
        fragmentation = stats.fragmentation,
        pressure = %stats.memory_pressure(),
        "Memory report"
    );
    match serde_json::to_string(&stats) {
        Ok(json) => debug!(stats = %json, "Memory report (json)"),
        Err(e) => warn!(error = %e, "Could not serialize memory report"),
    }
}
