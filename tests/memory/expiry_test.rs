/*!
 * Expiration Tests
 * Manual ticks and the background scheduler
 */

use memsim::{Algorithm, Event, MemoryBlock, MemoryManager, Process};
use parking_lot::Mutex;
use pretty_assertions::assert_eq;
use std::sync::Arc;
use std::time::Duration;

/// Records every notification in delivery order
fn record(manager: &MemoryManager) -> Arc<Mutex<Vec<Event>>> {
    let log = Arc::new(Mutex::new(Vec::new()));

    let sink = Arc::clone(&log);
    manager.on_blocks_changed(move |blocks| sink.lock().push(Event::BlocksChanged(blocks.to_vec())));
    let sink = Arc::clone(&log);
    manager.on_process_expired(move |name| sink.lock().push(Event::ProcessExpired(name.to_string())));
    let sink = Arc::clone(&log);
    manager.on_time_update(move |processes| sink.lock().push(Event::TimeUpdate(processes.to_vec())));

    log
}

#[test]
fn test_manual_ticks_expire_and_coalesce() {
    let manager = MemoryManager::builder()
        .with_total_memory(1000)
        .with_manual_ticks()
        .build();
    manager
        .allocate(Process::new("P1", 200, 2), Algorithm::FirstFit)
        .unwrap();

    assert!(manager.tick().is_empty());
    assert_eq!(manager.process("P1").unwrap().elapsed, 1);

    assert_eq!(manager.tick(), vec!["P1".to_string()]);
    assert!(manager.process("P1").is_none());
    assert_eq!(manager.blocks(), vec![MemoryBlock::free(0, 1000, None)]);

    // Nothing left to age
    assert!(manager.tick().is_empty());
}

#[test]
fn test_tick_notification_order() {
    let manager = MemoryManager::builder()
        .with_total_memory(100)
        .with_manual_ticks()
        .build();
    manager
        .allocate(Process::new("short", 10, 1), Algorithm::FirstFit)
        .unwrap();
    manager
        .allocate(Process::new("long", 10, 5), Algorithm::FirstFit)
        .unwrap();
    manager
        .allocate(Process::new("also_short", 10, 1), Algorithm::FirstFit)
        .unwrap();

    let log = record(&manager);
    let expired = manager.tick();
    assert_eq!(expired, vec!["short".to_string(), "also_short".to_string()]);

    let log = log.lock();
    let kinds: Vec<String> = log
        .iter()
        .map(|event| match event {
            Event::TimeUpdate(processes) => format!("time:{}", processes.len()),
            Event::ProcessExpired(name) => format!("expired:{}", name),
            Event::BlocksChanged(_) => "blocks".to_string(),
        })
        .collect();
    assert_eq!(
        kinds,
        vec![
            "time:3",
            "expired:short",
            "blocks",
            "expired:also_short",
            "blocks",
        ]
    );

    match &log[0] {
        Event::TimeUpdate(processes) => {
            assert!(processes.iter().all(|p| p.elapsed == 1));
        }
        other => panic!("expected time update first, got {:?}", other),
    }
}

#[test]
fn test_expiry_observer_may_deallocate_first() {
    let manager = MemoryManager::builder()
        .with_total_memory(100)
        .with_manual_ticks()
        .build();
    manager
        .allocate(Process::new("p", 10, 1), Algorithm::FirstFit)
        .unwrap();

    let observer_mgr = manager.clone();
    manager.on_process_expired(move |name| {
        observer_mgr.deallocate(name).unwrap();
    });

    assert_eq!(manager.tick(), vec!["p".to_string()]);
    assert_eq!(manager.blocks(), vec![MemoryBlock::free(0, 100, None)]);
}

#[test]
fn test_no_runtime_means_manual_scheduler() {
    let manager = MemoryManager::new(100);
    manager
        .allocate(Process::new("p", 10, 2), Algorithm::FirstFit)
        .unwrap();
    assert!(!manager.is_scheduler_running());

    // Time only moves when the caller ticks
    assert!(manager.tick().is_empty());
    assert_eq!(manager.process("p").map(|p| p.elapsed), Some(1));
    assert!(!manager.is_scheduler_running());
}

#[tokio::test(start_paused = true)]
async fn test_background_scheduler_expires_process() {
    let manager = MemoryManager::builder()
        .with_total_memory(1000)
        .with_tick_interval(Duration::from_secs(1))
        .build();
    let log = record(&manager);

    manager
        .allocate(Process::new("P1", 300, 2), Algorithm::FirstFit)
        .unwrap();
    assert!(manager.is_scheduler_running());

    tokio::time::sleep(Duration::from_millis(1500)).await;
    assert_eq!(manager.process("P1").map(|p| p.elapsed), Some(1));

    tokio::time::sleep(Duration::from_secs(1)).await;
    assert!(manager.process("P1").is_none());
    assert_eq!(manager.blocks(), vec![MemoryBlock::free(0, 1000, None)]);

    // The next tick finds the registry empty and the scheduler goes idle
    tokio::time::sleep(Duration::from_secs(1)).await;
    assert!(!manager.is_scheduler_running());

    let expired: Vec<_> = log
        .lock()
        .iter()
        .filter_map(|event| match event {
            Event::ProcessExpired(name) => Some(name.clone()),
            _ => None,
        })
        .collect();
    assert_eq!(expired, vec!["P1".to_string()]);
}

#[tokio::test(start_paused = true)]
async fn test_clear_all_stops_scheduler_and_restart_is_single() {
    let manager = MemoryManager::builder()
        .with_total_memory(1000)
        .with_tick_interval(Duration::from_secs(1))
        .build();

    manager
        .allocate(Process::new("a", 100, 10), Algorithm::FirstFit)
        .unwrap();
    manager.clear_all();
    assert!(!manager.is_scheduler_running());

    manager
        .allocate(Process::new("b", 100, 10), Algorithm::FirstFit)
        .unwrap();
    assert!(manager.is_scheduler_running());

    tokio::time::sleep(Duration::from_millis(3500)).await;

    // Only the new generation ticks, so three ticks have elapsed, not six
    assert_eq!(manager.process("b").map(|p| p.elapsed), Some(3));
}

#[tokio::test(start_paused = true)]
async fn test_scheduler_restarts_after_idle() {
    let manager = MemoryManager::builder()
        .with_total_memory(100)
        .with_tick_interval(Duration::from_secs(1))
        .build();

    manager
        .allocate(Process::new("a", 10, 1), Algorithm::FirstFit)
        .unwrap();
    tokio::time::sleep(Duration::from_millis(2500)).await;
    assert!(!manager.is_scheduler_running());

    manager
        .allocate(Process::new("b", 10, 1), Algorithm::FirstFit)
        .unwrap();
    assert!(manager.is_scheduler_running());
    tokio::time::sleep(Duration::from_millis(1500)).await;
    assert!(manager.process("b").is_none());
}

#[tokio::test(start_paused = true)]
async fn test_zero_tick_interval_still_expires() {
    let manager = MemoryManager::builder()
        .with_total_memory(100)
        .with_tick_interval(Duration::ZERO)
        .build();
    assert_eq!(manager.tick_interval(), Duration::from_secs(1));

    manager
        .allocate(Process::new("p", 10, 1), Algorithm::FirstFit)
        .unwrap();
    tokio::time::sleep(Duration::from_secs(5)).await;

    assert!(manager.process("p").is_none());
    assert!(!manager.is_scheduler_running());
}
