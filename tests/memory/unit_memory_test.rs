/*!
 * Memory Manager Tests
 * Allocation, deallocation, replacement and inspection
 */

use memsim::memory::{Allocator, MemoryInfo};
use memsim::{Algorithm, MemoryBlock, MemoryError, MemoryManager, Process};
use parking_lot::Mutex;
use pretty_assertions::assert_eq;
use std::sync::Arc;

fn manager(total: usize) -> MemoryManager {
    MemoryManager::builder()
        .with_total_memory(total)
        .with_manual_ticks()
        .build()
}

#[test]
fn test_memory_manager_initialization() {
    let mem_mgr = manager(1024);
    let (total, used, available) = mem_mgr.info();

    assert_eq!(total, 1024);
    assert_eq!(used, 0);
    assert_eq!(available, 1024);
    assert_eq!(mem_mgr.blocks(), vec![MemoryBlock::free(0, 1024, None)]);
    assert!(!mem_mgr.is_partitioned());
}

#[test]
fn test_first_allocation_splits_space() {
    let mem_mgr = manager(1024);

    let addr = mem_mgr
        .allocate(Process::new("P1", 300, 10), Algorithm::FirstFit)
        .unwrap();

    assert_eq!(addr, 0);
    assert_eq!(
        mem_mgr.blocks(),
        vec![
            MemoryBlock::used(0, 300, "P1".into(), None),
            MemoryBlock::free(300, 724, None),
        ]
    );
}

#[test]
fn test_oversized_allocation_leaves_state_unchanged() {
    let mem_mgr = manager(1024);
    mem_mgr
        .allocate(Process::new("P1", 300, 10), Algorithm::FirstFit)
        .unwrap();
    let before = mem_mgr.blocks();

    let result = mem_mgr.allocate(Process::new("P2", 800, 10), Algorithm::FirstFit);

    assert_eq!(
        result,
        Err(MemoryError::NoFit {
            requested: 800,
            algorithm: Algorithm::FirstFit,
            largest_free: 724,
        })
    );
    assert_eq!(mem_mgr.blocks(), before);
    assert!(mem_mgr.process("P2").is_none());
}

#[test]
fn test_invalid_process_rejected() {
    let mem_mgr = manager(100);
    assert!(matches!(
        mem_mgr.allocate(Process::new("zero", 0, 5), Algorithm::BestFit),
        Err(MemoryError::InvalidProcess { .. })
    ));
    assert!(mem_mgr
        .allocate(Process::new("forever", 10, 0), Algorithm::BestFit)
        .is_err());
    assert_eq!(mem_mgr.blocks(), vec![MemoryBlock::free(0, 100, None)]);
}

#[test]
fn test_deallocate_unknown_is_noop() {
    let mem_mgr = manager(1024);
    mem_mgr
        .allocate(Process::new("P1", 300, 10), Algorithm::FirstFit)
        .unwrap();
    let before = mem_mgr.blocks();

    assert_eq!(
        mem_mgr.deallocate("ghost"),
        Err(MemoryError::ProcessNotFound("ghost".into()))
    );
    mem_mgr.deallocate("P1").unwrap();
    assert!(mem_mgr.deallocate("P1").is_err());
    assert_ne!(mem_mgr.blocks(), before);
    assert_eq!(mem_mgr.blocks(), vec![MemoryBlock::free(0, 1024, None)]);
}

#[test]
fn test_reallocation_replaces_previous_block() {
    let mem_mgr = manager(1000);
    mem_mgr
        .allocate(Process::new("A", 100, 10), Algorithm::FirstFit)
        .unwrap();
    mem_mgr
        .allocate(Process::new("B", 100, 10), Algorithm::FirstFit)
        .unwrap();

    // A's old block is released before placement, so first-fit reuses it
    let addr = mem_mgr
        .allocate(Process::new("A", 50, 10), Algorithm::FirstFit)
        .unwrap();

    assert_eq!(addr, 0);
    let owned: Vec<_> = mem_mgr
        .blocks()
        .into_iter()
        .filter_map(|b| b.owner)
        .collect();
    assert_eq!(owned, vec!["A".to_string(), "B".to_string()]);
    assert_eq!(mem_mgr.processes().len(), 2);
    assert_eq!(mem_mgr.info().1, 150);
}

#[test]
fn test_failed_reallocation_keeps_old_block() {
    let mem_mgr = manager(100);
    mem_mgr
        .allocate(Process::new("A", 40, 10), Algorithm::FirstFit)
        .unwrap();
    let before = mem_mgr.blocks();

    assert!(mem_mgr
        .allocate(Process::new("A", 200, 10), Algorithm::FirstFit)
        .is_err());
    assert_eq!(mem_mgr.blocks(), before);
    assert_eq!(mem_mgr.process("A").map(|p| p.size), Some(40));
}

#[test]
fn test_reallocation_resets_elapsed_and_algorithm() {
    let mem_mgr = manager(100);
    mem_mgr
        .allocate(Process::new("A", 10, 5), Algorithm::FirstFit)
        .unwrap();
    mem_mgr.tick();
    assert_eq!(mem_mgr.process("A").unwrap().elapsed, 1);

    mem_mgr
        .allocate(Process::new("A", 10, 5), Algorithm::WorstFit)
        .unwrap();
    let process = mem_mgr.process("A").unwrap();
    assert_eq!(process.elapsed, 0);
    assert_eq!(process.algorithm, Some(Algorithm::WorstFit));
}

#[test]
fn test_clear_all() {
    let mem_mgr = manager(500);
    for name in ["a", "b", "c"] {
        mem_mgr
            .allocate(Process::new(name, 100, 5), Algorithm::FirstFit)
            .unwrap();
    }

    mem_mgr.clear_all();

    assert_eq!(mem_mgr.blocks(), vec![MemoryBlock::free(0, 500, None)]);
    assert!(mem_mgr.processes().is_empty());
    assert!(!mem_mgr.is_scheduler_running());
}

#[test]
fn test_stats() {
    let mem_mgr = manager(1000);
    mem_mgr
        .allocate(Process::new("a", 100, 5), Algorithm::FirstFit)
        .unwrap();
    mem_mgr
        .allocate(Process::new("b", 400, 5), Algorithm::FirstFit)
        .unwrap();
    mem_mgr
        .allocate(Process::new("c", 100, 5), Algorithm::FirstFit)
        .unwrap();
    mem_mgr.deallocate("b").unwrap();

    let stats = mem_mgr.stats();
    assert_eq!(stats.used_memory, 200);
    assert_eq!(stats.free_memory, 800);
    assert_eq!(stats.allocated_blocks, 2);
    assert_eq!(stats.free_blocks, 2);
    assert_eq!(stats.largest_free_block, 400);
    assert!((stats.fragmentation - 0.5).abs() < f64::EPSILON);
    assert!((stats.usage_percentage - 20.0).abs() < f64::EPSILON);
}

#[test]
fn test_block_observer_sees_every_mutation() {
    let mem_mgr = manager(100);
    let snapshots = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&snapshots);
    mem_mgr.on_blocks_changed(move |blocks| sink.lock().push(blocks.to_vec()));

    mem_mgr
        .allocate(Process::new("a", 30, 5), Algorithm::FirstFit)
        .unwrap();
    let _ = mem_mgr.deallocate("missing");
    mem_mgr.deallocate("a").unwrap();

    let snapshots = snapshots.lock();
    assert_eq!(snapshots.len(), 2);
    assert_eq!(snapshots[0].len(), 2);
    assert_eq!(snapshots[1], vec![MemoryBlock::free(0, 100, None)]);
}

#[test]
fn test_observer_may_reenter_manager() {
    let mem_mgr = manager(100);
    let seen = Arc::new(Mutex::new(Vec::new()));

    let observer_mgr = mem_mgr.clone();
    let sink = Arc::clone(&seen);
    mem_mgr.on_blocks_changed(move |_| {
        sink.lock().push(observer_mgr.info().1);
    });

    mem_mgr
        .allocate(Process::new("a", 30, 5), Algorithm::FirstFit)
        .unwrap();
    assert_eq!(*seen.lock(), vec![30]);
}

#[test]
fn test_trait_objects() {
    fn fill(allocator: &dyn Allocator, names: &[&str]) -> usize {
        names
            .iter()
            .filter(|name| {
                allocator
                    .allocate(Process::new(**name, 40, 3), Algorithm::BestFit)
                    .is_ok()
            })
            .count()
    }

    let mem_mgr = manager(100);
    assert_eq!(fill(&mem_mgr, &["a", "b", "c"]), 2);
    assert_eq!(MemoryInfo::info(&mem_mgr), (100, 80, 20));
    assert_eq!(Allocator::process_partition(&mem_mgr, "a"), None);
}
