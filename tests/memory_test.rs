/*!
 * Memory Manager Integration Tests
 * Property-based invariants over arbitrary allocate/free sequences
 */

use proptest::prelude::*;
use simos_kernel::{MemoryManager, Pcb, PlacementStrategy};

const CAPACITY: usize = 256;

fn pcb(pid: u32, size: usize) -> Pcb {
    Pcb::new(pid, size, 10, 0, "#00d4ff")
}

fn assert_invariants(mm: &MemoryManager) {
    let layout = mm.layout();
    let total: usize = layout.iter().map(|b| b.size).sum();
    assert_eq!(total, CAPACITY, "block sizes must sum to capacity");
    let mut expected_start = 0;
    for block in layout {
        assert_eq!(block.start, expected_start, "blocks must be contiguous");
        assert!(block.size > 0);
        assert_eq!(block.owner.is_some(), !block.is_free());
        expected_start += block.size;
    }
}

fn assert_no_adjacent_free(mm: &MemoryManager) {
    assert!(
        mm.layout()
            .windows(2)
            .all(|w| !(w[0].is_free() && w[1].is_free())),
        "adjacent free blocks after coalescing"
    );
}

fn strategy(idx: u8) -> PlacementStrategy {
    match idx % 3 {
        0 => PlacementStrategy::FirstFit,
        1 => PlacementStrategy::BestFit,
        _ => PlacementStrategy::WorstFit,
    }
}

proptest! {
    /// Any interleaving of allocations and frees preserves the map
    /// invariants, and draining every owner restores one free block.
    #[test]
    fn map_invariants_hold_under_any_op_sequence(
        ops in prop::collection::vec((0u8..3, 1usize..=96), 1..48),
        strategy_idx in 0u8..3,
    ) {
        let mut mm = MemoryManager::new(CAPACITY, strategy(strategy_idx)).unwrap();
        let mut live: Vec<u32> = Vec::new();
        let mut next_pid = 1u32;

        for (op, size) in ops {
            match op {
                0 => {
                    let mut p = pcb(next_pid, size);
                    if mm.allocate(&mut p) {
                        prop_assert!(p.base_address.is_some());
                        live.push(next_pid);
                        next_pid += 1;
                    }
                }
                1 => {
                    if !live.is_empty() {
                        let pid = live.remove(0);
                        mm.free(pid).unwrap();
                        assert_no_adjacent_free(&mm);
                    }
                }
                _ => {
                    if let Some(pid) = live.pop() {
                        mm.free(pid).unwrap();
                        assert_no_adjacent_free(&mm);
                    }
                }
            }
            assert_invariants(&mm);
        }

        for pid in live {
            mm.free(pid).unwrap();
        }
        prop_assert_eq!(mm.layout().len(), 1);
        prop_assert!(mm.layout()[0].is_free());
    }

    /// An allocation that fits always lands inside a block that was free
    /// and large enough; one that doesn't fit changes nothing.
    #[test]
    fn allocation_respects_candidates(
        sizes in prop::collection::vec(1usize..=128, 1..12),
    ) {
        let mut mm = MemoryManager::new(CAPACITY, PlacementStrategy::BestFit).unwrap();
        for (i, size) in sizes.iter().enumerate() {
            let before = mm.layout().to_vec();
            let had_candidate = !mm.candidates(*size).is_empty();
            let mut p = pcb(i as u32 + 1, *size);
            let placed = mm.allocate(&mut p);
            prop_assert_eq!(placed, had_candidate);
            if !placed {
                prop_assert_eq!(mm.layout(), &before[..]);
            }
            assert_invariants(&mm);
        }
    }
}

#[test]
fn test_strategies_disagree_on_fragmented_map() {
    // Free holes of 100, 60, and 90 units separated by occupied stubs
    let build = |strategy| {
        let mut mm = MemoryManager::new(CAPACITY, PlacementStrategy::FirstFit).unwrap();
        for (pid, size) in [(1, 100), (2, 3), (3, 60), (4, 3), (5, 90)] {
            let mut p = pcb(pid, size);
            assert!(mm.allocate(&mut p));
        }
        for pid in [1, 3, 5] {
            mm.free(pid).unwrap();
        }
        mm.set_strategy(strategy);
        mm
    };

    let mut first = build(PlacementStrategy::FirstFit);
    let mut best = build(PlacementStrategy::BestFit);
    let mut worst = build(PlacementStrategy::WorstFit);

    let mut a = pcb(9, 40);
    let mut b = pcb(9, 40);
    let mut c = pcb(9, 40);
    assert!(first.allocate(&mut a));
    assert!(best.allocate(&mut b));
    assert!(worst.allocate(&mut c));

    assert_eq!(a.base_address, Some(0)); // address-first hole (100)
    assert_eq!(b.base_address, Some(103)); // smallest hole (60)
    assert_eq!(c.base_address, Some(166)); // largest hole (90)
}
