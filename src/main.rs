/*!
 * SimOS - Main Entry Point
 *
 * Demo driver that seeds a small workload and runs the simulation to
 * completion, printing the per-tick event log and final snapshots.
 */

use log::info;
use simos_kernel::{Coordinator, PlacementStrategy, SchedulingPolicy};
use std::error::Error;

/// Demo workload: (size, burst, priority)
const WORKLOAD: [(usize, u64, i32); 5] = [
    (128, 9, 2),
    (256, 5, 1),
    (64, 12, 3),
    (512, 7, 0),
    (384, 4, 2),
];

const MAX_TICKS: u64 = 500;

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let mut builder = Coordinator::builder()
        .with_policy(SchedulingPolicy::RoundRobin)
        .with_strategy(PlacementStrategy::FirstFit);
    if let Ok(seed) = std::env::var("SIMOS_SEED") {
        builder = builder.with_seed(seed.parse()?);
    }
    let mut coordinator = builder.build()?;

    info!("SimOS starting");
    for (size, burst, priority) in WORKLOAD {
        let pcb = coordinator.create_process(size, burst, priority)?;
        info!(
            "Queued P{} (size: {}, burst: {}, priority: {})",
            pcb.pid, size, burst, priority
        );
    }

    let mut tick = 0u64;
    while !coordinator.active_processes().is_empty() && tick < MAX_TICKS {
        tick += 1;
        for event in coordinator.execute_cycle()? {
            println!("[tick {:>3}] {}", tick, event);
        }
    }

    println!();
    println!("Executed {} ticks", coordinator.tick_count());
    println!(
        "Execution history:\n{}",
        serde_json::to_string_pretty(coordinator.execution_history())?
    );
    println!(
        "Memory map:\n{}",
        serde_json::to_string_pretty(coordinator.memory_layout())?
    );
    println!(
        "Memory stats:\n{}",
        serde_json::to_string_pretty(&coordinator.memory_stats())?
    );
    println!(
        "Scheduler stats:\n{}",
        serde_json::to_string_pretty(&coordinator.scheduler_stats())?
    );

    Ok(())
}
