/*!
 * CPU Tick Executor
 * Advances one process by one time unit and classifies the outcome
 */

use crate::core::types::Tick;
use crate::process::Pcb;
use crate::scheduler::SchedulingPolicy;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

/// Per-tick probability that a non-preemptive process blocks on I/O
pub const IO_BLOCK_PROBABILITY: f64 = 0.01;

/// Bounds (inclusive) of the uniformly drawn I/O wait, in ticks
pub const IO_BLOCK_MIN: Tick = 5;
pub const IO_BLOCK_MAX: Tick = 20;

/// Classification of one executed tick. Exactly one outcome is produced
/// per call; termination supersedes a simultaneous quantum expiry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "details", rename_all = "snake_case")]
pub enum TickOutcome {
    /// The process keeps the CPU next tick
    Continue,
    /// Remaining burst reached zero
    Terminated,
    /// Round Robin quantum exhausted
    QuantumExpired,
    /// The process blocked on simulated I/O
    BlockedIo { duration: Tick },
}

/// Result of one executed tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickResult {
    pub outcome: TickOutcome,
    /// Updated quantum counter (advances only under Round Robin)
    pub quantum_counter: u32,
}

/// CPU
///
/// Counts executed ticks and owns the random source for the I/O-block
/// model. Seed it for reproducible runs.
#[derive(Debug)]
pub struct Cpu {
    tick_count: Tick,
    rng: StdRng,
}

impl Cpu {
    pub fn new() -> Self {
        Self {
            tick_count: 0,
            rng: StdRng::from_entropy(),
        }
    }

    /// CPU with a fixed seed, for deterministic simulations
    pub fn with_seed(seed: u64) -> Self {
        Self {
            tick_count: 0,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Execute one tick of `pcb`.
    ///
    /// Decrements the remaining burst, advances the program counter, and
    /// classifies what happened. Only Round Robin consumes quantum; the
    /// other policies instead sample the I/O-block model.
    pub fn step(
        &mut self,
        pcb: &mut Pcb,
        policy: SchedulingPolicy,
        quantum: u32,
        quantum_counter: u32,
    ) -> TickResult {
        self.tick_count += 1;
        pcb.pc += 1;
        pcb.burst_remaining = pcb.burst_remaining.saturating_sub(1);

        if pcb.burst_remaining == 0 {
            return TickResult {
                outcome: TickOutcome::Terminated,
                quantum_counter,
            };
        }

        if policy.is_preemptive() {
            let counter = quantum_counter + 1;
            let outcome = if counter >= quantum {
                TickOutcome::QuantumExpired
            } else {
                TickOutcome::Continue
            };
            return TickResult {
                outcome,
                quantum_counter: counter,
            };
        }

        if self.rng.gen_bool(IO_BLOCK_PROBABILITY) {
            let duration = self.rng.gen_range(IO_BLOCK_MIN..=IO_BLOCK_MAX);
            return TickResult {
                outcome: TickOutcome::BlockedIo { duration },
                quantum_counter,
            };
        }

        TickResult {
            outcome: TickOutcome::Continue,
            quantum_counter,
        }
    }

    /// Total ticks executed since the last reset
    #[inline]
    #[must_use]
    pub fn tick_count(&self) -> Tick {
        self.tick_count
    }

    pub fn reset(&mut self) {
        self.tick_count = 0;
    }
}

impl Default for Cpu {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pcb(burst: Tick) -> Pcb {
        Pcb::new(1, 16, burst, 0, "#00d4ff")
    }

    #[test]
    fn test_step_advances_pc_and_burst() {
        let mut cpu = Cpu::with_seed(1);
        let mut p = pcb(10);
        let result = cpu.step(&mut p, SchedulingPolicy::RoundRobin, 3, 0);
        assert_eq!(p.pc, 1);
        assert_eq!(p.burst_remaining, 9);
        assert_eq!(result.outcome, TickOutcome::Continue);
        assert_eq!(result.quantum_counter, 1);
        assert_eq!(cpu.tick_count(), 1);
    }

    #[test]
    fn test_termination_at_zero_burst() {
        let mut cpu = Cpu::with_seed(1);
        let mut p = pcb(1);
        let result = cpu.step(&mut p, SchedulingPolicy::Fcfs, 3, 0);
        assert_eq!(result.outcome, TickOutcome::Terminated);
    }

    #[test]
    fn test_termination_supersedes_quantum_expiry() {
        let mut cpu = Cpu::with_seed(1);
        let mut p = pcb(1);
        // The same tick would also exhaust the quantum
        let result = cpu.step(&mut p, SchedulingPolicy::RoundRobin, 3, 2);
        assert_eq!(result.outcome, TickOutcome::Terminated);
        assert_eq!(result.quantum_counter, 2);
    }

    #[test]
    fn test_quantum_expires_at_configured_length() {
        let mut cpu = Cpu::with_seed(1);
        let mut p = pcb(100);
        let mut counter = 0;
        let r1 = cpu.step(&mut p, SchedulingPolicy::RoundRobin, 3, counter);
        counter = r1.quantum_counter;
        assert_eq!(r1.outcome, TickOutcome::Continue);
        let r2 = cpu.step(&mut p, SchedulingPolicy::RoundRobin, 3, counter);
        counter = r2.quantum_counter;
        assert_eq!(r2.outcome, TickOutcome::Continue);
        let r3 = cpu.step(&mut p, SchedulingPolicy::RoundRobin, 3, counter);
        assert_eq!(r3.outcome, TickOutcome::QuantumExpired);
        assert_eq!(r3.quantum_counter, 3);
    }

    #[test]
    fn test_round_robin_never_blocks_on_io() {
        let mut cpu = Cpu::with_seed(7);
        let mut p = pcb(100_000);
        for _ in 0..10_000 {
            let result = cpu.step(&mut p, SchedulingPolicy::RoundRobin, u32::MAX, 0);
            assert!(!matches!(result.outcome, TickOutcome::BlockedIo { .. }));
        }
    }

    #[test]
    fn test_io_block_durations_within_bounds() {
        let mut cpu = Cpu::with_seed(42);
        let mut p = pcb(1_000_000);
        let mut blocks = 0u32;
        for _ in 0..10_000 {
            if let TickOutcome::BlockedIo { duration } =
                cpu.step(&mut p, SchedulingPolicy::Fcfs, 3, 0).outcome
            {
                assert!((IO_BLOCK_MIN..=IO_BLOCK_MAX).contains(&duration));
                blocks += 1;
            }
        }
        // 1% per tick over 10k ticks; generous bounds around the mean
        assert!(blocks > 40, "suspiciously few I/O blocks: {}", blocks);
        assert!(blocks < 250, "suspiciously many I/O blocks: {}", blocks);
    }

    #[test]
    fn test_same_seed_reproduces_outcomes() {
        let run = |seed| {
            let mut cpu = Cpu::with_seed(seed);
            let mut p = pcb(100_000);
            (0..2_000)
                .map(|_| cpu.step(&mut p, SchedulingPolicy::Sjf, 3, 0).outcome)
                .collect::<Vec<_>>()
        };
        assert_eq!(run(99), run(99));
    }

    #[test]
    fn test_reset_clears_tick_count() {
        let mut cpu = Cpu::with_seed(1);
        let mut p = pcb(10);
        cpu.step(&mut p, SchedulingPolicy::Fcfs, 3, 0);
        cpu.reset();
        assert_eq!(cpu.tick_count(), 0);
    }
}
