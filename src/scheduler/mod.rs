/*!
 * Scheduler Module
 * Ready-queue selection policies, quantum accounting, and the Gantt log
 */

pub mod types;

use crate::process::{Pcb, ProcessTable};
use crate::core::types::Pid;
use log::{debug, info};

// Re-export public API
pub use types::{GanttEntry, SchedulerStats, SchedulingPolicy};

/// Default Round Robin quantum, in ticks
pub const DEFAULT_QUANTUM: u32 = 3;

/// CPU scheduler
///
/// Stateless per selection call apart from quantum accounting and the
/// execution history.
#[derive(Debug)]
pub struct Scheduler {
    policy: SchedulingPolicy,
    quantum: u32,
    quantum_counter: u32,
    history: Vec<GanttEntry>,
    dispatches: u64,
    preemptions: u64,
}

impl Scheduler {
    pub fn new(policy: SchedulingPolicy, quantum: u32) -> Self {
        info!(
            "Scheduler initialized: policy={}, quantum={}",
            policy.as_str(),
            quantum
        );
        Self {
            policy,
            quantum,
            quantum_counter: 0,
            history: Vec::new(),
            dispatches: 0,
            preemptions: 0,
        }
    }

    /// Select the next process to run.
    ///
    /// FCFS and Round Robin take the queue head unchanged; rotation
    /// emerges from tail-requeueing alone. SJF and Priority stably sort
    /// the ready queue first: a persistent reorder, not a peek.
    pub fn select_next(&mut self, table: &mut ProcessTable) -> Option<Pid> {
        match self.policy {
            SchedulingPolicy::Fcfs | SchedulingPolicy::RoundRobin => {}
            SchedulingPolicy::Sjf => table.sort_ready_by_key(|p| p.burst_remaining),
            SchedulingPolicy::Priority => table.sort_ready_by_key(|p| p.priority),
        }
        let next = table.ready_head();
        if let Some(pid) = next {
            debug!("Selected process {} ({})", pid, self.policy.as_str());
        }
        next
    }

    /// Append one executed tick to the Gantt log, extending the last
    /// entry when the same process keeps the CPU
    pub fn record(&mut self, pcb: &Pcb) {
        match self.history.last_mut() {
            Some(last) if last.pid == pcb.pid => last.duration += 1,
            _ => self.history.push(GanttEntry {
                pid: pcb.pid,
                duration: 1,
                color: pcb.color,
            }),
        }
    }

    #[inline]
    #[must_use]
    pub fn policy(&self) -> SchedulingPolicy {
        self.policy
    }

    pub fn set_policy(&mut self, policy: SchedulingPolicy) {
        if policy != self.policy {
            info!(
                "Scheduling policy changed from {} to {}",
                self.policy.as_str(),
                policy.as_str()
            );
            self.policy = policy;
        }
    }

    #[inline]
    #[must_use]
    pub fn quantum(&self) -> u32 {
        self.quantum
    }

    /// Set the Round Robin quantum. Any positive value is accepted; zero
    /// is ignored with a warning.
    pub fn set_quantum(&mut self, quantum: u32) {
        if quantum == 0 {
            log::warn!("Ignoring zero quantum; keeping {}", self.quantum);
            return;
        }
        info!("Quantum changed to {}", quantum);
        self.quantum = quantum;
    }

    #[inline]
    #[must_use]
    pub fn quantum_counter(&self) -> u32 {
        self.quantum_counter
    }

    pub(crate) fn set_quantum_counter(&mut self, counter: u32) {
        self.quantum_counter = counter;
    }

    pub fn reset_quantum(&mut self) {
        self.quantum_counter = 0;
    }

    #[must_use]
    pub fn quantum_expired(&self) -> bool {
        self.quantum_counter >= self.quantum
    }

    /// The execution history since the last reset
    #[inline]
    #[must_use]
    pub fn history(&self) -> &[GanttEntry] {
        &self.history
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    pub(crate) fn count_dispatch(&mut self) {
        self.dispatches += 1;
    }

    pub(crate) fn count_preemption(&mut self) {
        self.preemptions += 1;
    }

    pub(crate) fn reset_counters(&mut self) {
        self.dispatches = 0;
        self.preemptions = 0;
    }

    #[must_use]
    pub fn stats(&self) -> SchedulerStats {
        SchedulerStats {
            dispatches: self.dispatches,
            preemptions: self.preemptions,
            policy: self.policy,
            quantum: self.quantum,
        }
    }
}
