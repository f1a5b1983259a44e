/*!
 * Coordinator
 * Sequences one simulated time unit across every subsystem
 */

use crate::core::types::{Pid, Priority, SimResult, Size, Tick};
use crate::cpu::{Cpu, TickOutcome};
use crate::dispatcher::Dispatcher;
use crate::display::{DisplayProvider, Palette};
use crate::memory::{MemoryBlock, MemoryManager, MemoryResult, MemoryStats, PlacementStrategy};
use crate::process::{Pcb, ProcessResult, ProcessState, ProcessTable};
use crate::scheduler::{GanttEntry, Scheduler, SchedulerStats, SchedulingPolicy, DEFAULT_QUANTUM};
use log::info;
use serde::Serialize;
use std::fmt;

/// Default simulated memory size, in allocation units
pub const DEFAULT_MEMORY_SIZE: Size = 1024;

/// One observable event of a simulation cycle.
///
/// The ordered event list returned by [`Coordinator::execute_cycle`] is
/// the sole contract with any presentation layer; `Display` renders the
/// human-readable description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", content = "details", rename_all = "snake_case")]
pub enum Event {
    /// A NEW process obtained memory and joined the READY queue
    Admitted { pid: Pid },
    /// A BLOCKED process finished its I/O wait
    IoReturned { pid: Pid },
    /// The running process consumed its last burst tick
    Terminated { pid: Pid },
    /// The running process exhausted its Round Robin quantum
    QuantumExpired { pid: Pid },
    /// The running process blocked on simulated I/O
    IoBlocked { pid: Pid, duration: Tick },
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Admitted { pid } => write!(f, "P{} loaded into RAM", pid),
            Self::IoReturned { pid } => write!(f, "P{} returned from I/O", pid),
            Self::Terminated { pid } => write!(f, "P{} terminated", pid),
            Self::QuantumExpired { pid } => write!(f, "[RR] quantum expired for P{}", pid),
            Self::IoBlocked { pid, duration } => {
                write!(f, "P{} blocked on I/O for {} ticks", pid, duration)
            }
        }
    }
}

/// Builder for [`Coordinator`]
pub struct CoordinatorBuilder {
    memory_size: Size,
    policy: SchedulingPolicy,
    quantum: u32,
    strategy: PlacementStrategy,
    seed: Option<u64>,
    display: Option<Box<dyn DisplayProvider>>,
}

impl CoordinatorBuilder {
    pub fn new() -> Self {
        Self {
            memory_size: DEFAULT_MEMORY_SIZE,
            policy: SchedulingPolicy::RoundRobin,
            quantum: DEFAULT_QUANTUM,
            strategy: PlacementStrategy::FirstFit,
            seed: None,
            display: None,
        }
    }

    pub fn with_memory_size(mut self, size: Size) -> Self {
        self.memory_size = size;
        self
    }

    pub fn with_policy(mut self, policy: SchedulingPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_quantum(mut self, quantum: u32) -> Self {
        self.quantum = quantum;
        self
    }

    pub fn with_strategy(mut self, strategy: PlacementStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Fix the random seed for reproducible runs
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_display_provider(mut self, display: Box<dyn DisplayProvider>) -> Self {
        self.display = Some(display);
        self
    }

    pub fn build(self) -> SimResult<Coordinator> {
        let memory = MemoryManager::new(self.memory_size, self.strategy)?;
        let cpu = match self.seed {
            Some(seed) => Cpu::with_seed(seed),
            None => Cpu::new(),
        };
        info!(
            "Coordinator initialized: memory={}, policy={}, quantum={}, strategy={}",
            self.memory_size,
            self.policy.as_str(),
            self.quantum,
            self.strategy.as_str()
        );
        Ok(Coordinator {
            cpu,
            table: ProcessTable::new(),
            memory,
            scheduler: Scheduler::new(self.policy, self.quantum),
            dispatcher: Dispatcher::new(),
            display: self.display.unwrap_or_else(|| Box::new(Palette)),
        })
    }
}

impl Default for CoordinatorBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// System coordinator
///
/// Owns every subsystem and is the single entry point: one call to
/// [`execute_cycle`](Self::execute_cycle) advances virtual time by
/// exactly one tick. All four phases complete before the call returns;
/// callers must not interleave mutations between phases.
pub struct Coordinator {
    cpu: Cpu,
    table: ProcessTable,
    memory: MemoryManager,
    scheduler: Scheduler,
    dispatcher: Dispatcher,
    display: Box<dyn DisplayProvider>,
}

impl Coordinator {
    pub fn builder() -> CoordinatorBuilder {
        CoordinatorBuilder::new()
    }

    /// Create a process in the NEW queue.
    ///
    /// Rejected before any queue mutation when size or burst is zero.
    /// The display attribute is assigned here and never consulted again
    /// by the simulation.
    pub fn create_process(
        &mut self,
        size: Size,
        burst: Tick,
        priority: Priority,
    ) -> ProcessResult<Pcb> {
        let color = self.display.color_for(self.table.next_pid());
        self.table.create(size, burst, priority, color)
    }

    /// Run one full tick: admission, I/O completion, execution, dispatch.
    ///
    /// Each phase iterates over a snapshot of its queue taken at phase
    /// start, so processes admitted or returned within a phase are not
    /// re-processed in the same cycle. An `Err` here means an internal
    /// invariant was violated.
    pub fn execute_cycle(&mut self) -> SimResult<Vec<Event>> {
        let mut events = Vec::new();

        // Phase 1: admission. NEW processes obtain memory in creation
        // order; the ones that don't fit stay in NEW and retry next tick.
        for pid in self.table.new_ids() {
            if self.memory.allocate(self.table.get_mut(pid)?) {
                self.table.admit(pid)?;
                events.push(Event::Admitted { pid });
            }
        }

        // Phase 2: I/O completion
        for pid in self.table.blocked_ids() {
            let pcb = self.table.get_mut(pid)?;
            pcb.io_remaining = pcb.io_remaining.saturating_sub(1);
            if pcb.io_remaining == 0 {
                self.table.unblock(pid)?;
                events.push(Event::IoReturned { pid });
            }
        }

        // Phase 3: execution
        if let Some(pid) = self.table.running() {
            let policy = self.scheduler.policy();
            let quantum = self.scheduler.quantum();
            let counter = self.scheduler.quantum_counter();

            let result = self
                .cpu
                .step(self.table.get_mut(pid)?, policy, quantum, counter);
            self.scheduler.record(self.table.get(pid)?);
            if policy.is_preemptive() {
                self.scheduler.set_quantum_counter(result.quantum_counter);
            }

            match result.outcome {
                TickOutcome::Terminated => {
                    self.memory.free(pid)?;
                    self.table.terminate(pid)?;
                    events.push(Event::Terminated { pid });
                }
                TickOutcome::QuantumExpired => {
                    self.dispatcher
                        .release(&mut self.table, pid, ProcessState::Ready)?;
                    self.scheduler.reset_quantum();
                    self.scheduler.count_preemption();
                    events.push(Event::QuantumExpired { pid });
                }
                TickOutcome::BlockedIo { duration } => {
                    self.table.block(pid, duration)?;
                    events.push(Event::IoBlocked { pid, duration });
                }
                TickOutcome::Continue => {}
            }
        }

        // Phase 4: dispatch
        if self.table.running().is_none() && !self.table.ready_is_empty() {
            if let Some(next) = self.scheduler.select_next(&mut self.table) {
                self.dispatcher.dispatch(&mut self.table, next)?;
                self.scheduler.reset_quantum();
                self.scheduler.count_dispatch();
            }
        }

        Ok(events)
    }

    pub fn set_policy(&mut self, policy: SchedulingPolicy) {
        self.scheduler.set_policy(policy);
    }

    pub fn set_strategy(&mut self, strategy: PlacementStrategy) {
        self.memory.set_strategy(strategy);
    }

    /// Set the Round Robin quantum; any positive value is accepted
    pub fn set_quantum(&mut self, quantum: u32) {
        self.scheduler.set_quantum(quantum);
    }

    /// Destructive reset with a new memory size.
    ///
    /// Atomically clears the memory map, every process queue, the
    /// running slot, the tick counter, the quantum counter, and the
    /// execution history. Validation happens before any mutation, so a
    /// failed resize leaves the system untouched.
    pub fn resize_memory(&mut self, new_total: Size) -> MemoryResult<()> {
        self.memory.reset(new_total)?;
        self.table.reset();
        self.cpu.reset();
        self.scheduler.clear_history();
        self.scheduler.reset_quantum();
        self.scheduler.reset_counters();
        info!("System reset: memory resized to {} units", new_total);
        Ok(())
    }

    /// Full reset keeping the current memory size
    pub fn reset(&mut self) -> MemoryResult<()> {
        self.resize_memory(self.memory.total())
    }

    /// The memory map in address order
    #[must_use]
    pub fn memory_layout(&self) -> &[MemoryBlock] {
        self.memory.layout()
    }

    /// All non-terminated processes
    #[must_use]
    pub fn active_processes(&self) -> Vec<Pcb> {
        self.table.snapshot_active()
    }

    /// The Gantt log since the last reset
    #[must_use]
    pub fn execution_history(&self) -> &[GanttEntry] {
        self.scheduler.history()
    }

    #[must_use]
    pub fn memory_stats(&self) -> MemoryStats {
        self.memory.stats()
    }

    #[must_use]
    pub fn scheduler_stats(&self) -> SchedulerStats {
        self.scheduler.stats()
    }

    /// Ticks executed since the last reset
    #[must_use]
    pub fn tick_count(&self) -> Tick {
        self.cpu.tick_count()
    }

    /// Pid currently holding the CPU, if any
    #[must_use]
    pub fn running(&self) -> Option<Pid> {
        self.table.running()
    }

    #[must_use]
    pub fn policy(&self) -> SchedulingPolicy {
        self.scheduler.policy()
    }

    #[must_use]
    pub fn strategy(&self) -> PlacementStrategy {
        self.memory.strategy()
    }

    #[must_use]
    pub fn quantum(&self) -> u32 {
        self.scheduler.quantum()
    }

    /// Direct table access for inspection
    #[must_use]
    pub fn table(&self) -> &ProcessTable {
        &self.table
    }
}
