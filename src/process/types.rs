/*!
 * Process Types
 * The simulated process control block and its lifecycle states
 */

use crate::core::types::{Address, Pid, Priority, Size, Tick};
use crate::display::Color;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Process operation result
pub type ProcessResult<T> = Result<T, ProcessError>;

/// Process errors
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "error_type", content = "details", rename_all = "snake_case")]
pub enum ProcessError {
    #[error("Invalid process parameters: size={size}, burst={burst} (both must be positive)")]
    InvalidParameters { size: Size, burst: Tick },

    #[error("Process not found: {0}")]
    NotFound(Pid),

    #[error("Invalid state transition for process {pid}: {from:?} -> {to:?}")]
    InvalidStateTransition {
        pid: Pid,
        from: ProcessState,
        to: ProcessState,
    },
}

/// Process lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessState {
    /// Created but not yet admitted to memory
    New,
    /// In memory, waiting for the CPU
    Ready,
    /// Currently holding the CPU
    Running,
    /// Waiting for a simulated I/O operation
    Blocked,
    /// Finished; retained for inspection only
    Terminated,
}

/// Process control block
///
/// Complete state of one simulated process. Queue membership is tracked
/// by the process table, never by the PCB itself.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct Pcb {
    pub pid: Pid,
    /// Requested memory size
    pub size: Size,
    pub burst_total: Tick,
    /// Remaining CPU time; the process terminates when this reaches zero
    pub burst_remaining: Tick,
    /// Lower value = more urgent
    pub priority: Priority,
    pub state: ProcessState,
    /// Base address of the allocated memory block, once admitted
    pub base_address: Option<Address>,
    /// Ticks left in the current I/O wait (meaningful only while Blocked)
    pub io_remaining: Tick,
    /// Program counter, incremented once per executed tick (cosmetic)
    pub pc: u64,
    /// Display attribute; opaque to the simulation
    pub color: Color,
}

impl Pcb {
    /// Build a PCB in the NEW state. Normally created through the
    /// process table, which assigns the pid.
    pub fn new(pid: Pid, size: Size, burst: Tick, priority: Priority, color: Color) -> Self {
        Self {
            pid,
            size,
            burst_total: burst,
            burst_remaining: burst,
            priority,
            state: ProcessState::New,
            base_address: None,
            io_remaining: 0,
            pc: 0,
            color,
        }
    }

    /// Check if process has terminated
    #[inline]
    #[must_use]
    pub const fn is_terminated(&self) -> bool {
        matches!(self.state, ProcessState::Terminated)
    }

    /// Check if process is waiting for the CPU
    #[inline]
    #[must_use]
    pub const fn is_ready(&self) -> bool {
        matches!(self.state, ProcessState::Ready)
    }
}
