/*!
 * Process Table
 * Owns the lifecycle queues and the single running slot
 */

use super::types::{Pcb, ProcessError, ProcessResult, ProcessState};
use crate::core::types::{Pid, Priority, Size, Tick};
use crate::display::Color;
use log::{debug, info};
use std::collections::{HashMap, VecDeque};

/// Process table
///
/// PCBs are indexed by pid; each queue is an ordered sequence of pids.
/// A process is a member of exactly one queue (or the running slot) at
/// any time. Terminated processes are retained for inspection and never
/// physically removed during a session.
#[derive(Debug)]
pub struct ProcessTable {
    pcbs: HashMap<Pid, Pcb>,
    new_queue: VecDeque<Pid>,
    ready_queue: VecDeque<Pid>,
    blocked_queue: VecDeque<Pid>,
    terminated_queue: VecDeque<Pid>,
    running: Option<Pid>,
    next_pid: Pid,
}

impl ProcessTable {
    pub fn new() -> Self {
        Self {
            pcbs: HashMap::new(),
            new_queue: VecDeque::new(),
            ready_queue: VecDeque::new(),
            blocked_queue: VecDeque::new(),
            terminated_queue: VecDeque::new(),
            running: None,
            next_pid: 1,
        }
    }

    /// Pid the next created process will receive. Pids are monotonically
    /// increasing and never reused within a session.
    #[inline]
    #[must_use]
    pub fn next_pid(&self) -> Pid {
        self.next_pid
    }

    /// Create a process in the NEW queue
    pub fn create(
        &mut self,
        size: Size,
        burst: Tick,
        priority: Priority,
        color: Color,
    ) -> ProcessResult<Pcb> {
        if size == 0 || burst == 0 {
            return Err(ProcessError::InvalidParameters { size, burst });
        }

        let pid = self.next_pid;
        self.next_pid += 1;

        let pcb = Pcb::new(pid, size, burst, priority, color);
        self.pcbs.insert(pid, pcb.clone());
        self.new_queue.push_back(pid);

        info!(
            "Process {} created (size: {}, burst: {}, priority: {})",
            pid, size, burst, priority
        );
        Ok(pcb)
    }

    /// Admit a NEW process to the tail of the READY queue
    pub fn admit(&mut self, pid: Pid) -> ProcessResult<()> {
        let pcb = self.get_mut(pid)?;
        if pcb.state != ProcessState::New {
            return Err(ProcessError::InvalidStateTransition {
                pid,
                from: pcb.state,
                to: ProcessState::Ready,
            });
        }
        pcb.state = ProcessState::Ready;
        self.new_queue.retain(|&p| p != pid);
        self.ready_queue.push_back(pid);
        debug!("Process {} admitted to ready queue", pid);
        Ok(())
    }

    /// Move the running process to the BLOCKED queue for `duration` ticks
    pub fn block(&mut self, pid: Pid, duration: Tick) -> ProcessResult<()> {
        if self.running != Some(pid) {
            let from = self.get(pid).map(|p| p.state).unwrap_or(ProcessState::New);
            return Err(ProcessError::InvalidStateTransition {
                pid,
                from,
                to: ProcessState::Blocked,
            });
        }
        let pcb = self.get_mut(pid)?;
        pcb.state = ProcessState::Blocked;
        pcb.io_remaining = duration;
        self.blocked_queue.push_back(pid);
        self.running = None;
        debug!("Process {} blocked for {} ticks", pid, duration);
        Ok(())
    }

    /// Return a BLOCKED process to the tail of the READY queue
    pub fn unblock(&mut self, pid: Pid) -> ProcessResult<()> {
        let pcb = self.get_mut(pid)?;
        if pcb.state != ProcessState::Blocked {
            return Err(ProcessError::InvalidStateTransition {
                pid,
                from: pcb.state,
                to: ProcessState::Ready,
            });
        }
        pcb.state = ProcessState::Ready;
        self.blocked_queue.retain(|&p| p != pid);
        self.ready_queue.push_back(pid);
        debug!("Process {} unblocked", pid);
        Ok(())
    }

    /// Terminate a process from any non-terminal state.
    ///
    /// Removes it from whichever queue or slot holds it and appends it to
    /// the TERMINATED queue. A second call is a no-op.
    pub fn terminate(&mut self, pid: Pid) -> ProcessResult<()> {
        let pcb = self.get_mut(pid)?;
        if pcb.state == ProcessState::Terminated {
            return Ok(());
        }
        pcb.state = ProcessState::Terminated;

        self.new_queue.retain(|&p| p != pid);
        self.ready_queue.retain(|&p| p != pid);
        self.blocked_queue.retain(|&p| p != pid);
        if self.running == Some(pid) {
            self.running = None;
        }
        self.terminated_queue.push_back(pid);

        info!("Process {} terminated", pid);
        Ok(())
    }

    /// All non-terminated processes, for inspection
    #[must_use]
    pub fn snapshot_active(&self) -> Vec<Pcb> {
        let mut active: Vec<Pcb> = self
            .pcbs
            .values()
            .filter(|p| !p.is_terminated())
            .cloned()
            .collect();
        active.sort_by_key(|p| p.pid);
        active
    }

    pub fn get(&self, pid: Pid) -> ProcessResult<&Pcb> {
        self.pcbs.get(&pid).ok_or(ProcessError::NotFound(pid))
    }

    pub(crate) fn get_mut(&mut self, pid: Pid) -> ProcessResult<&mut Pcb> {
        self.pcbs.get_mut(&pid).ok_or(ProcessError::NotFound(pid))
    }

    /// Pid currently holding the CPU, if any
    #[inline]
    #[must_use]
    pub fn running(&self) -> Option<Pid> {
        self.running
    }

    /// Snapshot of the NEW queue in creation order
    #[must_use]
    pub fn new_ids(&self) -> Vec<Pid> {
        self.new_queue.iter().copied().collect()
    }

    /// Snapshot of the BLOCKED queue in blocking order
    #[must_use]
    pub fn blocked_ids(&self) -> Vec<Pid> {
        self.blocked_queue.iter().copied().collect()
    }

    /// Snapshot of the READY queue in dispatch order
    #[must_use]
    pub fn ready_ids(&self) -> Vec<Pid> {
        self.ready_queue.iter().copied().collect()
    }

    /// Snapshot of the TERMINATED queue in completion order
    #[must_use]
    pub fn terminated_ids(&self) -> Vec<Pid> {
        self.terminated_queue.iter().copied().collect()
    }

    #[inline]
    #[must_use]
    pub fn ready_is_empty(&self) -> bool {
        self.ready_queue.is_empty()
    }

    pub(crate) fn ready_head(&self) -> Option<Pid> {
        self.ready_queue.front().copied()
    }

    /// Stable in-place reorder of the READY queue by a PCB-derived key
    pub(crate) fn sort_ready_by_key<K, F>(&mut self, mut key: F)
    where
        K: Ord,
        F: FnMut(&Pcb) -> K,
    {
        let mut ids: Vec<Pid> = self.ready_queue.drain(..).collect();
        let pcbs = &self.pcbs;
        ids.sort_by_key(|pid| pcbs.get(pid).map(&mut key));
        self.ready_queue.extend(ids);
    }

    pub(crate) fn remove_ready(&mut self, pid: Pid) {
        self.ready_queue.retain(|&p| p != pid);
    }

    pub(crate) fn push_ready(&mut self, pid: Pid) {
        self.ready_queue.push_back(pid);
    }

    pub(crate) fn set_running(&mut self, pid: Option<Pid>) {
        self.running = pid;
    }

    /// Discard every process and restart pid numbering
    pub fn reset(&mut self) {
        self.pcbs.clear();
        self.new_queue.clear();
        self.ready_queue.clear();
        self.blocked_queue.clear();
        self.terminated_queue.clear();
        self.running = None;
        self.next_pid = 1;
        info!("Process table reset");
    }
}

impl Default for ProcessTable {
    fn default() -> Self {
        Self::new()
    }
}
