/*!
 * Dispatcher
 * The only component that moves processes into and out of the running slot
 */

use crate::core::types::Pid;
use crate::process::{ProcessError, ProcessResult, ProcessState, ProcessTable};
use log::debug;

/// Dispatcher
///
/// Stateless; all queue state lives in the process table. A precondition
/// failure here is a coordinator-logic defect and propagates as an error.
#[derive(Debug, Default)]
pub struct Dispatcher;

impl Dispatcher {
    pub fn new() -> Self {
        Self
    }

    /// Give the CPU to a READY process
    pub fn dispatch(&self, table: &mut ProcessTable, pid: Pid) -> ProcessResult<()> {
        let pcb = table.get(pid)?;
        if pcb.state != ProcessState::Ready {
            return Err(ProcessError::InvalidStateTransition {
                pid,
                from: pcb.state,
                to: ProcessState::Running,
            });
        }
        table.remove_ready(pid);
        table.get_mut(pid)?.state = ProcessState::Running;
        table.set_running(Some(pid));
        debug!("Process {} dispatched", pid);
        Ok(())
    }

    /// Take the CPU away from the running process.
    ///
    /// A process released back to READY rejoins at the queue tail.
    pub fn release(
        &self,
        table: &mut ProcessTable,
        pid: Pid,
        new_state: ProcessState,
    ) -> ProcessResult<()> {
        if table.running() != Some(pid) {
            let from = table.get(pid).map(|p| p.state).unwrap_or(ProcessState::New);
            return Err(ProcessError::InvalidStateTransition {
                pid,
                from,
                to: new_state,
            });
        }
        let pcb = table.get_mut(pid)?;
        pcb.state = new_state;
        if new_state == ProcessState::Ready {
            table.push_ready(pid);
        }
        table.set_running(None);
        debug!("Process {} released as {:?}", pid, new_state);
        Ok(())
    }
}
