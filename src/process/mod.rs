/*!
 * Process Module
 * Process control blocks, lifecycle queues, and state transitions
 */

pub mod table;
pub mod types;

// Re-export public API
pub use table::ProcessTable;
pub use types::{Pcb, ProcessError, ProcessResult, ProcessState};
