/*!
 * Error Types
 * Centralized error handling with thiserror and serde support
 */

use serde::{Deserialize, Serialize};
use thiserror::Error;

// Re-export domain errors
pub use crate::memory::MemoryError;
pub use crate::process::ProcessError;

/// Top-level simulator error
///
/// An error escaping `Coordinator::execute_cycle` means an internal
/// invariant was violated, not a recoverable runtime condition.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "error_type", content = "details", rename_all = "snake_case")]
pub enum SimulatorError {
    #[error(transparent)]
    Process(#[from] ProcessError),

    #[error(transparent)]
    Memory(#[from] MemoryError),
}
