/*!
 * Core Types
 * Common types used across the simulator
 */

/// Process ID type
pub type Pid = u32;

/// Address type for memory operations (offset into simulated RAM)
pub type Address = usize;

/// Size type for memory operations
pub type Size = usize;

/// Priority level (lower value = more urgent)
pub type Priority = i32;

/// Discrete simulated time unit
pub type Tick = u64;

/// Common result type for simulator operations
pub type SimResult<T> = Result<T, super::errors::SimulatorError>;
