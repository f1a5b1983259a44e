/*!
 * Memory Types
 * Block map entries, placement strategies, and memory statistics
 */

use crate::core::types::{Address, Pid, Size};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Memory operation result
pub type MemoryResult<T> = Result<T, MemoryError>;

/// Memory errors
///
/// Running out of free blocks is NOT an error; `allocate` reports it as
/// ordinary backpressure and the caller retries on a later tick.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "error_type", content = "details", rename_all = "snake_case")]
pub enum MemoryError {
    #[error("Invalid memory capacity: {0} (must be positive)")]
    InvalidCapacity(Size),

    #[error("No occupied block owned by process {0}")]
    OwnerNotFound(Pid),
}

/// Memory block state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockState {
    Free,
    Occupied,
}

/// One entry of the memory map
///
/// The map is kept sorted by start address, contiguous, and
/// non-overlapping; block sizes always sum to total capacity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct MemoryBlock {
    pub start: Address,
    pub size: Size,
    pub state: BlockState,
    /// Owning process, present iff the block is occupied
    pub owner: Option<Pid>,
}

impl MemoryBlock {
    pub(crate) fn free(start: Address, size: Size) -> Self {
        Self {
            start,
            size,
            state: BlockState::Free,
            owner: None,
        }
    }

    pub(crate) fn occupied(start: Address, size: Size, owner: Pid) -> Self {
        Self {
            start,
            size,
            state: BlockState::Occupied,
            owner: Some(owner),
        }
    }

    #[inline]
    #[must_use]
    pub const fn is_free(&self) -> bool {
        matches!(self.state, BlockState::Free)
    }
}

/// Placement strategy for contiguous allocation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlacementStrategy {
    /// First sufficient block in address order
    FirstFit,
    /// Smallest sufficient block; address order breaks ties
    BestFit,
    /// Largest sufficient block; address order breaks ties
    WorstFit,
}

impl PlacementStrategy {
    /// Parse from string representation
    pub fn from_str(s: &str) -> Result<Self, String> {
        match s.to_lowercase().replace([' ', '-'], "_").as_str() {
            "first_fit" | "firstfit" | "first" => Ok(Self::FirstFit),
            "best_fit" | "bestfit" | "best" => Ok(Self::BestFit),
            "worst_fit" | "worstfit" | "worst" => Ok(Self::WorstFit),
            _ => Err(format!(
                "Invalid strategy '{}'. Valid: first_fit, best_fit, worst_fit",
                s
            )),
        }
    }

    /// Convert to string representation
    #[inline]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::FirstFit => "first_fit",
            Self::BestFit => "best_fit",
            Self::WorstFit => "worst_fit",
        }
    }
}

impl Serialize for PlacementStrategy {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for PlacementStrategy {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::from_str(&s).map_err(serde::de::Error::custom)
    }
}

/// Memory statistics snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct MemoryStats {
    pub total_memory: Size,
    pub used_memory: Size,
    pub free_memory: Size,
    pub usage_percentage: f64,
    pub total_blocks: usize,
    pub free_blocks: usize,
}
