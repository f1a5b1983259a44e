/*!
 * Memory Manager
 * Contiguous allocation over an address-ordered block map
 */

use super::types::{BlockState, MemoryBlock, MemoryError, MemoryResult, MemoryStats, PlacementStrategy};
use crate::core::types::{Pid, Size};
use crate::process::Pcb;
use log::{debug, info};
use std::cmp::Reverse;

/// Memory manager
///
/// Owns the block map: sorted by start address, contiguous,
/// non-overlapping, sizes summing to total capacity.
#[derive(Debug)]
pub struct MemoryManager {
    total: Size,
    blocks: Vec<MemoryBlock>,
    strategy: PlacementStrategy,
}

impl MemoryManager {
    pub fn new(total: Size, strategy: PlacementStrategy) -> MemoryResult<Self> {
        if total == 0 {
            return Err(MemoryError::InvalidCapacity(total));
        }
        info!(
            "Memory manager initialized: {} units, strategy {}",
            total,
            strategy.as_str()
        );
        Ok(Self {
            total,
            blocks: vec![MemoryBlock::free(0, total)],
            strategy,
        })
    }

    /// Indices (into `layout`) of every free block that can hold `size`,
    /// in address order
    #[must_use]
    pub fn candidates(&self, size: Size) -> Vec<usize> {
        self.blocks
            .iter()
            .enumerate()
            .filter(|(_, b)| b.is_free() && b.size >= size)
            .map(|(i, _)| i)
            .collect()
    }

    /// Try to place the process, splitting the chosen block if it is
    /// larger than the request.
    ///
    /// Returns false when no free block is large enough; that is
    /// backpressure, not an error, and the caller retries next tick. On
    /// success the process's base address is set to the block start.
    pub fn allocate(&mut self, pcb: &mut Pcb) -> bool {
        let size = pcb.size;
        let candidates = self.candidates(size);
        if candidates.is_empty() {
            debug!(
                "Allocation deferred for process {}: no free block of {} units",
                pcb.pid, size
            );
            return false;
        }

        // Ties break toward the lower address in every strategy
        let idx = match self.strategy {
            PlacementStrategy::FirstFit => candidates[0],
            PlacementStrategy::BestFit => candidates
                .iter()
                .copied()
                .min_by_key(|&i| self.blocks[i].size)
                .unwrap_or(candidates[0]),
            PlacementStrategy::WorstFit => candidates
                .iter()
                .copied()
                .max_by_key(|&i| (self.blocks[i].size, Reverse(i)))
                .unwrap_or(candidates[0]),
        };

        let block = &mut self.blocks[idx];
        let start = block.start;
        if block.size > size {
            // Split: the occupied head takes exactly the request, the
            // remainder stays free and advances its start
            block.start += size;
            block.size -= size;
            self.blocks.insert(idx, MemoryBlock::occupied(start, size, pcb.pid));
        } else {
            block.state = BlockState::Occupied;
            block.owner = Some(pcb.pid);
        }

        pcb.base_address = Some(start);
        debug!(
            "Allocated {} units at {} for process {} ({})",
            size,
            start,
            pcb.pid,
            self.strategy.as_str()
        );
        true
    }

    /// Free the block owned by `pid` and coalesce adjacent free blocks.
    ///
    /// A missing owner indicates a coordinator-logic defect, not a
    /// recoverable condition.
    pub fn free(&mut self, pid: Pid) -> MemoryResult<()> {
        let block = self
            .blocks
            .iter_mut()
            .find(|b| b.owner == Some(pid))
            .ok_or(MemoryError::OwnerNotFound(pid))?;
        block.state = BlockState::Free;
        block.owner = None;
        debug!("Freed memory of process {}", pid);
        self.compact();
        Ok(())
    }

    /// Merge every run of consecutive free blocks in one left-to-right
    /// scan. After this pass no two adjacent blocks are both free.
    pub fn compact(&mut self) {
        let mut i = 0;
        while i + 1 < self.blocks.len() {
            if self.blocks[i].is_free() && self.blocks[i + 1].is_free() {
                self.blocks[i].size += self.blocks[i + 1].size;
                self.blocks.remove(i + 1);
            } else {
                i += 1;
            }
        }
    }

    /// Discard the map and replace it with one free block of `new_total`
    pub fn reset(&mut self, new_total: Size) -> MemoryResult<()> {
        if new_total == 0 {
            return Err(MemoryError::InvalidCapacity(new_total));
        }
        self.total = new_total;
        self.blocks = vec![MemoryBlock::free(0, new_total)];
        info!("Memory reset to {} units", new_total);
        Ok(())
    }

    /// The block map in address order
    #[inline]
    #[must_use]
    pub fn layout(&self) -> &[MemoryBlock] {
        &self.blocks
    }

    #[inline]
    #[must_use]
    pub fn total(&self) -> Size {
        self.total
    }

    #[inline]
    #[must_use]
    pub fn strategy(&self) -> PlacementStrategy {
        self.strategy
    }

    pub fn set_strategy(&mut self, strategy: PlacementStrategy) {
        info!("Placement strategy changed to {}", strategy.as_str());
        self.strategy = strategy;
    }

    /// Usage statistics derived from the block map
    #[must_use]
    pub fn stats(&self) -> MemoryStats {
        let used: Size = self
            .blocks
            .iter()
            .filter(|b| !b.is_free())
            .map(|b| b.size)
            .sum();
        let free_blocks = self.blocks.iter().filter(|b| b.is_free()).count();
        MemoryStats {
            total_memory: self.total,
            used_memory: used,
            free_memory: self.total - used,
            usage_percentage: (used as f64 / self.total as f64) * 100.0,
            total_blocks: self.blocks.len(),
            free_blocks,
        }
    }
}
