//! # Pool Statistics
//!
//! Point-in-time snapshot of a pool's bookkeeping.

use std::fmt;

/// Statistics for a [`PoolAllocator`](super::PoolAllocator).
///
/// The `*_in_active` fields only describe the block currently serving
/// allocations. Use `allocated` for the chain-wide count.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PoolStats {
    /// Slots in every block linked since the last clear.
    pub capacity: usize,
    /// Bytes backing those slots.
    pub reserved_bytes: usize,
    /// Free slots in the active block.
    pub free_in_active: usize,
    /// Slots handed out from the active block since the last release.
    pub allocations_in_active: usize,
    /// Slots handed out across the chain since the last release.
    pub allocated: usize,
    /// Blocks in the allocation chain.
    pub linked_blocks: usize,
    /// Retired blocks waiting for reuse.
    pub free_blocks: usize,
    /// Current handle epoch.
    pub epoch: u32,
}

impl fmt::Display for PoolStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "capacity={} reserved={}B allocated={} active={}/{} blocks={}+{} free epoch={}",
            self.capacity,
            self.reserved_bytes,
            self.allocated,
            self.allocations_in_active,
            self.allocations_in_active + self.free_in_active,
            self.linked_blocks,
            self.free_blocks,
            self.epoch
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_display() {
        let stats = PoolStats {
            capacity: 8,
            reserved_bytes: 32,
            free_in_active: 3,
            allocations_in_active: 1,
            allocated: 5,
            linked_blocks: 2,
            free_blocks: 0,
            epoch: 1,
        };
        assert_eq!(
            stats.to_string(),
            "capacity=8 reserved=32B allocated=5 active=1/4 blocks=2+0 free epoch=1"
        );
    }
}
