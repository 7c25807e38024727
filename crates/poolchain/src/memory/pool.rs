//! # Pool Allocator
//!
//! Growable fixed-size slot allocator built from a chain of blocks.

use std::mem;

use super::block::Block;
use super::stats::PoolStats;
use crate::config::{PoolConfig, DEFAULT_LABEL};
use crate::error::{PoolError, PoolResult};

/// A growable pool allocator for same-typed objects.
///
/// Slots are bump-allocated from a chain of pre-allocated blocks. When the
/// active block runs out, the pool links another block of the same size,
/// preferring blocks retired by [`release`](Self::release) over new storage.
/// Growing never moves existing slots.
///
/// Slots are addressed through [`PoolHandle`]s. Every handle carries the
/// pool epoch it was issued in; [`release`](Self::release),
/// [`clear`](Self::clear) and [`reserve`](Self::reserve) advance the epoch,
/// so a handle kept across one of them resolves to nothing instead of to
/// whatever reuses its slot.
///
/// # Thread Safety
///
/// This pool is NOT thread-safe. Use one pool per thread or wrap in a mutex.
///
/// # Example
///
/// ```rust
/// use poolchain::PoolAllocator;
///
/// let mut pool: PoolAllocator<[f32; 3]> = PoolAllocator::with_capacity(4);
///
/// let handle = pool.insert([1.0, 2.0, 3.0]).unwrap();
/// assert_eq!(pool.get(handle), Some(&[1.0, 2.0, 3.0]));
///
/// // Hand every slot back without freeing storage.
/// pool.release();
/// assert_eq!(pool.get(handle), None);
/// ```
pub struct PoolAllocator<T> {
    /// Every block linked since the last clear, addressed by block id.
    blocks: Vec<Block<T>>,
    /// Block ids in allocation order. `chain[0]` is the head.
    chain: Vec<usize>,
    /// Position in `chain` of the block serving allocations.
    active: usize,
    /// Retired block ids. The top of the stack is reused first.
    free_chain: Vec<usize>,
    /// Slots in every block linked since the last clear.
    capacity: usize,
    /// Bumped whenever outstanding handles are invalidated.
    epoch: u32,
    /// Name used in log output.
    label: String,
}

/// Handle to a slot handed out by a [`PoolAllocator`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PoolHandle {
    /// Block id within the pool.
    block: usize,
    /// Slot index within the block.
    slot: usize,
    /// Pool epoch at issue time.
    epoch: u32,
}

impl PoolHandle {
    /// Returns the block id the slot lives in.
    #[inline]
    #[must_use]
    pub const fn block(self) -> usize {
        self.block
    }

    /// Returns the slot index within its block.
    #[inline]
    #[must_use]
    pub const fn slot(self) -> usize {
        self.slot
    }

    /// Returns the pool epoch this handle was issued in.
    #[inline]
    #[must_use]
    pub const fn epoch(self) -> u32 {
        self.epoch
    }
}

impl<T> Default for PoolAllocator<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> PoolAllocator<T> {
    /// Creates an unsized pool.
    ///
    /// No memory is allocated. [`allocate`](Self::allocate) returns None
    /// until the pool is given storage with [`reserve`](Self::reserve) or
    /// [`resize`](Self::resize).
    #[must_use]
    pub fn new() -> Self {
        Self::with_label(DEFAULT_LABEL)
    }

    /// Creates an unsized pool that tags its log output with `label`.
    #[must_use]
    pub fn with_label(label: impl Into<String>) -> Self {
        Self {
            blocks: Vec::new(),
            chain: Vec::new(),
            active: 0,
            free_chain: Vec::new(),
            capacity: 0,
            epoch: 0,
            label: label.into(),
        }
    }

    /// Returns the label used in log output.
    #[inline]
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Returns true if the pool has at least one block.
    #[inline]
    #[must_use]
    pub fn is_sized(&self) -> bool {
        !self.chain.is_empty()
    }

    /// Returns the total number of slots in every block linked since the
    /// last clear, whether or not the block is currently in use.
    #[inline]
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the number of bytes backing the pool.
    ///
    /// This is `capacity() * size_of::<T>()`, not the bytes in use.
    #[inline]
    #[must_use]
    pub const fn reserved_mem(&self) -> usize {
        self.capacity.saturating_mul(mem::size_of::<T>())
    }

    /// Returns the number of free slots in the active block.
    ///
    /// Blocks further down the chain or waiting in the free chain are not
    /// counted.
    #[inline]
    #[must_use]
    pub fn free_mem(&self) -> usize {
        self.active_block().map_or(0, Block::remaining)
    }

    /// Returns the number of slots handed out from the active block since
    /// the last release.
    #[inline]
    #[must_use]
    pub fn active_allocations(&self) -> usize {
        self.active_block().map_or(0, Block::cursor)
    }

    /// Returns a human-readable allocation count for the active block.
    #[must_use]
    pub fn dump_allocations(&self) -> String {
        format!("Number allocations = {}\n", self.active_allocations())
    }

    /// Returns the number of slots handed out across the chain since the
    /// last release.
    #[must_use]
    pub fn allocated_count(&self) -> usize {
        self.chain.iter().map(|&id| self.blocks[id].cursor()).sum()
    }

    /// Returns a snapshot of the pool's bookkeeping.
    #[must_use]
    pub fn stats(&self) -> PoolStats {
        PoolStats {
            capacity: self.capacity,
            reserved_bytes: self.reserved_mem(),
            free_in_active: self.free_mem(),
            allocations_in_active: self.active_allocations(),
            allocated: self.allocated_count(),
            linked_blocks: self.chain.len(),
            free_blocks: self.free_chain.len(),
            epoch: self.epoch,
        }
    }

    /// Hands every slot back to the pool without freeing storage.
    ///
    /// Every block's cursor is rewound, every block after the head moves to
    /// the free chain, and the head becomes active again. All outstanding
    /// handles become stale.
    pub fn release(&mut self) {
        if self.chain.is_empty() {
            return;
        }

        for &id in &self.chain {
            self.blocks[id].rewind();
        }

        // Pushed in reverse so the block right after the head is reused first.
        let retired = self.chain.len() - 1;
        self.free_chain.extend(self.chain.drain(1..).rev());
        self.active = 0;
        self.bump_epoch();

        tracing::trace!(
            "Pool '{}' released: {} blocks retired, {} free",
            self.label,
            retired,
            self.free_chain.len()
        );
    }

    /// Makes the head block active again.
    ///
    /// Cursors and the free chain are left alone, so this is only meaningful
    /// right after [`release`](Self::release) or when the caller knows no
    /// slot has been handed out since. Outstanding handles stay valid.
    pub fn reset(&mut self) {
        self.active = 0;
    }

    /// Drops every block and returns the pool to the unsized state.
    ///
    /// All storage is freed and all outstanding handles become stale.
    pub fn clear(&mut self) {
        if self.blocks.is_empty() {
            return;
        }

        tracing::debug!(
            "Pool '{}' cleared: {} blocks, {} bytes freed",
            self.label,
            self.blocks.len(),
            self.reserved_mem()
        );

        self.blocks.clear();
        self.chain.clear();
        self.free_chain.clear();
        self.active = 0;
        self.capacity = 0;
        self.bump_epoch();
    }

    /// Resolves a handle to its slot.
    ///
    /// Returns None if the handle is stale or does not address a slot handed
    /// out in the current epoch.
    #[inline]
    #[must_use]
    pub fn get(&self, handle: PoolHandle) -> Option<&T> {
        self.try_get(handle).ok()
    }

    /// Resolves a handle to its slot mutably.
    #[inline]
    pub fn get_mut(&mut self, handle: PoolHandle) -> Option<&mut T> {
        self.try_get_mut(handle).ok()
    }

    /// Resolves a handle to its slot, reporting why it failed.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::StaleHandle`] if the handle predates the last
    /// release, clear or reserve, and [`PoolError::InvalidHandle`] if it
    /// does not address a handed-out slot.
    pub fn try_get(&self, handle: PoolHandle) -> PoolResult<&T> {
        self.check_epoch(handle)?;
        self.blocks
            .get(handle.block)
            .and_then(|block| block.live().get(handle.slot))
            .ok_or(PoolError::InvalidHandle {
                block: handle.block,
                slot: handle.slot,
            })
    }

    /// Resolves a handle to its slot mutably, reporting why it failed.
    ///
    /// # Errors
    ///
    /// Same as [`try_get`](Self::try_get).
    pub fn try_get_mut(&mut self, handle: PoolHandle) -> PoolResult<&mut T> {
        self.check_epoch(handle)?;
        self.blocks
            .get_mut(handle.block)
            .and_then(|block| block.live_mut().get_mut(handle.slot))
            .ok_or(PoolError::InvalidHandle {
                block: handle.block,
                slot: handle.slot,
            })
    }

    /// Returns true if the handle resolves to a slot.
    #[inline]
    #[must_use]
    pub fn contains(&self, handle: PoolHandle) -> bool {
        self.try_get(handle).is_ok()
    }

    /// Iterates over every slot handed out since the last release, in
    /// chain order.
    pub fn iter(&self) -> impl Iterator<Item = (PoolHandle, &T)> {
        let blocks = &self.blocks;
        let epoch = self.epoch;
        self.chain.iter().flat_map(move |&block| {
            blocks[block]
                .live()
                .iter()
                .enumerate()
                .map(move |(slot, value)| (PoolHandle { block, slot, epoch }, value))
        })
    }

    #[inline]
    fn active_block(&self) -> Option<&Block<T>> {
        self.chain.get(self.active).map(|&id| &self.blocks[id])
    }

    #[inline]
    fn check_epoch(&self, handle: PoolHandle) -> PoolResult<()> {
        if handle.epoch == self.epoch {
            Ok(())
        } else {
            Err(PoolError::StaleHandle {
                handle_epoch: handle.epoch,
                pool_epoch: self.epoch,
            })
        }
    }

    #[inline]
    fn bump_epoch(&mut self) {
        self.epoch = self.epoch.wrapping_add(1);
    }
}

impl<T: Default> PoolAllocator<T> {
    /// Creates a pool with one block of `num_items` slots.
    ///
    /// A zero `num_items` creates an unsized pool.
    ///
    /// # Panics
    ///
    /// Panics if the block storage cannot be allocated.
    #[must_use]
    pub fn with_capacity(num_items: usize) -> Self {
        let mut pool = Self::new();
        pool.reserve(num_items);
        pool
    }

    /// Creates a pool from a [`PoolConfig`].
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::AllocationFailed`] if the first block cannot be
    /// allocated.
    pub fn from_config(config: &PoolConfig) -> PoolResult<Self> {
        let mut pool = Self::with_label(config.label.clone());
        pool.try_reserve(config.initial_capacity)?;
        Ok(pool)
    }

    /// Hands out one slot, reset to `T::default()`.
    ///
    /// If the active block is exhausted the pool grows by the active block's
    /// size first. Returns None if the pool is unsized.
    ///
    /// # Panics
    ///
    /// Panics if growing requires a new block and its storage cannot be
    /// allocated.
    pub fn allocate(&mut self) -> Option<PoolHandle> {
        match self.try_allocate() {
            Ok(handle) => Some(handle),
            Err(PoolError::Unsized) => None,
            Err(err) => fatal(&err),
        }
    }

    /// Hands out one slot and stores `value` in it.
    ///
    /// Returns None (dropping `value`) if the pool is unsized.
    ///
    /// # Panics
    ///
    /// Same as [`allocate`](Self::allocate).
    pub fn insert(&mut self, value: T) -> Option<PoolHandle> {
        let handle = self.allocate()?;
        self.blocks[handle.block].live_mut()[handle.slot] = value;
        Some(handle)
    }

    /// Hands out one slot, reporting failures as errors.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::Unsized`] if the pool has no blocks, and
    /// [`PoolError::AllocationFailed`] if growing fails.
    pub fn try_allocate(&mut self) -> PoolResult<PoolHandle> {
        if self.chain.is_empty() {
            return Err(PoolError::Unsized);
        }

        // Blocks are never empty, so growing by the active block's size
        // always ends on a block with a free slot.
        loop {
            let block = self.chain[self.active];
            if let Some(slot) = self.blocks[block].bump() {
                return Ok(PoolHandle {
                    block,
                    slot,
                    epoch: self.epoch,
                });
            }
            let increment = self.blocks[block].capacity();
            self.try_resize(increment)?;
        }
    }

    /// Drops every block and starts over with a single block of `size`
    /// slots. A zero `size` leaves the pool unsized.
    ///
    /// # Panics
    ///
    /// Panics if the block storage cannot be allocated.
    pub fn reserve(&mut self, size: usize) {
        if let Err(err) = self.try_reserve(size) {
            fatal(&err);
        }
    }

    /// Fallible version of [`reserve`](Self::reserve).
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::AllocationFailed`] if the block cannot be
    /// allocated. The pool is left unsized in that case.
    pub fn try_reserve(&mut self, size: usize) -> PoolResult<()> {
        self.clear();
        if size == 0 {
            return Ok(());
        }

        let id = self.link_new_block(size)?;
        self.chain.push(id);
        self.active = 0;

        tracing::debug!("Pool '{}' reserved {} slots", self.label, size);
        Ok(())
    }

    /// Moves allocation to a following block.
    ///
    /// Does nothing if the active block is larger than `grow_size` or
    /// `grow_size` is zero. Otherwise the next block is, in order of
    /// preference: the active block's existing successor, a block from the
    /// free chain, or a new block of `grow_size` slots. An unsized pool gets
    /// its first block.
    ///
    /// # Panics
    ///
    /// Panics if a new block is needed and its storage cannot be allocated.
    pub fn resize(&mut self, grow_size: usize) {
        if let Err(err) = self.try_resize(grow_size) {
            fatal(&err);
        }
    }

    /// Fallible version of [`resize`](Self::resize).
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::AllocationFailed`] if a new block cannot be
    /// allocated. The pool is left unchanged in that case.
    pub fn try_resize(&mut self, grow_size: usize) -> PoolResult<()> {
        if grow_size == 0 {
            return Ok(());
        }
        if self
            .active_block()
            .is_some_and(|block| grow_size < block.capacity())
        {
            return Ok(());
        }

        if self.chain.is_empty() {
            let id = self.link_new_block(grow_size)?;
            self.chain.push(id);
            self.active = 0;
            return Ok(());
        }

        // A successor only survives when reset() rewound past it.
        if self.active + 1 < self.chain.len() {
            self.active += 1;
            return Ok(());
        }

        let id = if let Some(id) = self.free_chain.pop() {
            tracing::trace!(
                "Pool '{}' relinked free block {} ({} slots)",
                self.label,
                id,
                self.blocks[id].capacity()
            );
            id
        } else {
            self.link_new_block(grow_size)?
        };
        self.chain.push(id);
        self.active = self.chain.len() - 1;
        Ok(())
    }

    /// Allocates a block, adds it to the block table and to the capacity.
    fn link_new_block(&mut self, size: usize) -> PoolResult<usize> {
        let block = Block::try_new(size)?;
        let id = self.blocks.len();
        self.blocks.push(block);
        self.capacity += size;

        tracing::debug!(
            "Pool '{}' allocated block {} ({} slots, capacity now {})",
            self.label,
            id,
            size,
            self.capacity
        );
        Ok(id)
    }
}

/// Block storage failures are not recoverable through the infallible API.
#[cold]
#[inline(never)]
fn fatal(err: &PoolError) -> ! {
    panic!("pool allocator: {err}");
}
