//! # Pool Block
//!
//! One fixed-capacity run of same-typed slots with a bump cursor.

use std::mem;

use crate::error::{PoolError, PoolResult};

/// A contiguous array of slots plus the index of the next free one.
///
/// Storage is allocated once in [`Block::try_new`] and never resized.
/// Slots below `cursor` have been handed out since the last rewind.
pub(crate) struct Block<T> {
    /// The slot array.
    storage: Box<[T]>,
    /// Next free slot, `0..=storage.len()`.
    cursor: usize,
}

impl<T: Default> Block<T> {
    /// Allocates a block of `capacity` default-initialized slots.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::AllocationFailed`] if the storage cannot be reserved.
    pub(crate) fn try_new(capacity: usize) -> PoolResult<Self> {
        let mut storage = Vec::new();
        storage
            .try_reserve_exact(capacity)
            .map_err(|_| PoolError::AllocationFailed {
                slots: capacity,
                bytes: capacity.saturating_mul(mem::size_of::<T>()),
            })?;
        storage.resize_with(capacity, T::default);

        Ok(Self {
            storage: storage.into_boxed_slice(),
            cursor: 0,
        })
    }

    /// Hands out the next slot, resetting its contents.
    ///
    /// Returns the slot index, or None if the block is exhausted.
    #[inline]
    pub(crate) fn bump(&mut self) -> Option<usize> {
        let slot = self.cursor;
        *self.storage.get_mut(slot)? = T::default();
        self.cursor += 1;
        Some(slot)
    }
}

impl<T> Block<T> {
    /// Number of slots in this block.
    #[inline]
    pub(crate) fn capacity(&self) -> usize {
        self.storage.len()
    }

    /// Number of slots handed out since the last rewind.
    #[inline]
    pub(crate) const fn cursor(&self) -> usize {
        self.cursor
    }

    /// Number of slots not yet handed out.
    #[inline]
    pub(crate) fn remaining(&self) -> usize {
        self.capacity() - self.cursor
    }

    /// Makes every slot available again. Contents are left in place.
    #[inline]
    pub(crate) fn rewind(&mut self) {
        self.cursor = 0;
    }

    /// The slots handed out since the last rewind.
    #[inline]
    pub(crate) fn live(&self) -> &[T] {
        &self.storage[..self.cursor]
    }

    /// Mutable view of the slots handed out since the last rewind.
    #[inline]
    pub(crate) fn live_mut(&mut self) -> &mut [T] {
        &mut self.storage[..self.cursor]
    }
}
