//! # Pool Error Types
//!
//! All errors that can occur while sizing, growing or resolving a pool.

use thiserror::Error;

/// Errors that can occur in the pool allocator.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PoolError {
    /// The allocator has no blocks yet (or was cleared).
    #[error("pool is unsized: reserve or resize it before allocating")]
    Unsized,

    /// The handle was issued before the last release, clear or reserve.
    #[error("stale handle: issued in epoch {handle_epoch}, pool is at epoch {pool_epoch}")]
    StaleHandle {
        /// Epoch stamped into the handle.
        handle_epoch: u32,
        /// Current epoch of the pool.
        pool_epoch: u32,
    },

    /// The handle does not address a slot that has been handed out.
    #[error("invalid handle: block {block}, slot {slot} is not allocated")]
    InvalidHandle {
        /// Block index carried by the handle.
        block: usize,
        /// Slot index carried by the handle.
        slot: usize,
    },

    /// The backing storage for a new block could not be allocated.
    #[error("failed to allocate block of {slots} slots ({bytes} bytes)")]
    AllocationFailed {
        /// Requested slot count.
        slots: usize,
        /// Requested size in bytes.
        bytes: usize,
    },

    /// Invalid configuration file.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for pool operations.
pub type PoolResult<T> = Result<T, PoolError>;
