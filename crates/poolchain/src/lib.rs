//! # Poolchain
//!
//! Growable fixed-chunk pool allocator for hot paths:
//! - O(1) bump allocation from pre-allocated blocks
//! - Growth appends blocks, existing slots never move
//! - Non-destructive release recycles every block
//!
//! ## Architecture Rules
//!
//! 1. **Every slot in a pool has the same type** - one element type per pool
//! 2. **Handles, not pointers** - slots are resolved through the pool and
//!    handles from before a release/clear are detected as stale
//! 3. **Single owner** - no internal locking; synchronize externally
//!
//! ## Example
//!
//! ```rust
//! use poolchain::PoolAllocator;
//!
//! let mut pool: PoolAllocator<u64> = PoolAllocator::with_capacity(4);
//! for i in 0..5 {
//!     pool.insert(i).unwrap();
//! }
//! // The fifth slot came from a second block of the same size.
//! assert_eq!(pool.capacity(), 8);
//! assert_eq!(pool.free_mem(), 3);
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod config;
pub mod error;
pub mod memory;

pub use config::PoolConfig;
pub use error::{PoolError, PoolResult};
pub use memory::{PoolAllocator, PoolHandle, PoolStats};
