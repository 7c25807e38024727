//! # Memory Management
//!
//! Block-chained pool allocation for same-typed objects.
//!
//! ## Design Philosophy
//!
//! Storage is allocated a block at a time and kept until the pool is
//! cleared:
//! - No per-object heap allocations
//! - Growth links a block, never moves existing slots
//! - Released blocks are recycled before new storage is requested

mod block;
mod pool;
mod stats;

pub use pool::{PoolAllocator, PoolHandle};
pub use stats::PoolStats;
