//! # Adapters Layer (Hexagonal Architecture)
//!
//! Decorators over the outbound ports.

mod block_cache;

pub use block_cache::CachedBlockSource;
