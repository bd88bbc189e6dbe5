//! LRU TTL Cache - A concurrent in-memory key/value cache
//!
//! Bounded-capacity cache with least-recently-used eviction, optional
//! per-entry TTL expiration, and a background sweeper that drops expired
//! entries nobody reads.

pub mod cache;
pub mod config;
pub mod error;
pub mod tasks;

pub use cache::{Cache, CacheStats};
pub use config::CacheConfig;
pub use error::{CacheError, Result};
