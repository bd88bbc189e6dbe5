//! Error types for the cache
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

// == Cache Error Enum ==
/// Errors raised while constructing a cache.
///
/// Runtime operations never fail: misses and absent removals are reported
/// through `Option` and `bool` return values.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// Capacity must be at least one entry
    #[error("Invalid capacity: {0} (must be greater than zero)")]
    InvalidCapacity(usize),

    /// Sweep interval must be non-zero
    #[error("Invalid sweep interval: must be greater than zero")]
    InvalidSweepInterval,

    /// No tokio runtime available to host the expiry sweeper
    #[error("No tokio runtime available to start the expiry sweeper")]
    NoRuntime,
}

// == Result Type Alias ==
/// Convenience Result type for the cache.
pub type Result<T> = std::result::Result<T, CacheError>;
