//! Background Tasks Module
//!
//! Contains background tasks that run for the lifetime of a cache.
//!
//! # Tasks
//! - Expiry Sweeper: Removes expired cache entries at the configured interval

mod sweeper;

pub use sweeper::{spawn_sweeper, sweep_expired, SweeperHandle};
