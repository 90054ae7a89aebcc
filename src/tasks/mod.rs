//! Background Tasks Module
//!
//! Contains background tasks that run periodically while a cache is alive.
//!
//! # Tasks
//! - Cache cleanup: expires and evicts entries at a configured interval

mod cleanup;

pub use cleanup::{spawn_cleanup_task, Sweep, MIN_CLEANUP_INTERVAL};
