//! Cache Module
//!
//! Generic in-process cache with per-entry TTL and an approximate
//! evict-soonest-to-expire policy.

mod entry;
mod stats;
mod store;


use std::time::Duration;

use crate::context::Context;
use crate::error::CacheError;

// Re-export public types
pub use entry::{CacheEntry, Expiry};
pub use stats::CacheStats;
pub use store::{InMemoryCache, SweepReport};

// == Public Constants ==
/// TTL marking an entry as never expiring.
pub const NO_EXPIRATION: Duration = Duration::ZERO;

// == Cache Contract ==
/// Contract shared by cache implementations.
///
/// Every call checks the context first and fails without touching the
/// store when it is already done.
pub trait Cache<K, V>: Send + Sync {
    /// Returns a clone of the value stored under `key`.
    fn get(&self, ctx: &Context, key: &K) -> Result<V, CacheError>;

    /// Stores `value` under `key`; a `ttl` of [`NO_EXPIRATION`] never expires.
    fn set(&self, ctx: &Context, key: K, value: V, ttl: Duration) -> Result<(), CacheError>;

    /// Removes `key`. Removing an absent key succeeds.
    fn delete(&self, ctx: &Context, key: &K) -> Result<(), CacheError>;
}

impl<K, V, C> Cache<K, V> for std::sync::Arc<C>
where
    C: Cache<K, V> + ?Sized,
{
    fn get(&self, ctx: &Context, key: &K) -> Result<V, CacheError> {
        (**self).get(ctx, key)
    }

    fn set(&self, ctx: &Context, key: K, value: V, ttl: Duration) -> Result<(), CacheError> {
        (**self).set(ctx, key, value, ttl)
    }

    fn delete(&self, ctx: &Context, key: &K) -> Result<(), CacheError> {
        (**self).delete(ctx, key)
    }
}
