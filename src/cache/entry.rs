//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with TTL support.

use std::time::Duration;

use tokio::time::Instant;

use crate::cache::NO_EXPIRATION;

// == Expiry ==
/// Point in time after which an entry is no longer served.
///
/// Variant order matters: `Never` sorts before every `At`, so the derived
/// `Ord` treats never-expiring entries as the soonest when the cache has to
/// make room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Expiry {
    Never,
    At(Instant),
}

impl Expiry {
    /// Computes the expiry of an entry written at `now` with `ttl`.
    ///
    /// A TTL too large to represent as an instant never expires.
    pub fn after(now: Instant, ttl: Duration) -> Self {
        if ttl == NO_EXPIRATION {
            return Expiry::Never;
        }
        now.checked_add(ttl).map_or(Expiry::Never, Expiry::At)
    }

    /// An entry is expired once `now` reaches its expiry instant.
    pub fn is_expired_at(&self, now: Instant) -> bool {
        match self {
            Expiry::At(at) => now >= *at,
            Expiry::Never => false,
        }
    }
}

// == Cache Entry ==
/// A cached value with its expiry.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    pub value: V,
    pub expires_at: Expiry,
}

impl<V> CacheEntry<V> {
    pub fn new(value: V, ttl: Duration) -> Self {
        Self::new_at(value, ttl, Instant::now())
    }

    pub fn new_at(value: V, ttl: Duration, now: Instant) -> Self {
        Self {
            value,
            expires_at: Expiry::after(now, ttl),
        }
    }

    pub fn is_expired(&self) -> bool {
        self.expires_at.is_expired_at(Instant::now())
    }

    // == Time To Live ==
    /// Returns the remaining lifetime, or None if the entry never expires.
    ///
    /// Expired entries report `Some(Duration::ZERO)`.
    pub fn ttl_remaining(&self) -> Option<Duration> {
        match self.expires_at {
            Expiry::At(at) => Some(at.saturating_duration_since(Instant::now())),
            Expiry::Never => None,
        }
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_no_expiration() {
        let entry = CacheEntry::new("value", NO_EXPIRATION);

        assert_eq!(entry.expires_at, Expiry::Never);
        assert!(!entry.is_expired());
        assert!(entry.ttl_remaining().is_none());
    }

    #[test]
    fn test_entry_with_ttl() {
        let entry = CacheEntry::new("value", Duration::from_secs(60));

        assert!(matches!(entry.expires_at, Expiry::At(_)));
        assert!(!entry.is_expired());
        assert!(entry.ttl_remaining().unwrap() <= Duration::from_secs(60));
    }

    #[tokio::test(start_paused = true)]
    async fn test_entry_expiration() {
        let entry = CacheEntry::new("value", Duration::from_secs(1));
        assert!(!entry.is_expired());

        tokio::time::advance(Duration::from_millis(1100)).await;

        assert!(entry.is_expired());
        assert_eq!(entry.ttl_remaining(), Some(Duration::ZERO));
    }

    #[test]
    fn test_expiration_boundary_condition() {
        let now = Instant::now();
        let entry = CacheEntry::new_at("value", Duration::from_secs(5), now);

        assert!(!entry.expires_at.is_expired_at(now + Duration::from_millis(4999)));
        assert!(entry.expires_at.is_expired_at(now + Duration::from_secs(5)));
    }

    #[test]
    fn test_never_sorts_before_any_instant() {
        let now = Instant::now();
        let far = Expiry::At(now + Duration::from_secs(86_400 * 365));

        assert!(Expiry::At(now) < far);
        assert!(Expiry::Never < Expiry::At(now));
    }

    #[test]
    fn test_huge_ttl_never_expires() {
        let now = Instant::now();

        assert_eq!(Expiry::after(now, Duration::MAX), Expiry::Never);
        assert!(!Expiry::after(now, Duration::MAX).is_expired_at(now));
    }
}
