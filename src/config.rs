//! Configuration Module
//!
//! Handles loading and managing service configuration from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Service configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Maximum number of orders the cache can hold
    pub max_entries: usize,
    /// TTL in seconds for orders written into the cache
    pub cache_ttl: u64,
    /// Background cleanup task interval in seconds
    pub cleanup_interval: u64,
    /// HTTP server port
    pub server_port: u16,
    /// Deadline in seconds applied to every request
    pub request_timeout: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `MAX_ENTRIES` - Maximum cache entries (default: 10000)
    /// - `CACHE_TTL` - Cached order TTL in seconds (default: 60)
    /// - `CLEANUP_INTERVAL` - Cleanup frequency in seconds (default: 60)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `REQUEST_TIMEOUT` - Per-request deadline in seconds (default: 10)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            max_entries: var_or("MAX_ENTRIES", defaults.max_entries),
            cache_ttl: var_or("CACHE_TTL", defaults.cache_ttl),
            cleanup_interval: var_or("CLEANUP_INTERVAL", defaults.cleanup_interval),
            server_port: var_or("SERVER_PORT", defaults.server_port),
            request_timeout: var_or("REQUEST_TIMEOUT", defaults.request_timeout),
        }
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl)
    }

    pub fn cleanup_interval(&self) -> Duration {
        Duration::from_secs(self.cleanup_interval)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout)
    }
}

fn var_or<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_entries: 10_000,
            cache_ttl: 60,
            cleanup_interval: 60,
            server_port: 3000,
            request_timeout: 10,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.max_entries, 10_000);
        assert_eq!(config.cache_ttl(), Duration::from_secs(60));
        assert_eq!(config.cleanup_interval(), Duration::from_secs(60));
        assert_eq!(config.server_port, 3000);
        assert_eq!(config.request_timeout(), Duration::from_secs(10));
    }

    #[test]
    fn test_var_or_falls_back() {
        env::remove_var("ORDER_SERVICE_TEST_UNSET");
        assert_eq!(var_or("ORDER_SERVICE_TEST_UNSET", 7u64), 7);

        env::set_var("ORDER_SERVICE_TEST_GARBAGE", "not-a-number");
        assert_eq!(var_or("ORDER_SERVICE_TEST_GARBAGE", 5u16), 5);

        env::set_var("ORDER_SERVICE_TEST_SET", "42");
        assert_eq!(var_or("ORDER_SERVICE_TEST_SET", 1usize), 42);
    }
}
