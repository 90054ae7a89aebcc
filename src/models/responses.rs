//! Response DTOs for the order service API
//!
//! Defines the structure of outgoing HTTP response bodies.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::cache::CacheStats;
use crate::instrument::RepoMetricsSnapshot;
use crate::order::{Order, Status};

/// Order as returned by every order endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct OrderResponse {
    pub id: String,
    pub number: String,
    pub status: Status,
    pub placed_by: String,
    pub placed_at: Option<DateTime<Utc>>,
    pub shipped_at: Option<DateTime<Utc>>,
    pub delivered_at: Option<DateTime<Utc>>,
}

impl From<Order> for OrderResponse {
    fn from(order: Order) -> Self {
        Self {
            id: order.id.to_string(),
            number: order.number.to_string(),
            status: order.status,
            placed_by: order.placed_by.to_string(),
            placed_at: order.placed_at,
            shipped_at: order.shipped_at,
            delivered_at: order.delivered_at,
        }
    }
}

/// Response body for the stats endpoint (GET /stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    pub cache: CacheStatsBody,
    pub repositories: Vec<RepoMetricsSnapshot>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CacheStatsBody {
    pub hits: u64,
    pub misses: u64,
    pub sets: u64,
    pub evictions: u64,
    pub total_entries: usize,
    pub capacity: usize,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: f64,
}

impl StatsResponse {
    pub fn new(stats: CacheStats, capacity: usize, repositories: Vec<RepoMetricsSnapshot>) -> Self {
        Self {
            cache: CacheStatsBody {
                hit_rate: stats.hit_rate(),
                hits: stats.hits,
                misses: stats.misses,
                sets: stats.sets,
                evictions: stats.evictions,
                total_entries: stats.total_entries,
                capacity,
            },
            repositories,
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: Utc::now().to_rfc3339(),
        }
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::order::{OrderNumber, UserId};
    use uuid::Uuid;

    #[test]
    fn test_order_response_serialize() {
        let order = Order::place(OrderNumber::generate(), UserId::from_uuid(Uuid::new_v4()));
        let id = order.id.to_string();

        let json = serde_json::to_value(OrderResponse::from(order)).unwrap();

        assert_eq!(json["id"], id);
        assert_eq!(json["status"], "placed");
        assert!(json["shipped_at"].is_null());
    }

    #[test]
    fn test_stats_response_hit_rate() {
        let stats = CacheStats {
            hits: 80,
            misses: 20,
            sets: 5,
            evictions: 1,
            total_entries: 4,
        };
        let resp = StatsResponse::new(stats, 100, Vec::new());
        assert!((resp.cache.hit_rate - 0.8).abs() < 0.001);
        assert_eq!(resp.cache.capacity, 100);
    }

    #[test]
    fn test_health_response_serialize() {
        let json = serde_json::to_string(&HealthResponse::healthy()).unwrap();
        assert!(json.contains("healthy"));
        assert!(json.contains("timestamp"));
    }

    #[test]
    fn test_error_response_serialize() {
        let json = serde_json::to_string(&ErrorResponse::new("Something went wrong")).unwrap();
        assert!(json.contains("Something went wrong"));
    }
}
