//! API Handlers
//!
//! HTTP request handlers for each order service endpoint.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::cache::InMemoryCache;
use crate::config::Config;
use crate::context::Context;
use crate::error::Result;
use crate::instrument::{instrument, RepoMetrics};
use crate::models::{HealthResponse, OrderResponse, PlaceOrderRequest, StatsResponse};
use crate::order::{Order, OrderId};
use crate::repo::{CachedRepo, MemoryRepo, OrderRepo};
use crate::service::OrderService;

/// Repository chain the service runs against.
pub type DynRepo = Box<dyn OrderRepo>;

/// Cache fronting the backing store.
pub type OrderCache = InMemoryCache<OrderId, Order>;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<OrderService<DynRepo>>,
    pub cache: Arc<OrderCache>,
    pub metrics: Arc<[Arc<RepoMetrics>]>,
    pub request_timeout: Duration,
}

impl AppState {
    /// Creates an AppState from an already assembled service.
    pub fn new(
        service: OrderService<DynRepo>,
        cache: Arc<OrderCache>,
        metrics: Vec<Arc<RepoMetrics>>,
        request_timeout: Duration,
    ) -> Self {
        Self {
            service: Arc::new(service),
            cache,
            metrics: metrics.into(),
            request_timeout,
        }
    }

    /// Builds the repository chain from configuration:
    /// traced(metered(cached(traced(metered(memory))))).
    ///
    /// Starts the cache cleanup task, so it must run inside a Tokio runtime.
    pub fn from_config(config: &Config) -> Self {
        let cache = Arc::new(OrderCache::new(
            config.max_entries,
            config.cleanup_interval(),
        ));

        let (storage, storage_metrics) = instrument(MemoryRepo::new(), "memory");
        let cached = CachedRepo::with_ttl(storage, cache.clone(), config.cache_ttl());
        let (repo, cache_metrics) = instrument(cached, "cache");

        Self::new(
            OrderService::new(Box::new(repo)),
            cache,
            vec![cache_metrics, storage_metrics],
            config.request_timeout(),
        )
    }

    fn context(&self) -> Context {
        Context::with_timeout(self.request_timeout)
    }
}

/// Handler for POST /orders
pub async fn place_handler(
    State(state): State<AppState>,
    Json(req): Json<PlaceOrderRequest>,
) -> Result<(StatusCode, Json<OrderResponse>)> {
    let (number, user_id) = req.parse()?;

    let order = state.service.place(&state.context(), number, user_id).await?;

    Ok((StatusCode::CREATED, Json(order.into())))
}

/// Handler for GET /orders/:id
pub async fn get_order_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<OrderResponse>> {
    let id: OrderId = id.parse()?;

    let order = state.service.find(&state.context(), id).await?;

    Ok(Json(order.into()))
}

/// Handler for POST /orders/:id/ship
pub async fn ship_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<OrderResponse>> {
    let id: OrderId = id.parse()?;

    let order = state.service.mark_as_shipped(&state.context(), id).await?;

    Ok(Json(order.into()))
}

/// Handler for POST /orders/:id/deliver
pub async fn deliver_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<OrderResponse>> {
    let id: OrderId = id.parse()?;

    let order = state.service.mark_as_delivered(&state.context(), id).await?;

    Ok(Json(order.into()))
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let repositories = state.metrics.iter().map(|m| m.snapshot()).collect();

    Json(StatsResponse::new(
        state.cache.stats(),
        state.cache.capacity(),
        repositories,
    ))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
