//! Order Service - a layered service around a single order aggregate
//!
//! Provides a cache-fronted repository with TTL expiration and
//! evict-soonest-to-expire cleanup, tracing and metrics decorators, and an
//! HTTP API over the order state machine.

pub mod api;
pub mod cache;
pub mod config;
pub mod context;
pub mod error;
pub mod instrument;
pub mod models;
pub mod order;
pub mod repo;
pub mod service;
pub mod tasks;

pub use api::AppState;
pub use config::Config;
pub use context::Context;
pub use service::OrderService;
