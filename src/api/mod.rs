//! API Module
//!
//! HTTP handlers and routing for the order service REST API.
//!
//! # Endpoints
//! - `POST /orders` - Place an order
//! - `GET /orders/:id` - Fetch an order
//! - `POST /orders/:id/ship` - Mark an order as shipped
//! - `POST /orders/:id/deliver` - Mark an order as delivered
//! - `GET /stats` - Cache statistics and repository metrics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
