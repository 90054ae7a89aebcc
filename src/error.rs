//! Error types for the order service
//!
//! One thiserror enum per layer: cache, storage, domain, service and HTTP.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::context::ContextError;
use crate::models::ErrorResponse;
use crate::order::OrderId;

// == Cache Error Enum ==
/// Errors returned by cache implementations.
///
/// `NotFound` and `Expired` are both misses; the distinction is kept for
/// diagnostics only.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    #[error("could not find cache value")]
    NotFound,

    #[error("could not get expired cache value")]
    Expired,

    #[error("could not get cache value: {0}")]
    NotGet(#[source] ContextError),

    #[error("could not set cache value: {0}")]
    NotSet(#[source] ContextError),

    #[error("could not delete cache value: {0}")]
    NotDelete(#[source] ContextError),
}

impl CacheError {
    /// True for the lookup failures a caller should treat as a cache miss.
    pub fn is_miss(&self) -> bool {
        matches!(
            self,
            CacheError::NotFound | CacheError::Expired | CacheError::NotGet(_)
        )
    }
}

// == Repository Error Enum ==
/// Errors surfaced by the storage contract.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RepoError {
    #[error("could not find order {0}")]
    NotFound(OrderId),

    #[error("could not add order: {0}")]
    NotAdded(String),

    #[error("repository call aborted: {0}")]
    Cancelled(#[from] ContextError),
}

// == Domain Errors ==
/// Why an order could not be marked as shipped.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShipmentError {
    #[error("not placed")]
    NotPlaced,
    #[error("already shipped")]
    AlreadyShipped,
    #[error("already delivered")]
    AlreadyDelivered,
}

/// Why an order could not be marked as delivered.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryError {
    #[error("not shipped")]
    NotShipped,
    #[error("already delivered")]
    AlreadyDelivered,
}

/// Violations of the order state machine.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderError {
    #[error("could not mark the order as shipped: {0}")]
    NotShipped(#[source] ShipmentError),

    #[error("could not mark the order as delivered: {0}")]
    NotDelivered(#[source] DeliveryError),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("could not parse id: {0}")]
pub struct IdError(pub String);

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("order number must be 32 alphanumeric characters, got {0:?}")]
pub struct NumberError(pub String);

// == Service Error Enum ==
/// Underlying failure wrapped by a [`ServiceError`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ServiceCause {
    #[error(transparent)]
    Repo(#[from] RepoError),

    #[error(transparent)]
    Domain(#[from] OrderError),
}

/// Errors exposed by the application layer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    #[error("order could not be placed: {0}")]
    NotPlaced(#[source] ServiceCause),

    #[error("order could not be marked as shipped: {0}")]
    NotMarkedAsShipped(#[source] ServiceCause),

    #[error("order could not be marked as delivered: {0}")]
    NotMarkedAsDelivered(#[source] ServiceCause),

    #[error(transparent)]
    Lookup(#[from] RepoError),
}

impl ServiceError {
    pub fn cause(&self) -> ServiceCause {
        match self {
            ServiceError::NotPlaced(cause)
            | ServiceError::NotMarkedAsShipped(cause)
            | ServiceError::NotMarkedAsDelivered(cause) => cause.clone(),
            ServiceError::Lookup(err) => ServiceCause::Repo(err.clone()),
        }
    }
}

// == API Error Enum ==
/// Errors returned by HTTP handlers.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error(transparent)]
    Service(#[from] ServiceError),
}

impl From<IdError> for ApiError {
    fn from(err: IdError) -> Self {
        ApiError::InvalidRequest(err.to_string())
    }
}

impl From<NumberError> for ApiError {
    fn from(err: NumberError) -> Self {
        ApiError::InvalidRequest(err.to_string())
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Service(err) => match err.cause() {
                ServiceCause::Repo(RepoError::NotFound(_)) => StatusCode::NOT_FOUND,
                ServiceCause::Repo(RepoError::Cancelled(_)) => StatusCode::GATEWAY_TIMEOUT,
                ServiceCause::Repo(RepoError::NotAdded(_)) => StatusCode::INTERNAL_SERVER_ERROR,
                ServiceCause::Domain(_) => StatusCode::CONFLICT,
            },
        };

        let body = Json(ErrorResponse::new(self.to_string()));

        (status, body).into_response()
    }
}

/// Convenience Result type for HTTP handlers.
pub type Result<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_cache_miss_kinds() {
        assert!(CacheError::NotFound.is_miss());
        assert!(CacheError::Expired.is_miss());
        assert!(CacheError::NotGet(ContextError::Cancelled).is_miss());
        assert!(!CacheError::NotSet(ContextError::Cancelled).is_miss());
    }

    #[test]
    fn test_order_error_message_carries_reason() {
        let err = OrderError::NotShipped(ShipmentError::AlreadyDelivered);
        assert_eq!(
            err.to_string(),
            "could not mark the order as shipped: already delivered"
        );
    }

    #[test]
    fn test_service_error_exposes_source() {
        let err = ServiceError::NotPlaced(RepoError::NotAdded("disk full".into()).into());
        let source = err.source().map(|s| s.to_string());
        assert_eq!(source.as_deref(), Some("could not add order: disk full"));
    }

    #[test]
    fn test_api_error_status_codes() {
        let id = OrderId::new();
        let cases = [
            (
                ApiError::InvalidRequest("bad".into()),
                StatusCode::BAD_REQUEST,
            ),
            (
                ServiceError::Lookup(RepoError::NotFound(id)).into(),
                StatusCode::NOT_FOUND,
            ),
            (
                ServiceError::NotMarkedAsShipped(
                    OrderError::NotShipped(ShipmentError::AlreadyShipped).into(),
                )
                .into(),
                StatusCode::CONFLICT,
            ),
            (
                ServiceError::NotPlaced(RepoError::Cancelled(ContextError::DeadlineExceeded).into())
                    .into(),
                StatusCode::GATEWAY_TIMEOUT,
            ),
        ];

        for (err, status) in cases {
            assert_eq!(err.into_response().status(), status);
        }
    }
}
