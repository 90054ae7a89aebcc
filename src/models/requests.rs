//! Request DTOs for the order service API
//!
//! Defines the structure of incoming HTTP request bodies.

use serde::Deserialize;

use crate::error::ApiError;
use crate::order::{OrderNumber, UserId};

/// Request body for placing an order (POST /orders)
///
/// # Fields
/// - `user_id`: UUID of the user placing the order
/// - `number`: Optional order number, generated when omitted
#[derive(Debug, Clone, Deserialize)]
pub struct PlaceOrderRequest {
    pub user_id: String,
    #[serde(default)]
    pub number: Option<String>,
}

impl PlaceOrderRequest {
    /// Validates the request and converts it into domain values.
    pub fn parse(&self) -> Result<(OrderNumber, UserId), ApiError> {
        let user_id: UserId = self.user_id.parse()?;
        if user_id.is_nil() {
            return Err(ApiError::InvalidRequest("user_id cannot be nil".to_string()));
        }
        let number = match &self.number {
            Some(raw) => raw.parse()?,
            None => OrderNumber::generate(),
        };
        Ok((number, user_id))
    }
}
