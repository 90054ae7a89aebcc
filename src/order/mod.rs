//! Order Module
//!
//! The order aggregate and its Placed -> Shipped -> Delivered state machine.

mod id;
mod number;
mod status;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{DeliveryError, OrderError, ShipmentError};

pub use id::{OrderId, UserId};
pub use number::{OrderNumber, NUMBER_LENGTH};
pub use status::Status;

// == Order ==
/// Order aggregate.
///
/// State only changes through [`Order::mark_as_shipped`] and
/// [`Order::mark_as_delivered`]; a rejected transition leaves it untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub number: OrderNumber,
    pub status: Status,
    pub placed_by: UserId,
    pub placed_at: Option<DateTime<Utc>>,
    pub shipped_at: Option<DateTime<Utc>>,
    pub delivered_at: Option<DateTime<Utc>>,
}

impl Order {
    // == Place ==
    /// Places a new order under a fresh id.
    pub fn place(number: OrderNumber, placed_by: UserId) -> Self {
        Self {
            id: OrderId::new(),
            number,
            status: Status::Placed,
            placed_by,
            placed_at: Some(Utc::now()),
            shipped_at: None,
            delivered_at: None,
        }
    }

    // == Mark As Shipped ==
    pub fn mark_as_shipped(&mut self) -> Result<(), OrderError> {
        if self.placed_at.is_none() {
            return Err(OrderError::NotShipped(ShipmentError::NotPlaced));
        }
        match self.status {
            Status::Shipped => Err(OrderError::NotShipped(ShipmentError::AlreadyShipped)),
            Status::Delivered => Err(OrderError::NotShipped(ShipmentError::AlreadyDelivered)),
            Status::Placed => {
                self.status = Status::Shipped;
                self.shipped_at = Some(Utc::now());
                Ok(())
            }
        }
    }

    // == Mark As Delivered ==
    pub fn mark_as_delivered(&mut self) -> Result<(), OrderError> {
        if self.shipped_at.is_none() {
            return Err(OrderError::NotDelivered(DeliveryError::NotShipped));
        }
        if self.status == Status::Delivered {
            return Err(OrderError::NotDelivered(DeliveryError::AlreadyDelivered));
        }

        self.status = Status::Delivered;
        self.delivered_at = Some(Utc::now());
        Ok(())
    }
}
