//! Order Service
//!
//! Application layer orchestrating the order aggregate and its repository.

use tracing::{error, info, instrument};

use crate::context::Context;
use crate::error::{OrderError, ServiceCause, ServiceError};
use crate::order::{Order, OrderId, OrderNumber, UserId};
use crate::repo::OrderRepo;

/// Runs domain operations against a repository.
#[derive(Debug)]
pub struct OrderService<R> {
    repo: R,
}

impl<R: OrderRepo> OrderService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn repo(&self) -> &R {
        &self.repo
    }

    // == Place ==
    /// Places an order and stores it.
    #[instrument(skip_all, fields(number = %number, user_id = %placed_by))]
    pub async fn place(
        &self,
        ctx: &Context,
        number: OrderNumber,
        placed_by: UserId,
    ) -> Result<Order, ServiceError> {
        let order = Order::place(number, placed_by);

        if let Err(err) = self.repo.add(ctx, &order).await {
            error!(error = %err, "order was not added once placed");
            return Err(ServiceError::NotPlaced(err.into()));
        }

        info!(order_id = %order.id, "order placed");
        Ok(order)
    }

    // == Mark As Shipped ==
    #[instrument(skip_all, fields(order_id = %id))]
    pub async fn mark_as_shipped(&self, ctx: &Context, id: OrderId) -> Result<Order, ServiceError> {
        self.transition(ctx, id, Order::mark_as_shipped, ServiceError::NotMarkedAsShipped)
            .await
    }

    // == Mark As Delivered ==
    #[instrument(skip_all, fields(order_id = %id))]
    pub async fn mark_as_delivered(
        &self,
        ctx: &Context,
        id: OrderId,
    ) -> Result<Order, ServiceError> {
        self.transition(ctx, id, Order::mark_as_delivered, ServiceError::NotMarkedAsDelivered)
            .await
    }

    // == Find ==
    /// Reads an order, returning repository failures as [`ServiceError::Lookup`].
    pub async fn find(&self, ctx: &Context, id: OrderId) -> Result<Order, ServiceError> {
        Ok(self.repo.find(ctx, id).await?)
    }

    /// Loads the order, applies `apply`, and persists the result.
    ///
    /// A rejected transition returns before anything is written.
    async fn transition<F>(
        &self,
        ctx: &Context,
        id: OrderId,
        apply: F,
        kind: fn(ServiceCause) -> ServiceError,
    ) -> Result<Order, ServiceError>
    where
        F: FnOnce(&mut Order) -> Result<(), OrderError>,
    {
        let mut order = self.repo.find(ctx, id).await.map_err(|err| {
            error!(error = %err, "order was not found");
            kind(err.into())
        })?;

        if let Err(err) = apply(&mut order) {
            error!(error = %err, "order transition rejected");
            return Err(kind(err.into()));
        }

        if let Err(err) = self.repo.add(ctx, &order).await {
            error!(error = %err, "order was not added once transitioned");
            return Err(kind(err.into()));
        }

        info!(status = %order.status, "order transitioned");
        Ok(order)
    }
}
