//! Tracing Decorator
//!
//! Wraps a repository so every call runs inside its own span.

use async_trait::async_trait;
use tracing::{info_span, warn, Instrument};

use crate::context::Context;
use crate::error::RepoError;
use crate::order::{Order, OrderId};
use crate::repo::OrderRepo;

/// Opens a span per repository call and records failures on it.
#[derive(Debug)]
pub struct TracedRepo<R> {
    inner: R,
    instance: &'static str,
}

impl<R: OrderRepo> TracedRepo<R> {
    pub fn new(inner: R, instance: &'static str) -> Self {
        Self { inner, instance }
    }
}

#[async_trait]
impl<R: OrderRepo> OrderRepo for TracedRepo<R> {
    async fn find(&self, ctx: &Context, id: OrderId) -> Result<Order, RepoError> {
        let span = info_span!("order.repo.find", instance = self.instance, order_id = %id);
        async {
            let result = self.inner.find(ctx, id).await;
            if let Err(err) = &result {
                warn!(error = %err, "repository find failed");
            }
            result
        }
        .instrument(span)
        .await
    }

    async fn add(&self, ctx: &Context, order: &Order) -> Result<(), RepoError> {
        let span = info_span!(
            "order.repo.add",
            instance = self.instance,
            order_id = %order.id,
            status = %order.status
        );
        async {
            let result = self.inner.add(ctx, order).await;
            if let Err(err) = &result {
                warn!(error = %err, "repository add failed");
            }
            result
        }
        .instrument(span)
        .await
    }
}
