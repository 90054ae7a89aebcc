//! In-Memory Order Store
//!
//! Backing repository keeping orders in a lock-guarded map.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;
use tracing::debug;

use crate::context::Context;
use crate::error::RepoError;
use crate::order::{Order, OrderId};
use crate::repo::OrderRepo;

/// In-process backing store keyed by order id.
///
/// `add` upserts, so persisting a transitioned order replaces the stored one.
#[derive(Debug, Default)]
pub struct MemoryRepo {
    orders: RwLock<HashMap<OrderId, Order>>,
}

impl MemoryRepo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.orders.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.read().is_empty()
    }
}

#[async_trait]
impl OrderRepo for MemoryRepo {
    async fn find(&self, ctx: &Context, id: OrderId) -> Result<Order, RepoError> {
        ctx.check()?;

        self.orders
            .read()
            .get(&id)
            .cloned()
            .ok_or(RepoError::NotFound(id))
    }

    async fn add(&self, ctx: &Context, order: &Order) -> Result<(), RepoError> {
        ctx.check()?;

        self.orders.write().insert(order.id, order.clone());
        debug!(order_id = %order.id, status = %order.status, "order stored");
        Ok(())
    }
}
