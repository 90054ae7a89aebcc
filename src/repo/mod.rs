//! Repository Module
//!
//! Storage contract for orders plus the implementations and decorators
//! that satisfy it.

mod cached;
mod memory;

#[cfg(test)]
pub(crate) mod testing;

use std::sync::Arc;

use async_trait::async_trait;

use crate::context::Context;
use crate::error::RepoError;
use crate::order::{Order, OrderId};

pub use cached::{CachedRepo, DEFAULT_TTL};
pub use memory::MemoryRepo;

/// Reads and writes orders from and to storage.
///
/// Implementations check the context before doing any work.
#[async_trait]
pub trait OrderRepo: Send + Sync {
    async fn find(&self, ctx: &Context, id: OrderId) -> Result<Order, RepoError>;

    /// Inserts or replaces `order`.
    async fn add(&self, ctx: &Context, order: &Order) -> Result<(), RepoError>;
}

#[async_trait]
impl<R> OrderRepo for Arc<R>
where
    R: OrderRepo + ?Sized,
{
    async fn find(&self, ctx: &Context, id: OrderId) -> Result<Order, RepoError> {
        (**self).find(ctx, id).await
    }

    async fn add(&self, ctx: &Context, order: &Order) -> Result<(), RepoError> {
        (**self).add(ctx, order).await
    }
}

#[async_trait]
impl<R> OrderRepo for Box<R>
where
    R: OrderRepo + ?Sized,
{
    async fn find(&self, ctx: &Context, id: OrderId) -> Result<Order, RepoError> {
        (**self).find(ctx, id).await
    }

    async fn add(&self, ctx: &Context, order: &Order) -> Result<(), RepoError> {
        (**self).add(ctx, order).await
    }
}
