//! Cache-fronted repository.
//!
//! Reads go to the cache first and fall back to the wrapped repository;
//! writes go to the wrapped repository first and populate the cache only
//! once they succeed. Cache trouble never changes the result of a call.

use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::cache::Cache;
use crate::context::Context;
use crate::error::RepoError;
use crate::order::{Order, OrderId};
use crate::repo::OrderRepo;

/// TTL applied to orders written into the cache.
pub const DEFAULT_TTL: Duration = Duration::from_secs(60);

/// [`OrderRepo`] decorator backed by a [`Cache`].
#[derive(Debug)]
pub struct CachedRepo<R, C> {
    base: R,
    store: C,
    ttl: Duration,
}

impl<R, C> CachedRepo<R, C>
where
    R: OrderRepo,
    C: Cache<OrderId, Order>,
{
    pub fn new(base: R, store: C) -> Self {
        Self::with_ttl(base, store, DEFAULT_TTL)
    }

    pub fn with_ttl(base: R, store: C, ttl: Duration) -> Self {
        Self { base, store, ttl }
    }

    pub fn store(&self) -> &C {
        &self.store
    }

    fn populate(&self, ctx: &Context, order: &Order) {
        match self.store.set(ctx, order.id, order.clone(), self.ttl) {
            Ok(()) => debug!(order_id = %order.id, "order was set in cache"),
            Err(err) => warn!(order_id = %order.id, error = %err, "order was not set in cache"),
        }
    }
}

#[async_trait]
impl<R, C> OrderRepo for CachedRepo<R, C>
where
    R: OrderRepo,
    C: Cache<OrderId, Order>,
{
    async fn find(&self, ctx: &Context, id: OrderId) -> Result<Order, RepoError> {
        match self.store.get(ctx, &id) {
            Ok(order) => {
                debug!(order_id = %id, "order was found in cache");
                return Ok(order);
            }
            Err(err) => debug!(
                order_id = %id,
                error = %err,
                miss = err.is_miss(),
                "order was not found in cache"
            ),
        }

        let order = self.base.find(ctx, id).await?;
        self.populate(ctx, &order);
        Ok(order)
    }

    async fn add(&self, ctx: &Context, order: &Order) -> Result<(), RepoError> {
        if let Err(err) = self.base.add(ctx, order).await {
            warn!(order_id = %order.id, error = %err, "order was not added, cache left untouched");
            return Err(err);
        }

        self.populate(ctx, order);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::cache::InMemoryCache;
    use crate::context::ContextError;
    use crate::error::CacheError;
    use crate::order::{OrderNumber, UserId};
    use crate::repo::testing::SpyRepo;
    use uuid::Uuid;

    type OrderCache = Arc<InMemoryCache<OrderId, Order>>;

    fn order() -> Order {
        Order::place(OrderNumber::generate(), UserId::from_uuid(Uuid::new_v4()))
    }

    fn setup() -> (Arc<SpyRepo>, OrderCache, CachedRepo<Arc<SpyRepo>, OrderCache>) {
        let base = Arc::new(SpyRepo::new());
        let cache: OrderCache = Arc::new(InMemoryCache::new(100, Duration::from_secs(3600)));
        let repo = CachedRepo::new(base.clone(), cache.clone());
        (base, cache, repo)
    }

    #[tokio::test]
    async fn test_add_populates_cache() {
        let (base, cache, repo) = setup();
        let ctx = Context::background();
        let order = order();

        repo.add(&ctx, &order).await.unwrap();

        assert_eq!(base.add_calls(), 1);
        assert_eq!(cache.get(&ctx, &order.id).unwrap(), order);
    }

    #[tokio::test]
    async fn test_add_failure_leaves_cache_empty() {
        let (base, cache, repo) = setup();
        let ctx = Context::background();
        let order = order();
        base.fail_add_with(RepoError::NotAdded("boom".into()));

        let result = repo.add(&ctx, &order).await;

        assert_eq!(result, Err(RepoError::NotAdded("boom".into())));
        assert_eq!(cache.get(&ctx, &order.id), Err(CacheError::NotFound));
    }

    #[tokio::test]
    async fn test_find_reads_through_once() {
        let (base, cache, repo) = setup();
        let ctx = Context::background();
        let order = order();
        base.seed(&order).await;

        assert_eq!(repo.find(&ctx, order.id).await.unwrap(), order);
        assert_eq!(repo.find(&ctx, order.id).await.unwrap(), order);

        assert_eq!(base.find_calls(), 1);
        assert_eq!(cache.stats().hits, 1);
    }

    #[tokio::test]
    async fn test_find_cache_hit_skips_base() {
        let (base, cache, repo) = setup();
        let ctx = Context::background();
        let order = order();
        cache.set(&ctx, order.id, order.clone(), DEFAULT_TTL).unwrap();

        assert_eq!(repo.find(&ctx, order.id).await.unwrap(), order);
        assert_eq!(base.find_calls(), 0);
    }

    #[tokio::test]
    async fn test_find_surfaces_base_error() {
        let (base, cache, repo) = setup();
        let id = OrderId::new();

        let result = repo.find(&Context::background(), id).await;

        assert_eq!(result, Err(RepoError::NotFound(id)));
        assert_eq!(base.find_calls(), 1);
        assert!(cache.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_expired_entry_reloads_from_base() {
        let (base, _cache, repo) = setup();
        let ctx = Context::background();
        let order = order();
        base.seed(&order).await;

        repo.find(&ctx, order.id).await.unwrap();
        tokio::time::advance(DEFAULT_TTL).await;
        repo.find(&ctx, order.id).await.unwrap();

        assert_eq!(base.find_calls(), 2);
    }

    /// Cache that fails every write.
    struct BrokenCache;

    impl Cache<OrderId, Order> for BrokenCache {
        fn get(&self, _: &Context, _: &OrderId) -> Result<Order, CacheError> {
            Err(CacheError::NotFound)
        }

        fn set(&self, _: &Context, _: OrderId, _: Order, _: Duration) -> Result<(), CacheError> {
            Err(CacheError::NotSet(ContextError::Cancelled))
        }

        fn delete(&self, _: &Context, _: &OrderId) -> Result<(), CacheError> {
            Err(CacheError::NotDelete(ContextError::Cancelled))
        }
    }

    #[tokio::test]
    async fn test_cache_failures_never_fail_calls() {
        let base = Arc::new(SpyRepo::new());
        let repo = CachedRepo::new(base.clone(), BrokenCache);
        let ctx = Context::background();
        let order = order();

        repo.add(&ctx, &order).await.unwrap();
        assert_eq!(repo.find(&ctx, order.id).await.unwrap(), order);
        assert_eq!(base.find_calls(), 1);
    }
}
