//! Repository call metrics.
//!
//! Counters are plain atomics so recording never blocks a caller.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use serde::Serialize;

use crate::context::Context;
use crate::error::RepoError;
use crate::order::{Order, OrderId};
use crate::repo::OrderRepo;

// == Operation Metrics ==
/// Counters for a single repository method.
#[derive(Debug, Default)]
pub struct OperationMetrics {
    calls: AtomicU64,
    failures: AtomicU64,
    total_micros: AtomicU64,
}

impl OperationMetrics {
    fn record<T, E>(&self, result: &Result<T, E>, started: Instant) {
        self.calls.fetch_add(1, Ordering::Relaxed);
        if result.is_err() {
            self.failures.fetch_add(1, Ordering::Relaxed);
        }
        let elapsed = started.elapsed().as_micros() as u64;
        self.total_micros.fetch_add(elapsed, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> OperationSnapshot {
        let calls = self.calls.load(Ordering::Relaxed);
        let total_micros = self.total_micros.load(Ordering::Relaxed);
        OperationSnapshot {
            calls,
            failures: self.failures.load(Ordering::Relaxed),
            avg_latency_micros: if calls == 0 { 0 } else { total_micros / calls },
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct OperationSnapshot {
    pub calls: u64,
    pub failures: u64,
    pub avg_latency_micros: u64,
}

// == Repo Metrics ==
/// Metrics for one decorated repository.
#[derive(Debug)]
pub struct RepoMetrics {
    name: &'static str,
    pub find: OperationMetrics,
    pub add: OperationMetrics,
}

impl RepoMetrics {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            find: OperationMetrics::default(),
            add: OperationMetrics::default(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn snapshot(&self) -> RepoMetricsSnapshot {
        RepoMetricsSnapshot {
            name: self.name,
            find: self.find.snapshot(),
            add: self.add.snapshot(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepoMetricsSnapshot {
    pub name: &'static str,
    pub find: OperationSnapshot,
    pub add: OperationSnapshot,
}

// == Metered Repo ==
/// Counts calls, failures and latency of the wrapped repository.
#[derive(Debug)]
pub struct MeteredRepo<R> {
    inner: R,
    metrics: Arc<RepoMetrics>,
}

impl<R: OrderRepo> MeteredRepo<R> {
    pub fn new(inner: R, name: &'static str) -> Self {
        Self {
            inner,
            metrics: Arc::new(RepoMetrics::new(name)),
        }
    }

    pub fn metrics(&self) -> Arc<RepoMetrics> {
        self.metrics.clone()
    }
}

#[async_trait]
impl<R: OrderRepo> OrderRepo for MeteredRepo<R> {
    async fn find(&self, ctx: &Context, id: OrderId) -> Result<Order, RepoError> {
        let started = Instant::now();
        let result = self.inner.find(ctx, id).await;
        self.metrics.find.record(&result, started);
        result
    }

    async fn add(&self, ctx: &Context, order: &Order) -> Result<(), RepoError> {
        let started = Instant::now();
        let result = self.inner.add(ctx, order).await;
        self.metrics.add.record(&result, started);
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::order::{OrderNumber, UserId};
    use crate::repo::MemoryRepo;
    use uuid::Uuid;

    #[tokio::test]
    async fn test_counts_calls_and_failures() {
        let repo = MeteredRepo::new(MemoryRepo::new(), "memory");
        let metrics = repo.metrics();
        let ctx = Context::background();
        let order = Order::place(OrderNumber::generate(), UserId::from_uuid(Uuid::new_v4()));

        repo.add(&ctx, &order).await.unwrap();
        repo.find(&ctx, order.id).await.unwrap();
        let _ = repo.find(&ctx, OrderId::new()).await;

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.name, "memory");
        assert_eq!(snapshot.add.calls, 1);
        assert_eq!(snapshot.add.failures, 0);
        assert_eq!(snapshot.find.calls, 2);
        assert_eq!(snapshot.find.failures, 1);
    }

    #[test]
    fn test_empty_snapshot() {
        let metrics = RepoMetrics::new("empty");
        assert_eq!(metrics.snapshot().find, OperationSnapshot::default());
    }
}
