//! Test double for [`OrderRepo`] that counts calls and can be told to fail.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::context::Context;
use crate::error::RepoError;
use crate::order::{Order, OrderId};
use crate::repo::{MemoryRepo, OrderRepo};

#[derive(Debug, Default)]
pub(crate) struct SpyRepo {
    inner: MemoryRepo,
    find_calls: AtomicUsize,
    add_calls: AtomicUsize,
    fail_add: Mutex<Option<RepoError>>,
    fail_find: Mutex<Option<RepoError>>,
}

impl SpyRepo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the backing store without counting a call.
    pub async fn seed(&self, order: &Order) {
        self.inner
            .add(&Context::background(), order)
            .await
            .expect("seeding the spy repo");
    }

    pub fn fail_add_with(&self, err: RepoError) {
        *self.fail_add.lock() = Some(err);
    }

    pub fn fail_find_with(&self, err: RepoError) {
        *self.fail_find.lock() = Some(err);
    }

    pub fn find_calls(&self) -> usize {
        self.find_calls.load(Ordering::SeqCst)
    }

    pub fn add_calls(&self) -> usize {
        self.add_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl OrderRepo for SpyRepo {
    async fn find(&self, ctx: &Context, id: OrderId) -> Result<Order, RepoError> {
        self.find_calls.fetch_add(1, Ordering::SeqCst);
        let failure = self.fail_find.lock().clone();
        if let Some(err) = failure {
            return Err(err);
        }
        self.inner.find(ctx, id).await
    }

    async fn add(&self, ctx: &Context, order: &Order) -> Result<(), RepoError> {
        self.add_calls.fetch_add(1, Ordering::SeqCst);
        let failure = self.fail_add.lock().clone();
        if let Some(err) = failure {
            return Err(err);
        }
        self.inner.add(ctx, order).await
    }
}
