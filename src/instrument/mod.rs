//! Instrumentation Module
//!
//! Tracing and metrics decorators for [`OrderRepo`](crate::repo::OrderRepo).
//! Both forward every call unchanged; what they record never affects the
//! result.

mod metrics;
mod trace;

use std::sync::Arc;

use crate::repo::OrderRepo;

pub use metrics::{
    MeteredRepo, OperationMetrics, OperationSnapshot, RepoMetrics, RepoMetricsSnapshot,
};
pub use trace::TracedRepo;

/// Wraps `base` with tracing outside metrics, both labelled `name`.
///
/// Returns the metrics handle so callers can report it.
pub fn instrument<R: OrderRepo>(
    base: R,
    name: &'static str,
) -> (TracedRepo<MeteredRepo<R>>, Arc<RepoMetrics>) {
    let metered = MeteredRepo::new(base, name);
    let metrics = metered.metrics();
    (TracedRepo::new(metered, name), metrics)
}
