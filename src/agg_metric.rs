use crate::{cache::CachePusher, store::Store, Point, Retention, Sink, Timestamp, Value};
use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};

/// A named series, backed by a [`Store`] and populated into a write-through cache.
///
/// Used both for the raw data of a metric and for each of its derived series.
pub struct AggMetric {
    name: String,
    retention: Retention,
    store: Arc<dyn Store>,
    cache: Arc<dyn CachePusher>,
    write_errors: AtomicU64,
}

impl AggMetric {
    /// Creates a series handle.
    #[must_use]
    pub fn new(
        store: Arc<dyn Store>,
        cache: Arc<dyn CachePusher>,
        name: String,
        retention: Retention,
    ) -> Self {
        log::trace!("series {name:?} with retention {retention}");

        Self {
            name,
            retention,
            store,
            cache,
            write_errors: AtomicU64::new(0),
        }
    }

    /// Series name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Retention of the series
    #[must_use]
    pub fn retention(&self) -> Retention {
        self.retention
    }

    /// Number of points that failed to persist.
    #[must_use]
    pub fn write_errors(&self) -> u64 {
        self.write_errors.load(Ordering::Relaxed)
    }
}

impl Sink for AggMetric {
    fn add(&self, ts: Timestamp, value: Value) {
        let point = Point { ts, value };

        if let Err(e) = self.store.persist(&self.name, point) {
            self.write_errors.fetch_add(1, Ordering::Relaxed);
            log::error!("failed to persist point {ts} of series {:?}: {e}", self.name);
        }

        self.cache.push(&self.name, point);
    }
}
