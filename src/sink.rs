use crate::{Timestamp, Value};
use std::sync::Arc;

/// A single data point of a series.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Point {
    /// Unix timestamp in seconds
    pub ts: Timestamp,

    /// Value
    pub value: Value,
}

/// Append-only destination of a derived series.
///
/// Implementations take care of their own durability and error handling,
/// an aggregator never retries or inspects a failed append.
///
/// A sink may receive appends from many aggregators at once, but never
/// concurrently from the same aggregator.
pub trait Sink {
    /// Appends a point to the series.
    fn add(&self, ts: Timestamp, value: Value);
}

impl<S: Sink + ?Sized> Sink for Arc<S> {
    fn add(&self, ts: Timestamp, value: Value) {
        (**self).add(ts, value);
    }
}
