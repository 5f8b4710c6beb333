use crate::{
    agg::{AggregationMethod, Aggregator},
    agg_metric::AggMetric,
    cache::CachePusher,
    store::Store,
    time, Error, MetricKey, Retention, Sink, Timestamp, Value,
};
use std::sync::Arc;

/// The in-process representation of a metric.
///
/// Writes the raw data into the series named by the metric key and feeds it
/// into one aggregator per rollup retention.
pub struct Metric {
    key: String,
    raw: AggMetric,
    aggregators: Vec<Aggregator<AggMetric>>,
    last_ts: Option<Timestamp>,
    discarded: u64,
}

impl Metric {
    /// Creates a metric.
    ///
    /// The first retention describes the raw data, every following retention
    /// gets an aggregator producing the given methods. If there is only one
    /// retention, `methods` may be empty.
    ///
    /// # Errors
    ///
    /// Returns error if no retention is given, a rollup retention has a zero
    /// span, or rollups are configured without aggregation methods.
    pub fn new(
        store: &Arc<dyn Store>,
        cache: &Arc<dyn CachePusher>,
        key: MetricKey<'_>,
        retentions: &[Retention],
        methods: &[AggregationMethod],
    ) -> crate::Result<Self> {
        let Some((raw, rollups)) = retentions.split_first() else {
            return Err(Error::NoRetentions(key.to_string()));
        };

        let aggregators = rollups
            .iter()
            .map(|retention| Aggregator::with_store(store, cache, &key, *retention, methods))
            .collect::<crate::Result<Vec<_>>>()?;

        log::debug!(
            "created metric {key} with {} rollup(s)",
            aggregators.len(),
        );

        Ok(Self {
            key: key.to_string(),
            raw: AggMetric::new(store.clone(), cache.clone(), key.to_string(), *raw),
            aggregators,
            last_ts: None,
            discarded: 0,
        })
    }

    /// Metric key
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Aggregators of this metric, ordered like the rollup retentions.
    #[must_use]
    pub fn aggregators(&self) -> &[Aggregator<AggMetric>] {
        &self.aggregators
    }

    /// Number of points that were discarded for being out of order.
    #[must_use]
    pub fn discarded(&self) -> u64 {
        self.discarded
    }

    /// Adds a raw data point.
    ///
    /// Points that are not newer than the last accepted point are discarded,
    /// which keeps the aggregators' windows moving forward.
    ///
    /// Returns `false` if the point was discarded.
    ///
    /// # Errors
    ///
    /// Returns error if the point has no window boundary in some rollup, in
    /// which case nothing is written, or an aggregator rejected the point.
    pub fn add(&mut self, ts: Timestamp, value: Value) -> crate::Result<bool> {
        if let Some(last_ts) = self.last_ts {
            if ts <= last_ts {
                self.discarded += 1;
                log::debug!(
                    "{}: discarding point {ts}, last accepted point was {last_ts}",
                    self.key,
                );
                return Ok(false);
            }
        }

        // NOTE: Check every window before writing anything, so the raw series
        // and the rollups never disagree about an accepted point
        if let Some(span) = self
            .aggregators
            .iter()
            .map(Aggregator::span)
            .find(|&span| time::checked_boundary(ts, span).is_none())
        {
            return Err(Error::TimestampOutOfRange { ts, span });
        }

        self.last_ts = Some(ts);
        self.raw.add(ts, value);

        for aggregator in &mut self.aggregators {
            aggregator.add(ts, value)?;
        }

        Ok(true)
    }
}
