use super::{AggregationMethod, Series, Window};
use crate::{
    agg_metric::AggMetric, cache::CachePusher, series_name::SeriesName, store::Store, time,
    Error, Retention, Sink, Timestamp, Value,
};
use enum_map::EnumMap;
use std::sync::Arc;

/// Receives the raw data of a metric and builds its aggregations.
///
/// All points with timestamps `t1, t2, t3, t4, [t5]` get aggregated into a point
/// with timestamp `t5`, where `t5 % span == 0`. In other words:
///
/// - an aggregated point reflects the data in the time frame preceding it
/// - the timestamps of aggregated series are quantized to the span, unlike
///   the raw series, which may have an offset
///
/// An aggregator has exactly one writer: samples of a metric must arrive in
/// an order that never maps to an already closed window.
pub struct Aggregator<S: Sink> {
    /// Key of the metric this aggregator corresponds to
    key: String,

    /// Window width in seconds
    span: Timestamp,

    /// End of the open window
    current_boundary: Timestamp,

    window: Window,

    /// One slot per derived series, `None` if not configured
    sinks: EnumMap<Series, Option<S>>,
}

impl<S: Sink> Aggregator<S> {
    /// Creates an aggregator, provisioning one sink for each derived series
    /// the given methods need.
    ///
    /// `provision` receives the derived series and its name
    /// (`<key>_<tag>_<span>`) and is called at most once per series.
    ///
    /// # Errors
    ///
    /// Returns error if `methods` is empty or `span` is zero.
    pub fn new<F>(
        key: &str,
        span: Timestamp,
        methods: &[AggregationMethod],
        mut provision: F,
    ) -> crate::Result<Self>
    where
        F: FnMut(Series, String) -> S,
    {
        if methods.is_empty() {
            return Err(Error::NoAggregationMethods(key.into()));
        }

        if span == 0 {
            return Err(Error::InvalidSpan);
        }

        let sinks = AggregationMethod::resolve(methods).map(|series, enabled| {
            enabled.then(|| {
                let name = SeriesName::format(key, series.tag(), span);
                log::debug!("creating derived series {name:?}");
                provision(series, name)
            })
        });

        Ok(Self {
            key: key.into(),
            span,
            current_boundary: 0,
            window: Window::default(),
            sinks,
        })
    }

    /// Metric key
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Window width in seconds
    #[must_use]
    pub fn span(&self) -> Timestamp {
        self.span
    }

    /// End of the open window, `0` before the first sample.
    #[must_use]
    pub fn current_boundary(&self) -> Timestamp {
        self.current_boundary
    }

    /// Number of samples in the open window that have not been flushed yet.
    #[must_use]
    pub fn pending(&self) -> u64 {
        self.window.count()
    }

    /// Derived series this aggregator writes to.
    pub fn series(&self) -> impl Iterator<Item = Series> + '_ {
        self.sinks
            .iter()
            .filter(|(_, sink)| sink.is_some())
            .map(|(series, _)| series)
    }

    /// Returns the sink of the given derived series, if configured.
    #[must_use]
    pub fn sink(&self, series: Series) -> Option<&S> {
        self.sinks[series].as_ref()
    }

    /// Adds a sample.
    ///
    /// Flushes the open window when the sample lands exactly on its boundary,
    /// or when the sample belongs to a later window.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BoundaryRegression`] if the sample maps to a window that
    /// was already closed, or [`Error::TimestampOutOfRange`] if its window
    /// ends past [`Timestamp::MAX`]. The aggregator state is left untouched.
    pub fn add(&mut self, ts: Timestamp, value: Value) -> crate::Result<()> {
        let Some(boundary) = time::checked_boundary(ts, self.span) else {
            return Err(Error::TimestampOutOfRange { ts, span: self.span });
        };

        if boundary == self.current_boundary {
            self.window.add(value);

            if ts == boundary {
                self.flush();
            }
        } else if boundary > self.current_boundary {
            // NOTE: If cnt is still 0, the numbers are invalid, not to be flushed
            // and we can simply reuse the window
            if !self.window.is_empty() {
                self.flush();
            }

            self.current_boundary = boundary;
            self.window.add(value);
        } else {
            return Err(Error::BoundaryRegression {
                key: self.key.clone(),
                boundary,
                current: self.current_boundary,
            });
        }

        Ok(())
    }

    /// Adds one point per configured series at the current boundary, then resets the window.
    fn flush(&mut self) {
        log::trace!(
            "{}: flushing window {} (cnt={})",
            self.key,
            self.current_boundary,
            self.window.count(),
        );

        for (series, sink) in &self.sinks {
            if let Some(sink) = sink {
                sink.add(self.current_boundary, self.window.get(series));
            }
        }

        self.window.reset();
    }
}

impl Aggregator<AggMetric> {
    /// Creates an aggregator whose derived series are written into `store` and `cache`.
    ///
    /// The span is the retention's seconds per point.
    ///
    /// # Errors
    ///
    /// Returns error if `methods` is empty or the retention's span is zero.
    pub fn with_store(
        store: &Arc<dyn Store>,
        cache: &Arc<dyn CachePusher>,
        key: &str,
        retention: Retention,
        methods: &[AggregationMethod],
    ) -> crate::Result<Self> {
        Self::new(key, retention.span(), methods, |_, name| {
            AggMetric::new(store.clone(), cache.clone(), name, retention)
        })
    }
}
