use crate::{
    agg::AggregationMethod,
    cache::{CachePusher, RecentCache},
    db_builder::Builder,
    metric::Metric,
    store::{FjallStore, Store},
    Error, HashMap, MetricKey, Point, Retention, Timestamp, Value,
};
use fjall::Keyspace;
use std::{
    path::Path,
    sync::{Arc, Mutex, RwLock},
};

/// A time series database that rolls up its metrics as they are written.
///
/// Every metric is registered once with its retentions and aggregation methods.
/// Writes to one metric are serialized, writes to different metrics may
/// happen concurrently.
pub struct Database {
    store: Arc<FjallStore>,
    cache: Arc<RecentCache>,
    metrics: RwLock<HashMap<String, Arc<Mutex<Metric>>>>,
}

impl Database {
    /// Creates a new database builder to create or open a database at `path`.
    #[must_use]
    pub fn builder() -> Builder {
        Builder::new()
    }

    /// Opens a database with the default configuration.
    ///
    /// # Errors
    ///
    /// Returns error if an I/O error occurred.
    pub fn new<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        Self::builder().open(path)
    }

    pub(crate) fn from_keyspace(keyspace: Keyspace, recent_points: usize) -> Self {
        Self {
            store: Arc::new(FjallStore::new(keyspace)),
            cache: Arc::new(RecentCache::new(recent_points)),
            metrics: RwLock::default(),
        }
    }

    fn get_metric(&self, key: &str) -> Option<Arc<Mutex<Metric>>> {
        self.metrics
            .read()
            .expect("lock is poisoned")
            .get(key)
            .cloned()
    }

    /// Registers a metric.
    ///
    /// The first retention holds the raw data, each following retention is
    /// rolled up using the given aggregation methods.
    ///
    /// Registering an already registered metric keeps the existing one.
    ///
    /// # Errors
    ///
    /// Returns error if the retentions or methods are invalid.
    pub fn register(
        &self,
        key: MetricKey<'_>,
        retentions: &[Retention],
        methods: &[AggregationMethod],
    ) -> crate::Result<()> {
        let mut lock = self.metrics.write().expect("lock is poisoned");

        if lock.contains_key(&*key) {
            log::trace!("metric {key} is already registered");
            return Ok(());
        }

        let store: Arc<dyn Store> = self.store.clone();
        let cache: Arc<dyn CachePusher> = self.cache.clone();
        let metric = Metric::new(&store, &cache, key, retentions, methods)?;

        lock.insert(key.to_string(), Arc::new(Mutex::new(metric)));

        Ok(())
    }

    /// Returns `true` if the metric is registered.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.metrics
            .read()
            .expect("lock is poisoned")
            .contains_key(key)
    }

    /// Writes a raw data point.
    ///
    /// Returns `false` if the point was discarded for not being newer than
    /// the last point of the metric.
    ///
    /// # Errors
    ///
    /// Returns error if the metric is not registered, or its aggregation
    /// windows regressed.
    pub fn write(&self, key: &str, ts: Timestamp, value: Value) -> crate::Result<bool> {
        let Some(metric) = self.get_metric(key) else {
            return Err(Error::UnknownMetric(key.into()));
        };

        let mut metric = metric.lock().expect("lock is poisoned");
        metric.add(ts, value)
    }

    /// Reads the points of a raw or derived series in `[from, to]`.
    ///
    /// Derived series are named `<key>_<tag>_<span>`, e.g. `cpu.total_sum_600`.
    ///
    /// # Errors
    ///
    /// Returns error if an I/O error occurred.
    pub fn points(&self, series: &str, from: Timestamp, to: Timestamp) -> crate::Result<Vec<Point>> {
        self.store.range(series, from, to)
    }

    /// Returns the most recent points of a series from the write-through cache.
    #[must_use]
    pub fn cached(&self, series: &str) -> Vec<Point> {
        self.cache.get(series)
    }

    /// Flushes all written points to disk.
    ///
    /// Note that points of windows that are still open are not written yet.
    ///
    /// # Errors
    ///
    /// Returns error if an I/O error occurred.
    pub fn persist(&self) -> crate::Result<()> {
        self.store.persist_all()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Duration;

    const METHODS: &[AggregationMethod] = &[
        AggregationMethod::Average,
        AggregationMethod::Min,
        AggregationMethod::Max,
        AggregationMethod::Last,
    ];

    fn key(s: &str) -> MetricKey<'_> {
        MetricKey::try_from(s).expect("should be valid")
    }

    #[test_log::test]
    fn db_unknown_metric() -> crate::Result<()> {
        let dir = tempfile::tempdir()?;
        let db = Database::new(&dir)?;

        assert!(matches!(
            db.write("cpu.total", 10, 1.0),
            Err(Error::UnknownMetric(_))
        ));

        Ok(())
    }

    #[test_log::test]
    fn db_register_twice() -> crate::Result<()> {
        let dir = tempfile::tempdir()?;
        let db = Database::new(&dir)?;

        let retentions = [Retention::new(10, 360), Retention::new(60, 60)];

        db.register(key("cpu.total"), &retentions, METHODS)?;
        assert!(db.write("cpu.total", 15, 1.0)?);

        // NOTE: Keeps existing state
        db.register(key("cpu.total"), &retentions, &[AggregationMethod::Sum])?;
        assert!(!db.write("cpu.total", 15, 1.0)?);

        assert!(db.contains("cpu.total"));
        assert!(!db.contains("cpu.idle"));

        Ok(())
    }

    #[test_log::test]
    fn db_register_invalid() -> crate::Result<()> {
        let dir = tempfile::tempdir()?;
        let db = Database::new(&dir)?;

        let result = db.register(
            key("cpu.total"),
            &[Retention::new(10, 360), Retention::new(0, 60)],
            METHODS,
        );
        assert!(matches!(result, Err(Error::InvalidSpan)));
        assert!(!db.contains("cpu.total"));

        Ok(())
    }

    #[test_log::test]
    fn db_write_rollup() -> crate::Result<()> {
        let dir = tempfile::tempdir()?;
        let db = Database::builder().recent_points(8).open(&dir)?;

        db.register(
            key("cpu.total"),
            &[
                Retention::new(10, Duration::days(1) / 10),
                Retention::new(Duration::minutes(1), 60 * 24 * 7),
            ],
            METHODS,
        )?;

        // NOTE: Window (0, 60] closes on its exact boundary
        db.write("cpu.total", 30, 1.0)?;
        db.write("cpu.total", 50, 3.0)?;
        db.write("cpu.total", 60, 2.0)?;
        db.write("cpu.total", 70, 5.0)?;

        assert_eq!(
            vec![Point { ts: 60, value: 6.0 }],
            db.points("cpu.total_sum_60", 0, 1_000)?
        );
        assert_eq!(
            vec![Point { ts: 60, value: 3.0 }],
            db.points("cpu.total_cnt_60", 0, 1_000)?
        );
        assert_eq!(
            vec![Point { ts: 60, value: 1.0 }],
            db.points("cpu.total_min_60", 0, 1_000)?
        );
        assert_eq!(
            vec![Point { ts: 60, value: 3.0 }],
            db.points("cpu.total_max_60", 0, 1_000)?
        );
        assert_eq!(
            vec![Point { ts: 60, value: 2.0 }],
            db.points("cpu.total_lst_60", 0, 1_000)?
        );
        assert_eq!(4, db.points("cpu.total", 0, 1_000)?.len());
        assert_eq!(4, db.cached("cpu.total").len());

        // NOTE: 120 is still open
        assert!(db.points("cpu.total_sum_60", 61, 1_000)?.is_empty());

        db.persist()?;

        Ok(())
    }

    #[test_log::test]
    fn db_write_longest_key() -> crate::Result<()> {
        let dir = tempfile::tempdir()?;
        let db = Database::new(&dir)?;

        let long = "a".repeat(232);
        assert!(MetricKey::try_from(&*"a".repeat(233)).is_err());

        // NOTE: A 10 digit span gives the longest derived series names
        db.register(
            key(&long),
            &[Retention::new(1, 10), Retention::new(1_000_000_000, 1)],
            &[AggregationMethod::Average],
        )?;

        assert!(db.write(&long, 1, 1.0)?);
        assert!(db.write(&long, 1_000_000_000, 1.0)?);

        assert_eq!(
            vec![Point {
                ts: 1_000_000_000,
                value: 2.0
            }],
            db.points(&format!("{long}_sum_1000000000"), 0, Timestamp::MAX)?
        );
        assert_eq!(
            vec![Point {
                ts: 1_000_000_000,
                value: 2.0
            }],
            db.points(&format!("{long}_cnt_1000000000"), 0, Timestamp::MAX)?
        );

        // NOTE: The window of u32::MAX would end past the last representable timestamp
        assert!(matches!(
            db.write(&long, Timestamp::MAX, 1.0),
            Err(Error::TimestampOutOfRange { .. })
        ));

        // NOTE: The metric stays usable
        assert!(db.write(&long, 1_000_000_001, 3.0)?);
        assert_eq!(3, db.points(&long, 0, Timestamp::MAX)?.len());

        Ok(())
    }

    #[test_log::test]
    fn db_concurrent_metrics() -> crate::Result<()> {
        let dir = tempfile::tempdir()?;
        let db = Arc::new(Database::new(&dir)?);

        let keys = ["host-0.cpu", "host-1.cpu", "host-2.cpu", "host-3.cpu"];

        for k in keys {
            db.register(
                key(k),
                &[Retention::new(1, 3_600), Retention::new(10, 360)],
                &[AggregationMethod::Sum],
            )?;
        }

        let handles = keys
            .into_iter()
            .map(|k| {
                let db = db.clone();

                std::thread::spawn(move || -> crate::Result<()> {
                    for ts in 1..=1_000 {
                        db.write(k, ts, 1.0)?;
                    }
                    Ok(())
                })
            })
            .collect::<Vec<_>>();

        for handle in handles {
            handle.join().expect("should join")?;
        }

        for k in keys {
            let sums = db.points(&format!("{k}_sum_10"), 0, 1_000)?;
            assert_eq!(100, sums.len());
            assert!(sums.iter().all(|p| p.value == 10.0));
        }

        Ok(())
    }
}
