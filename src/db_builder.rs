use crate::Database;
use fjall::Keyspace;
use std::path::Path;

/// Builder for [`Database`].
pub struct Builder {
    cache_size_mib: u64,
    recent_points: usize,
}

impl Builder {
    pub(crate) fn new() -> Self {
        Self {
            cache_size_mib: 64,
            recent_points: 120,
        }
    }

    /// Sets the block cache size of the storage engine in MiB.
    ///
    /// Default = 64 MiB
    #[must_use]
    pub fn cache_size_mib(mut self, mib: u64) -> Self {
        self.cache_size_mib = mib;
        self
    }

    /// Sets how many of the most recent points of every series are kept in memory.
    ///
    /// `0` disables the write-through cache.
    ///
    /// Default = 120
    #[must_use]
    pub fn recent_points(mut self, n: usize) -> Self {
        self.recent_points = n;
        self
    }

    /// Opens or recovers a database.
    ///
    /// If you have a keyspace already in your application, you may
    /// want to use `open_in_keyspace` instead.
    ///
    /// # Errors
    ///
    /// Returns error if an I/O error occurred.
    pub fn open<P: AsRef<Path>>(self, path: P) -> crate::Result<Database> {
        let keyspace = fjall::Config::new(path)
            .cache_size(self.cache_size_mib * 1_024 * 1_024)
            .open()?;

        Ok(self.open_in_keyspace(keyspace))
    }

    /// Uses an existing `fjall` keyspace to open a database.
    ///
    /// Partitions are prefixed with `_rollup#` to avoid name clashes with other applications.
    #[must_use]
    pub fn open_in_keyspace(self, keyspace: Keyspace) -> Database {
        Database::from_keyspace(keyspace, self.recent_points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AggregationMethod, MetricKey, Point, Retention};

    #[test_log::test]
    fn builder_recover() -> crate::Result<()> {
        let dir = tempfile::tempdir()?;

        {
            let db = Database::builder().cache_size_mib(8).open(&dir)?;
            db.register(
                MetricKey::try_from("mem.used")?,
                &[Retention::new(1, 60), Retention::new(5, 60)],
                &[AggregationMethod::Max],
            )?;

            for ts in 1..=10 {
                db.write("mem.used", ts, f64::from(ts))?;
            }

            db.persist()?;
        }

        let db = Database::builder().recent_points(0).open(&dir)?;

        assert_eq!(
            vec![Point { ts: 5, value: 5.0 }, Point { ts: 10, value: 10.0 }],
            db.points("mem.used_max_5", 0, 100)?,
        );
        assert!(db.cached("mem.used_max_5").is_empty());

        // NOTE: Aggregation state is not recovered
        assert!(!db.contains("mem.used"));

        Ok(())
    }

    #[test_log::test]
    fn builder_in_keyspace() -> crate::Result<()> {
        let dir = tempfile::tempdir()?;
        let keyspace = fjall::Config::new(&dir).open()?;

        let db = Database::builder().open_in_keyspace(keyspace.clone());
        db.register(
            MetricKey::try_from("disk.io")?,
            &[Retention::new(1, 60)],
            &[],
        )?;
        db.write("disk.io", 1, 1.0)?;

        assert!(keyspace.partition_exists("_rollup#disk.io"));

        Ok(())
    }
}
