use crate::{Error, HashMap, Point, Timestamp};
use byteorder::{BigEndian, ReadBytesExt};
use fjall::{CompressionType, Keyspace, PartitionCreateOptions, PartitionHandle, PersistMode};
use std::sync::RwLock;

const PARTITION_PREFIX: &str = "_rollup#";

/// Same rules `fjall` asserts on when opening a partition
fn is_valid_partition_name(name: &str) -> bool {
    !name.is_empty()
        && name.len() <= 255
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.' | '#' | '$'))
}

/// Persistence backend of series data.
pub trait Store: Send + Sync {
    /// Persists a point of the given series.
    ///
    /// # Errors
    ///
    /// Returns error if an I/O error occurred.
    fn persist(&self, series: &str, point: Point) -> crate::Result<()>;

    /// Returns the points of a series in `[from, to]`, ordered by timestamp.
    ///
    /// # Errors
    ///
    /// Returns error if an I/O error occurred.
    fn range(&self, series: &str, from: Timestamp, to: Timestamp) -> crate::Result<Vec<Point>>;
}

/// Stores every series in its own partition of a `fjall` keyspace.
///
/// Keys are big-endian timestamps, so a partition scan yields points in
/// timestamp order. Writing the same timestamp twice keeps the latest value.
pub struct FjallStore {
    keyspace: Keyspace,
    series: RwLock<HashMap<String, PartitionHandle>>,
}

impl FjallStore {
    /// Uses an existing keyspace.
    #[must_use]
    pub fn new(keyspace: Keyspace) -> Self {
        Self {
            keyspace,
            series: RwLock::default(),
        }
    }

    fn partition_name(series: &str) -> crate::Result<String> {
        let name = format!("{PARTITION_PREFIX}{series}");

        if is_valid_partition_name(&name) {
            Ok(name)
        } else {
            Err(Error::InvalidSeriesName(series.into()))
        }
    }

    fn get_partition(&self, series: &str) -> crate::Result<PartitionHandle> {
        if let Some(partition) = self.series.read().expect("lock is poisoned").get(series) {
            return Ok(partition.clone());
        }

        let mut lock = self.series.write().expect("lock is poisoned");

        // NOTE: Another writer may have opened it in the meantime
        if let Some(partition) = lock.get(series) {
            return Ok(partition.clone());
        }

        let name = Self::partition_name(series)?;

        log::debug!("opening partition for series {series:?}");

        let partition = self.keyspace.open_partition(
            &name,
            PartitionCreateOptions::default()
                .block_size(16_000)
                .compression(CompressionType::Lz4),
        )?;

        lock.insert(series.to_owned(), partition.clone());

        Ok(partition)
    }

    /// Flushes all pending writes to disk.
    ///
    /// # Errors
    ///
    /// Returns error if an I/O error occurred.
    pub fn persist_all(&self) -> crate::Result<()> {
        self.keyspace.persist(PersistMode::SyncAll)?;
        Ok(())
    }
}

impl Store for FjallStore {
    fn persist(&self, series: &str, point: Point) -> crate::Result<()> {
        let partition = self.get_partition(series)?;
        partition.insert(point.ts.to_be_bytes(), point.value.to_be_bytes())?;
        Ok(())
    }

    fn range(&self, series: &str, from: Timestamp, to: Timestamp) -> crate::Result<Vec<Point>> {
        let name = Self::partition_name(series)?;

        if from > to {
            return Ok(vec![]);
        }

        let is_open = self
            .series
            .read()
            .expect("lock is poisoned")
            .contains_key(series);

        // NOTE: Don't create partitions on read
        if !is_open && !self.keyspace.partition_exists(&name) {
            return Ok(vec![]);
        }

        let partition = self.get_partition(series)?;

        partition
            .range(from.to_be_bytes()..=to.to_be_bytes())
            .map(|kv| -> crate::Result<Point> {
                let (k, v) = kv?;

                let mut k = &k[..];
                let mut v = &v[..];

                Ok(Point {
                    ts: k.read_u32::<BigEndian>()?,
                    value: v.read_f64::<BigEndian>()?,
                })
            })
            .collect()
    }
}
