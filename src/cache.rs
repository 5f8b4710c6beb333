use crate::{HashMap, Point};
use std::{collections::VecDeque, sync::RwLock};

/// Write-through cache population.
pub trait CachePusher: Send + Sync {
    /// Pushes a freshly written point of a series into the cache.
    fn push(&self, series: &str, point: Point);
}

/// Keeps the most recent points of every series in memory.
pub struct RecentCache {
    capacity: usize,
    series: RwLock<HashMap<String, VecDeque<Point>>>,
}

impl RecentCache {
    /// Creates a cache holding up to `capacity` points per series.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            series: RwLock::default(),
        }
    }

    /// Returns the cached points of a series, oldest first.
    #[must_use]
    pub fn get(&self, series: &str) -> Vec<Point> {
        self.series
            .read()
            .expect("lock is poisoned")
            .get(series)
            .map(|points| points.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Number of cached series.
    #[must_use]
    pub fn len(&self) -> usize {
        self.series.read().expect("lock is poisoned").len()
    }

    /// Returns `true` if nothing was cached yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl CachePusher for RecentCache {
    fn push(&self, series: &str, point: Point) {
        if self.capacity == 0 {
            return;
        }

        let mut lock = self.series.write().expect("lock is poisoned");

        if !lock.contains_key(series) {
            lock.insert(series.to_owned(), VecDeque::with_capacity(self.capacity));
        }

        let Some(points) = lock.get_mut(series) else {
            return;
        };

        if points.len() == self.capacity {
            points.pop_front();
        }
        points.push_back(point);
    }
}
