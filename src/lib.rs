//! A rollup engine for time series.
//!
//! Raw `(timestamp, value)` samples of a metric are written as-is, and rolled up
//! on the fly into lower resolution series (min, max, sum, count, last), quantized
//! to fixed window boundaries. No raw data is buffered: every rollup level keeps
//! one running aggregate per metric and emits a point as soon as its window is complete.
//!
//! Series are stored in <https://github.com/fjall-rs/fjall>, one partition per series.
//!
//! A derived series is named `<key>_<tag>_<span>`, where the tag is one of
//! `min`, `max`, `sum`, `cnt` and `lst`. Averages are not stored, they are
//! recovered as `sum / cnt`.
//!
//! ```
//! # let dir = tempfile::tempdir()?;
//! # let path = dir.path();
//! #
//! use rollup::{AggregationMethod, Database, MetricKey, Retention};
//!
//! let db = Database::builder().open(path)?;
//!
//! db.register(
//!     MetricKey::try_from("cpu.total")?,
//!     &[
//!         Retention::new(10, 360),  // raw data: 10s resolution for 1 hour
//!         Retention::new(60, 1_440), // rollup: 1 minute resolution for 1 day
//!     ],
//!     &[AggregationMethod::Average, AggregationMethod::Max],
//! )?;
//!
//! db.write("cpu.total", 20, 25.0)?;
//! db.write("cpu.total", 40, 42.0)?;
//! db.write("cpu.total", 60, 40.0)?; // closes the window (0, 60]
//!
//! let sum = db.points("cpu.total_sum_60", 0, 60)?;
//! let cnt = db.points("cpu.total_cnt_60", 0, 60)?;
//! let max = db.points("cpu.total_max_60", 0, 60)?;
//!
//! assert_eq!(107.0, sum[0].value);
//! assert_eq!(3.0, cnt[0].value);
//! assert_eq!(42.0, max[0].value);
//! assert_eq!(60, max[0].ts);
//! #
//! # Ok::<(), rollup::Error>(())
//! ```

#![forbid(unsafe_code)]
#![deny(clippy::all, missing_docs, clippy::cargo)]
#![deny(clippy::unwrap_used)]
#![warn(clippy::indexing_slicing)]
#![warn(clippy::pedantic, clippy::nursery)]
#![warn(clippy::expect_used)]
#![allow(clippy::missing_const_for_fn)]
#![warn(clippy::multiple_crate_versions)]
#![warn(clippy::result_unit_err)]

mod agg;
mod agg_metric;
mod cache;
mod db;
mod db_builder;
mod duration;
mod error;
mod metric;
mod metric_key;
mod retention;

#[doc(hidden)]
pub mod series_name;

mod sink;
mod store;
mod time;

type HashMap<K, V> = std::collections::HashMap<K, V, rustc_hash::FxBuildHasher>;

pub use agg::{AggregationMethod, Aggregator, Series, Window};
pub use agg_metric::AggMetric;
pub use cache::{CachePusher, RecentCache};
pub use db::Database;
pub use db_builder::Builder;
pub use duration::Duration;
pub use error::{Error, Result};
pub use metric::Metric;
pub use metric_key::MetricKey;
pub use retention::Retention;
pub use sink::{Point, Sink};
pub use store::{FjallStore, Store};
pub use time::{boundary, checked_boundary, timestamp};

/// Unix timestamp in seconds
pub type Timestamp = u32;

/// Value used in time series
pub type Value = f64;
