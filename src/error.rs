use crate::Timestamp;

/// Error type
#[derive(Debug)]
pub enum Error {
    /// An IO error.
    Io(std::io::Error),

    /// Error in storage engine.
    Storage(fjall::Error),

    /// Metric key contains unsupported characters, is empty or too long.
    InvalidMetricKey,

    /// Series name cannot be used as a storage partition name.
    InvalidSeriesName(String),

    /// A timestamp has no window boundary representable as a `u32`.
    TimestampOutOfRange {
        /// Rejected timestamp
        ts: Timestamp,

        /// Aggregation span
        span: Timestamp,
    },

    /// Aggregation span (seconds per point) was zero.
    InvalidSpan,

    /// A metric was registered without any retention.
    NoRetentions(String),

    /// An aggregator was constructed without any aggregation method.
    ///
    /// This is a configuration error of the given metric.
    NoAggregationMethods(String),

    /// A sample mapped to a window that has already been closed.
    ///
    /// The ingestion path guarantees monotonic window progression per metric,
    /// so this is an unrecoverable ordering violation.
    BoundaryRegression {
        /// Metric key of the aggregator
        key: String,

        /// Boundary the rejected sample maps to
        boundary: Timestamp,

        /// Boundary of the open window
        current: Timestamp,
    },

    /// Write to a metric that was never registered.
    UnknownMetric(String),
}

impl From<fjall::Error> for Error {
    fn from(value: fjall::Error) -> Self {
        Self::Storage(value)
    }
}

impl From<std::io::Error> for Error {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Storage(e) => {
                write!(f, "{e}")
            }
            Self::Io(e) => {
                write!(f, "{e}")
            }
            Self::InvalidMetricKey => {
                write!(f, "InvalidMetricKey")
            }
            Self::InvalidSeriesName(series) => {
                write!(f, "invalid series name {series:?}")
            }
            Self::TimestampOutOfRange { ts, span } => {
                write!(f, "timestamp {ts} has no boundary for span {span}")
            }
            Self::InvalidSpan => {
                write!(f, "InvalidSpan")
            }
            Self::NoRetentions(key) => {
                write!(f, "metric {key:?} registered without retentions")
            }
            Self::NoAggregationMethods(key) => {
                write!(f, "aggregator for {key:?} created without aggregation methods")
            }
            Self::BoundaryRegression {
                key,
                boundary,
                current,
            } => {
                write!(
                    f,
                    "aggregator for {key:?}: boundary {boundary} < current boundary {current}"
                )
            }
            Self::UnknownMetric(key) => {
                write!(f, "metric {key:?} is not registered")
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Storage(e) => Some(e),
            _ => None,
        }
    }
}

/// Result helper type
pub type Result<T> = std::result::Result<T, Error>;
