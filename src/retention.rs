use crate::Timestamp;

/// Resolution and length of one level of a metric's data.
///
/// The first retention of a metric holds the raw data, every following
/// retention is a rollup whose span is its seconds per point.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Retention {
    seconds_per_point: u32,
    number_of_points: u32,
}

impl Retention {
    /// Creates a retention.
    #[must_use]
    pub const fn new(seconds_per_point: u32, number_of_points: u32) -> Self {
        Self {
            seconds_per_point,
            number_of_points,
        }
    }

    /// Seconds per point, the aggregation span of this level.
    #[must_use]
    pub const fn span(&self) -> Timestamp {
        self.seconds_per_point
    }

    /// Number of points kept.
    #[must_use]
    pub const fn number_of_points(&self) -> u32 {
        self.number_of_points
    }

    /// Time range covered by this level in seconds.
    #[must_use]
    pub const fn ttl(&self) -> u32 {
        self.seconds_per_point.saturating_mul(self.number_of_points)
    }
}

impl std::fmt::Display for Retention {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}s:{}", self.seconds_per_point, self.number_of_points)
    }
}
