/// Helpers for calculating durations in seconds
///
/// ```
/// use rollup::{Duration, Retention};
///
/// // 10 second raw points for a day, 10 minute rollups for a month
/// let raw = Retention::new(10, Duration::days(1) / 10);
/// let rollup = Retention::new(Duration::minutes(10), Duration::days(30) / Duration::minutes(10));
///
/// assert_eq!(600, rollup.span());
/// assert_eq!(Duration::days(1), raw.ttl());
/// ```
pub struct Duration;

impl Duration {
    /// Formats N weeks as seconds.
    #[must_use]
    pub const fn weeks(n: u32) -> u32 {
        Self::days(n) * 7
    }

    /// Formats N days as seconds.
    #[must_use]
    pub const fn days(n: u32) -> u32 {
        Self::hours(n) * 24
    }

    /// Formats N hours as seconds.
    #[must_use]
    pub const fn hours(n: u32) -> u32 {
        Self::minutes(n) * 60
    }

    /// Formats N minutes as seconds.
    #[must_use]
    pub const fn minutes(n: u32) -> u32 {
        Self::seconds(n) * 60
    }

    /// Formats N seconds as seconds.
    #[must_use]
    pub const fn seconds(n: u32) -> u32 {
        n
    }
}
