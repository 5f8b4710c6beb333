use crate::Timestamp;
use std::time::{SystemTime, UNIX_EPOCH};

/// Returns the current unix timestamp in seconds.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn timestamp() -> Timestamp {
    let start = SystemTime::now();
    let since_the_epoch = start
        .duration_since(UNIX_EPOCH)
        .expect("Time went backwards");

    since_the_epoch.as_secs() as Timestamp
}

/// Returns `ts` if it is a boundary, or the next boundary otherwise.
///
/// A boundary is a multiple of `span`. All points with timestamps in
/// `(boundary - span, boundary]` get aggregated into a point at `boundary`,
/// so an aggregated point reflects the data in the time frame preceding it.
///
/// `span` must not be zero.
///
/// ```
/// use rollup::boundary;
///
/// assert_eq!(10, boundary(1, 10));
/// assert_eq!(10, boundary(10, 10));
/// assert_eq!(20, boundary(11, 10));
/// ```
///
/// # Panics
///
/// Panics if the boundary does not fit into a [`Timestamp`],
/// see [`checked_boundary`].
#[must_use]
pub const fn boundary(ts: Timestamp, span: Timestamp) -> Timestamp {
    match checked_boundary(ts, span) {
        Some(b) => b,
        None => panic!("boundary overflows timestamp"),
    }
}

/// Like [`boundary`], but returns `None` if the boundary is past [`Timestamp::MAX`].
///
/// ```
/// use rollup::checked_boundary;
///
/// assert_eq!(Some(4_294_967_290), checked_boundary(4_294_967_290, 10));
/// assert_eq!(None, checked_boundary(u32::MAX, 10));
/// ```
#[must_use]
pub const fn checked_boundary(ts: Timestamp, span: Timestamp) -> Option<Timestamp> {
    let rem = ts % span;

    if rem == 0 {
        Some(ts)
    } else {
        ts.checked_add(span - rem)
    }
}
