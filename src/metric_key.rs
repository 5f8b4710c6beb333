use crate::Series;
use enum_map::Enum;

/// Longest key whose derived series still fit into a partition name:
/// `_rollup#` + key + `_cnt_` + 10 digits of span <= 255
pub(crate) const MAX_KEY_LEN: usize = 232;

fn is_key_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-')
}

/// Returns `true` if the key looks like a derived series name (`<key>_<tag>_<span>`).
fn is_derived_name(key: &str) -> bool {
    let mut parts = key.rsplitn(3, '_');

    let (Some(span), Some(tag), Some(base)) = (parts.next(), parts.next(), parts.next()) else {
        return false;
    };

    !base.is_empty()
        && !span.is_empty()
        && span.bytes().all(|b| b.is_ascii_digit())
        && (0..Series::LENGTH).any(|idx| Series::from_usize(idx).tag() == tag)
}

/// A metric's key.
///
/// Characters supported: a-z A-Z 0-9 . _ -
///
/// Keys are at most 232 bytes long, and must not end in `_<tag>_<digits>`
/// (e.g. `cpu_sum_60`), which would collide with the derived series of
/// another metric.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, std::hash::Hash, Debug)]
pub struct MetricKey<'a>(&'a str);

impl std::fmt::Display for MetricKey<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl<'a> TryFrom<&'a str> for MetricKey<'a> {
    type Error = crate::Error;

    fn try_from(value: &'a str) -> Result<Self, Self::Error> {
        if value.is_empty()
            || value.len() > MAX_KEY_LEN
            || !value.chars().all(is_key_char)
            || is_derived_name(value)
        {
            Err(crate::Error::InvalidMetricKey)
        } else {
            Ok(Self(value))
        }
    }
}

impl std::ops::Deref for MetricKey<'_> {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        self.0
    }
}

impl AsRef<str> for MetricKey<'_> {
    fn as_ref(&self) -> &str {
        self.0
    }
}
