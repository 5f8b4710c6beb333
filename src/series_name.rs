use crate::Timestamp;

#[doc(hidden)]
pub struct SeriesName;

impl SeriesName {
    #[doc(hidden)]
    #[must_use]
    pub fn allocate(key: &str, extra_len: usize) -> String {
        String::with_capacity(key.len() + extra_len)
    }

    /// Formats the name of a derived series: `<key>_<tag>_<span>`.
    #[must_use]
    pub fn format(key: &str, tag: &str, span: Timestamp) -> String {
        use std::fmt::Write;

        // +2 for the underscores, +10 for the largest u32
        let mut str = Self::allocate(key, tag.len() + 2 + 10);
        str.push_str(key);
        str.push('_');
        str.push_str(tag);
        str.push('_');

        // NOTE: Writing into a String cannot fail
        let _ = write!(str, "{span}");

        str
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test_log::test]
    fn create_series_name() {
        assert_eq!("cpu.total_sum_600", SeriesName::format("cpu.total", "sum", 600));
    }

    #[test_log::test]
    fn create_series_name_2() {
        assert_eq!(
            "1.2d5f8b2b_cnt_3600",
            SeriesName::format("1.2d5f8b2b", "cnt", 3_600),
        );
    }
}
