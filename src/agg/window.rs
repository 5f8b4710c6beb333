use super::Series;
use crate::Value;

/// Running aggregate of one open aggregation window.
///
/// `cnt == 0` marks an empty window; the other fields are meaningless until
/// the first value is added.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Window {
    min: Value,
    max: Value,
    sum: Value,
    cnt: u64,
    lst: Value,
}

impl Window {
    /// Adds a value to the window.
    pub fn add(&mut self, value: Value) {
        if self.cnt == 0 {
            // NOTE: First value since reset
            self.min = value;
            self.max = value;
            self.sum = value;
            self.lst = value;
        } else {
            self.min = self.min.min(value);
            self.max = self.max.max(value);
            self.sum += value;
            self.lst = value;
        }

        self.cnt += 1;
    }

    /// Clears the window.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Returns `true` if no value was added since the last reset.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cnt == 0
    }

    /// Number of values in the window.
    #[must_use]
    pub fn count(&self) -> u64 {
        self.cnt
    }

    /// Returns the aggregate that feeds the given derived series.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn get(&self, series: Series) -> Value {
        match series {
            Series::Min => self.min,
            Series::Max => self.max,
            Series::Sum => self.sum,
            Series::Cnt => self.cnt as Value,
            Series::Lst => self.lst,
        }
    }
}
