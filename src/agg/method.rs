use enum_map::{Enum, EnumMap};

/// Aggregation method requested for a metric.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum AggregationMethod {
    /// Average, derived downstream as `sum / cnt`
    Average,

    /// Sum of all values
    Sum,

    /// Last value
    Last,

    /// Maximum value
    Max,

    /// Minimum value
    Min,
}

impl AggregationMethod {
    /// Derived series needed to answer this method.
    ///
    /// Average is not stored itself, it is recovered from sum and count.
    #[must_use]
    pub const fn required_series(self) -> &'static [Series] {
        match self {
            Self::Average => &[Series::Sum, Series::Cnt],
            Self::Sum => &[Series::Sum],
            Self::Last => &[Series::Lst],
            Self::Max => &[Series::Max],
            Self::Min => &[Series::Min],
        }
    }

    /// Resolves a list of methods into the deduplicated set of derived series.
    #[must_use]
    pub fn resolve(methods: &[Self]) -> EnumMap<Series, bool> {
        let mut set = EnumMap::default();

        for series in methods.iter().flat_map(|method| method.required_series()) {
            set[*series] = true;
        }

        set
    }
}

/// A derived series produced by an aggregator.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Enum)]
pub enum Series {
    /// Minimum per window
    Min,

    /// Maximum per window
    Max,

    /// Sum per window
    Sum,

    /// Number of values per window
    Cnt,

    /// Last value per window
    Lst,
}

impl Series {
    /// Tag used in the name of the derived series.
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Min => "min",
            Self::Max => "max",
            Self::Sum => "sum",
            Self::Cnt => "cnt",
            Self::Lst => "lst",
        }
    }
}

impl std::fmt::Display for Series {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.tag())
    }
}
