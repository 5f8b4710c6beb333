mod aggregator;
mod method;
mod window;

pub use aggregator::Aggregator;
pub use method::{AggregationMethod, Series};
pub use window::Window;
