pub mod model;
pub mod aggregator;
pub mod progress;
pub mod error;
pub mod export;
pub mod human;

pub use model::*;
pub use aggregator::*;
pub use progress::*;
pub use error::AggregateError;
