//! Value objects

mod counters;
mod ids;

pub use counters::*;
pub use ids::*;
