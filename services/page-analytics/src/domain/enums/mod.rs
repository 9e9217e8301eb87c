//! Domain enums

mod import;
mod metric_source;
mod post_type;

pub use import::*;
pub use metric_source::*;
pub use post_type::*;
