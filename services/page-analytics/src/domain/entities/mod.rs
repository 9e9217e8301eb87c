//! Domain entities

mod audience_overlap;
mod csv_import;
mod page;
mod post;
mod post_metrics;

pub use audience_overlap::*;
pub use csv_import::*;
pub use page::*;
pub use post::*;
pub use post_metrics::*;
