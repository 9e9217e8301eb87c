//! 统计查询

pub mod queries;
pub mod query_handlers;

pub use queries::*;
pub use query_handlers::{AnalyticsQueryHandler, PostDetail};
