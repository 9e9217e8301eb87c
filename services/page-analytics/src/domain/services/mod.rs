//! Domain services
//!
//! 纯函数实现，不依赖数据库，便于单元测试

pub mod aggregation;
pub mod deduplication;
pub mod graph_source;
pub mod manual_matching;
pub mod overlap;
pub mod reporting_time;

pub use aggregation::*;
pub use deduplication::*;
pub use graph_source::*;
pub use manual_matching::*;
pub use overlap::*;
pub use reporting_time::*;
