//! 聚合结果视图
//!
//! 字段名与前端图表组件约定一致（snake_case）

mod dashboard;
mod page;

pub use dashboard::*;
pub use page::*;
