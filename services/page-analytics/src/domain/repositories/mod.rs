//! 仓储接口

mod import_repository;
mod overlap_repository;
mod page_repository;
mod post_metrics_repository;
mod post_repository;

pub use import_repository::*;
pub use overlap_repository::*;
pub use page_repository::*;
pub use post_metrics_repository::*;
pub use post_repository::*;
