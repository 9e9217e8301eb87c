//! CSV 导入应用层

pub mod commands;
pub mod handlers;
pub mod query_handlers;

pub use commands::*;
pub use handlers::ImportCommandHandler;
pub use query_handlers::ImportQueryHandler;
