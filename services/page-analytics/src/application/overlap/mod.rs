//! 受众重叠分析

pub mod commands;
pub mod handlers;

pub use commands::*;
pub use handlers::OverlapCommandHandler;
