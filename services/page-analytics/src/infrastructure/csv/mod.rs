//! Meta Business Suite CSV 导出解析

mod cells;
mod columns;
mod reader;

pub use cells::*;
pub use columns::*;
pub use reader::*;
