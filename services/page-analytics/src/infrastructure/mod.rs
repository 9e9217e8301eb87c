//! 基础设施层

pub mod csv;
pub mod graph_api;
pub mod persistence;
