//! pagepulse-bootstrap - 统一服务启动骨架
//!
//! 所有 HTTP 服务复用的启动逻辑

mod health;
mod infrastructure;
mod metrics;
mod runtime;
mod shutdown;
mod starter;

pub use health::*;
pub use infrastructure::*;
pub use self::metrics::*;
pub use runtime::*;
pub use shutdown::*;
pub use starter::*;
