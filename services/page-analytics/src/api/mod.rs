//! HTTP API 层

pub mod dto;
pub mod extract;
pub mod handlers;
pub mod routes;
pub mod state;
pub mod upload;

pub use routes::build_router;
pub use state::AppState;
