//! Facebook Graph API 适配器

mod client;
mod models;

pub use client::GraphApiClient;
pub use models::classify_post_type;
