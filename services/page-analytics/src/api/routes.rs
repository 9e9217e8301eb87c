//! 路由定义

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use super::handlers;
use super::state::AppState;

/// 业务路由；健康检查与公共中间件由 bootstrap 叠加
pub fn build_router(state: AppState, max_upload_bytes: usize) -> Router {
    Router::new()
        .route("/api/v1/stats", get(handlers::dashboard_stats))
        .route("/api/v1/stats/dashboard", get(handlers::dashboard_stats))
        .route("/api/v1/stats/daily", get(handlers::daily_stats))
        .route("/api/v1/stats/post-types", get(handlers::post_type_stats))
        .route("/api/v1/stats/top-posts", get(handlers::top_posts))
        .route("/api/v1/stats/pages", get(handlers::page_comparison))
        .route("/api/v1/stats/daily-by-page", get(handlers::daily_by_page))
        .route("/api/v1/pages", get(handlers::list_pages))
        .route("/api/v1/pages/{page_id}", get(handlers::get_page))
        .route("/api/v1/pages/{page_id}/sync", post(handlers::sync_page))
        .route("/api/v1/posts", get(handlers::list_posts))
        .route("/api/v1/posts/latest", get(handlers::latest_post))
        .route("/api/v1/posts/{post_id}", get(handlers::get_post))
        .route(
            "/api/v1/imports",
            get(handlers::list_imports).post(handlers::import_csv),
        )
        .route("/api/v1/imports/validate", post(handlers::validate_csv))
        .route("/api/v1/imports/manual", post(handlers::import_manual_export))
        .route("/api/v1/maintenance/dedupe", post(handlers::cleanup_duplicates))
        .route(
            "/api/v1/overlaps",
            get(handlers::list_overlaps).post(handlers::analyze_overlap),
        )
        .route("/api/v1/export/analytics.json", get(handlers::export_snapshot))
        .route("/api/v1/database/stats", get(handlers::database_stats))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .with_state(state)
}
