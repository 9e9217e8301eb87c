//! page-analytics - Facebook 主页互动数据分析服务
//!
//! 导入 Meta Business Suite CSV 导出与 Graph API 数据，聚合后提供给仪表盘前端

pub mod api;
pub mod application;
pub mod domain;
pub mod infrastructure;

use std::sync::Arc;

use pagepulse_adapter_postgres::Migration;
use pagepulse_config::AppConfig;
use pagepulse_errors::AppResult;
use sqlx::PgPool;
use tracing::info;

use api::AppState;
use application::{AnalyticsSettings, Repositories};
use domain::services::SocialGraphSource;
use infrastructure::graph_api::GraphApiClient;
use infrastructure::persistence::{
    PostgresImportRepository, PostgresOverlapRepository, PostgresPageRepository,
    PostgresPostMetricsRepository, PostgresPostRepository, PostgresUnitOfWorkFactory,
};

/// 服务的数据库迁移，按版本号顺序
pub fn migrations() -> Vec<Migration> {
    vec![
        Migration::new(
            1,
            "create_pages",
            include_str!("../migrations/0001_create_pages.sql"),
        ),
        Migration::new(
            2,
            "create_posts",
            include_str!("../migrations/0002_create_posts.sql"),
        ),
        Migration::new(
            3,
            "create_post_metrics",
            include_str!("../migrations/0003_create_post_metrics.sql"),
        ),
        Migration::new(
            4,
            "create_csv_imports",
            include_str!("../migrations/0004_create_csv_imports.sql"),
        ),
        Migration::new(
            5,
            "create_audience_overlaps",
            include_str!("../migrations/0005_create_audience_overlaps.sql"),
        ),
    ]
}

/// PostgreSQL 仓储
pub fn postgres_repositories(pool: PgPool) -> Repositories {
    Repositories {
        pages: Arc::new(PostgresPageRepository::new(pool.clone())),
        posts: Arc::new(PostgresPostRepository::new(pool.clone())),
        metrics: Arc::new(PostgresPostMetricsRepository::new(pool.clone())),
        imports: Arc::new(PostgresImportRepository::new(pool.clone())),
        overlaps: Arc::new(PostgresOverlapRepository::new(pool.clone())),
        uow_factory: Arc::new(PostgresUnitOfWorkFactory::new(pool)),
    }
}

/// 按配置组装 HTTP 层状态
pub fn build_state(config: &AppConfig, pool: PgPool) -> AppResult<AppState> {
    let source: Arc<dyn SocialGraphSource> = Arc::new(GraphApiClient::new(&config.facebook)?);
    info!(
        graph_url = %config.facebook.graph_url,
        api_version = %config.facebook.api_version,
        pages_with_tokens = config.facebook.page_tokens.len(),
        "Graph API client ready"
    );

    Ok(AppState::new(
        postgres_repositories(pool),
        Some(source),
        config.facebook.page_tokens.clone(),
        AnalyticsSettings::from(&config.analytics),
    ))
}
