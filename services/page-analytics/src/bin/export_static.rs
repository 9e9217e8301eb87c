//! 导出前端静态数据
//!
//! 用法：`export-static [输出路径]`，缺省写到 `export.output_path`

use std::path::PathBuf;

use page_analytics::application::{AnalyticsQueryHandler, AnalyticsSettings};
use page_analytics::postgres_repositories;
use pagepulse_bootstrap::{init_runtime, Infrastructure};
use pagepulse_config::AppConfig;
use pagepulse_errors::AppError;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load("config")?;
    init_runtime(&config);

    let output: PathBuf = std::env::args()
        .nth(1)
        .unwrap_or_else(|| config.export.output_path.clone())
        .into();
    let top_limit = config.analytics.top_posts_limit;
    let settings = AnalyticsSettings::from(&config.analytics);

    let infra = Infrastructure::from_config(config).await?;
    let handler = AnalyticsQueryHandler::new(postgres_repositories(infra.postgres_pool()), settings);
    let snapshot = handler.handle_export(top_limit).await?;

    let body = serde_json::to_vec_pretty(&snapshot)
        .map_err(|e| AppError::internal(format!("Failed to serialize snapshot: {}", e)))?;
    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(&output, body).await?;

    info!(
        path = %output.display(),
        posts = snapshot.stats.all.total_posts,
        pages = snapshot.pages.len(),
        per_page = snapshot.stats.by_page.len(),
        daily_points = snapshot.daily.all.len(),
        "Static analytics exported"
    );
    Ok(())
}
