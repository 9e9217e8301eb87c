//! page-analytics 服务入口

use page_analytics::{api::build_router, build_state, migrations};
use pagepulse_bootstrap::Infrastructure;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    pagepulse_bootstrap::run("config", migrations(), |infra: Infrastructure| async move {
        let config = infra.config();
        let state = build_state(config, infra.postgres_pool())?;

        info!(
            timezone = %config.analytics.timezone,
            max_upload_bytes = config.import.max_upload_bytes,
            "Page analytics routes ready"
        );
        Ok(build_router(state, config.import.max_upload_bytes))
    })
    .await
}
