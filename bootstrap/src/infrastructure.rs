//! 基础设施资源管理

use std::sync::Arc;

use pagepulse_adapter_postgres::{
    create_pool_with_retry, Migration, MigrationManager, PostgresConfig,
};
use pagepulse_common::RetryPolicy;
use pagepulse_config::AppConfig;
use pagepulse_errors::{AppError, AppResult};
use secrecy::ExposeSecret;
use sqlx::PgPool;
use std::time::Duration;
use tracing::{error, info};

/// 基础设施资源容器
///
/// 由 bootstrap 统一初始化，克隆开销很小（内部均为 Arc / 连接池句柄）
#[derive(Clone)]
pub struct Infrastructure {
    config: Arc<AppConfig>,
    postgres_pool: PgPool,
}

impl Infrastructure {
    /// 从配置创建基础设施资源（带重试）
    pub async fn from_config(config: AppConfig) -> AppResult<Self> {
        let pg_config = PostgresConfig::new(config.database.url.expose_secret())
            .with_max_connections(config.database.max_connections);
        let policy = RetryPolicy::new(5, Duration::from_secs(1), Duration::from_secs(30));
        let postgres_pool = create_pool_with_retry(&pg_config, &policy).await?;

        Ok(Self {
            config: Arc::new(config),
            postgres_pool,
        })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn postgres_pool(&self) -> PgPool {
        self.postgres_pool.clone()
    }

    /// 执行服务的数据库迁移
    pub async fn run_migrations(&self, migrations: &[Migration]) -> AppResult<()> {
        if !self.config.database.run_migrations {
            info!("Automatic migrations disabled");
            return Ok(());
        }

        let result = MigrationManager::new(self.postgres_pool())
            .migrate(migrations)
            .await?;

        for failure in &result.errors {
            error!(
                version = failure.version,
                name = %failure.name,
                error = %failure.error,
                "Migration failed"
            );
        }
        if !result.is_success() {
            return Err(AppError::internal(format!(
                "{} migration(s) failed",
                result.errors.len()
            )));
        }

        info!(
            applied = result.applied_count(),
            skipped = result.skipped.len(),
            "Database migrations complete"
        );
        Ok(())
    }
}
