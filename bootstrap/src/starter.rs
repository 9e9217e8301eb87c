//! 服务启动器
//!
//! 提供统一的 HTTP 服务启动模式

use std::future::Future;
use std::net::SocketAddr;

use axum::{middleware, Router};
use pagepulse_adapter_postgres::Migration;
use pagepulse_config::AppConfig;
use pagepulse_errors::AppResult;
use pagepulse_telemetry::init_metrics;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

use crate::health::HealthChecker;
use crate::infrastructure::Infrastructure;
use crate::metrics::track_http_metrics;
use crate::runtime::init_runtime;
use crate::shutdown::shutdown_signal;

/// 组装最终的 HTTP 应用：业务路由 + 健康检查 + 公共中间件
///
/// 仪表盘前端部署在其他域名下，CORS 全放开
pub fn build_http_app(service_router: Router, health: HealthChecker) -> Router {
    service_router
        .merge(health.routes())
        .layer(middleware::from_fn(track_http_metrics))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// 运行 HTTP 服务
///
/// 所有服务的统一入口点：
/// 1. 加载配置
/// 2. 初始化运行时（日志、metrics）
/// 3. 创建数据库连接池并执行迁移
/// 4. 调用闭包构建业务路由
/// 5. 启动服务器并处理 graceful shutdown
///
/// # 示例
///
/// ```ignore
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     pagepulse_bootstrap::run("config", migrations(), |infra| async move {
///         Ok(build_router(infra))
///     })
///     .await
/// }
/// ```
pub async fn run<F, Fut>(
    config_dir: &str,
    migrations: Vec<Migration>,
    router_builder: F,
) -> Result<(), Box<dyn std::error::Error>>
where
    F: FnOnce(Infrastructure) -> Fut,
    Fut: Future<Output = AppResult<Router>>,
{
    let config = AppConfig::load(config_dir)?;
    init_runtime(&config);

    info!("Starting {} service", config.app_name);

    let metrics = init_metrics()?;

    let infra = Infrastructure::from_config(config.clone()).await?;
    infra.run_migrations(&migrations).await?;

    let health = HealthChecker::new(infra.postgres_pool(), metrics);
    let service_router = router_builder(infra).await?;
    let app = build_http_app(service_router, health);

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!(%addr, "HTTP server starting");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Service stopped");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, routing::get};
    use http::{Request, StatusCode};
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_app_merges_service_and_health_routes() {
        let service = Router::new().route("/api/v1/ping", get(|| async { "pong" }));
        let app = build_http_app(service, HealthChecker::default());

        let response = app
            .clone()
            .oneshot(Request::get("/api/v1/ping").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_cors_headers_present() {
        let service = Router::new().route("/api/v1/ping", get(|| async { "pong" }));
        let app = build_http_app(service, HealthChecker::default());

        let response = app
            .oneshot(
                Request::get("/api/v1/ping")
                    .header("origin", "https://dashboard.example.com")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert!(response
            .headers()
            .contains_key("access-control-allow-origin"));
    }
}
