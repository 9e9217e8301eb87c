//! 健康检查模块
//!
//! 提供 /health、/ready 和 /metrics 端点

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use pagepulse_adapter_postgres::check_connection;
use pagepulse_telemetry::HealthStatus;
use sqlx::PgPool;

/// 健康检查器
#[derive(Clone, Default)]
pub struct HealthChecker {
    pool: Option<PgPool>,
    metrics: Option<PrometheusHandle>,
}

impl HealthChecker {
    pub fn new(pool: PgPool, metrics: PrometheusHandle) -> Self {
        Self {
            pool: Some(pool),
            metrics: Some(metrics),
        }
    }

    /// 存活检查（liveness），不检查依赖
    pub fn liveness(&self) -> HealthStatus {
        HealthStatus::new()
    }

    /// 就绪检查（readiness），检查数据库是否可用
    pub async fn readiness(&self) -> HealthStatus {
        let mut status = HealthStatus::new();
        match &self.pool {
            Some(pool) => match check_connection(pool).await {
                Ok(()) => status.add_check("postgres", true, None),
                Err(e) => status.add_check("postgres", false, Some(e.to_string())),
            },
            None => status.add_check("postgres", false, Some("Not initialized".to_string())),
        }
        status
    }

    fn render_metrics(&self) -> String {
        self.metrics
            .as_ref()
            .map(PrometheusHandle::render)
            .unwrap_or_default()
    }

    /// 健康检查路由
    pub fn routes(self) -> Router {
        Router::new()
            .route("/health", get(health_handler))
            .route("/ready", get(ready_handler))
            .route("/metrics", get(metrics_handler))
            .with_state(self)
    }
}

async fn health_handler(State(checker): State<HealthChecker>) -> impl IntoResponse {
    (StatusCode::OK, Json(checker.liveness()))
}

async fn ready_handler(State(checker): State<HealthChecker>) -> impl IntoResponse {
    let status = checker.readiness().await;
    let code = if status.healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (code, Json(status))
}

async fn metrics_handler(State(checker): State<HealthChecker>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [("content-type", "text/plain; version=0.0.4; charset=utf-8")],
        checker.render_metrics(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use http::Request;
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_health_is_always_ok() {
        let response = HealthChecker::default()
            .routes()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_ready_without_database_is_unavailable() {
        let response = HealthChecker::default()
            .routes()
            .oneshot(Request::get("/ready").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
