//! Metrics 模块
//!
//! HTTP 请求指标中间件，以及导入 / 同步流程的业务计数器

use std::time::Instant;

use axum::{
    extract::{MatchedPath, Request},
    middleware::Next,
    response::Response,
};
use metrics::{counter, histogram};

/// 记录 HTTP 请求
pub fn record_http_request(method: &str, route: &str, status: u16, duration_ms: f64) {
    let labels = [
        ("method", method.to_string()),
        ("route", route.to_string()),
        ("status", status.to_string()),
    ];

    counter!("http_requests_total", &labels).increment(1);
    histogram!("http_request_duration_ms", &labels).record(duration_ms);
}

/// 记录 CSV 行处理结果（imported / updated / skipped / error）
pub fn record_csv_rows(outcome: &str, count: u64) {
    if count == 0 {
        return;
    }
    let labels = [("outcome", outcome.to_string())];
    counter!("csv_rows_processed_total", &labels).increment(count);
}

/// 记录一次导入
pub fn record_import(status: &str) {
    let labels = [("status", status.to_string())];
    counter!("imports_total", &labels).increment(1);
}

/// 记录 Graph API 请求
pub fn record_graph_api_request(endpoint: &str, success: bool) {
    let labels = [
        ("endpoint", endpoint.to_string()),
        ("success", success.to_string()),
    ];
    counter!("graph_api_requests_total", &labels).increment(1);
}

/// HTTP 指标中间件
///
/// 使用匹配到的路由模板作为标签，避免路径参数导致标签爆炸
pub async fn track_http_metrics(request: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().to_string();
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| "unmatched".to_string());

    let response = next.run(request).await;

    let duration = start.elapsed().as_secs_f64() * 1000.0;
    record_http_request(&method, &route, response.status().as_u16(), duration);
    response
}
