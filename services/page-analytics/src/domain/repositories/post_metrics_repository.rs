use async_trait::async_trait;
use pagepulse_errors::AppResult;

use crate::domain::entities::PostMetrics;
use crate::domain::value_objects::PostId;

/// 指标快照仓储接口
#[async_trait]
pub trait PostMetricsRepository: Send + Sync {
    /// 同一 (post_id, metric_date, source) 覆盖
    async fn upsert(&self, metrics: &PostMetrics) -> AppResult<()>;

    /// 按日期升序
    async fn list_by_post(&self, post_id: &PostId) -> AppResult<Vec<PostMetrics>>;

    async fn count(&self) -> AppResult<u64>;
}
