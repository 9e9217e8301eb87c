use async_trait::async_trait;
use pagepulse_errors::AppResult;

use crate::domain::entities::AudienceOverlap;
use crate::domain::value_objects::PageId;

/// 受众重叠结果仓储接口
#[async_trait]
pub trait OverlapRepository: Send + Sync {
    /// 同一对主页同一天只保留一条
    async fn save(&self, overlap: &AudienceOverlap) -> AppResult<i64>;

    /// 最新的在前；指定主页时匹配任一侧
    async fn list(&self, page_id: Option<&PageId>, limit: usize) -> AppResult<Vec<AudienceOverlap>>;
}
