use async_trait::async_trait;
use pagepulse_errors::AppResult;

use crate::domain::entities::CsvImport;

/// 导入历史仓储接口
#[async_trait]
pub trait ImportRepository: Send + Sync {
    /// 记录一次导入，返回 ID
    async fn record(&self, import: &CsvImport) -> AppResult<i64>;

    /// 最近的导入，按时间降序
    async fn list_recent(&self, limit: usize) -> AppResult<Vec<CsvImport>>;

    async fn count(&self) -> AppResult<u64>;
}
