use async_trait::async_trait;
use pagepulse_errors::AppResult;

use crate::domain::entities::Page;
use crate::domain::value_objects::PageId;

/// 主页仓储接口
#[async_trait]
pub trait PageRepository: Send + Sync {
    /// 插入或更新；可选字段缺失时保留已有值
    async fn upsert(&self, page: &Page) -> AppResult<()>;

    async fn find_by_id(&self, page_id: &PageId) -> AppResult<Option<Page>>;

    /// 按名称排序
    async fn list_all(&self) -> AppResult<Vec<Page>>;

    async fn count(&self) -> AppResult<u64>;
}
