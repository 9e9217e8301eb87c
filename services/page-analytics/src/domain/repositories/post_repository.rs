use async_trait::async_trait;
use chrono::{DateTime, Utc};
use pagepulse_errors::AppResult;

use crate::domain::entities::Post;
use crate::domain::value_objects::{EngagementCounters, PageId, PostId};

/// 帖子仓储接口
#[async_trait]
pub trait PostRepository: Send + Sync {
    /// 插入或更新；计数覆盖，描述性可选字段缺失时保留已有值
    async fn upsert(&self, post: &Post) -> AppResult<()>;

    /// 插入或整行覆盖，用于 replace 导入
    async fn replace(&self, post: &Post) -> AppResult<()>;

    async fn find_by_id(&self, post_id: &PostId) -> AppResult<Option<Post>>;

    async fn exists(&self, post_id: &PostId) -> AppResult<bool>;

    /// 全部帖子，按发布时间降序（无发布时间的排最后）
    async fn list_all(&self) -> AppResult<Vec<Post>>;

    /// 某主页最新的若干帖子
    async fn list_recent_by_page(&self, page_id: &PageId, limit: usize) -> AppResult<Vec<Post>>;

    /// 只更新计数
    async fn update_counters(
        &self,
        post_id: &PostId,
        counters: &EngagementCounters,
    ) -> AppResult<()>;

    /// 删除帖子及其快照，返回删除数量
    async fn delete_many(&self, post_ids: &[PostId]) -> AppResult<u64>;

    async fn count(&self) -> AppResult<u64>;

    /// 最早与最晚的发布时间
    async fn publish_time_bounds(
        &self,
    ) -> AppResult<(Option<DateTime<Utc>>, Option<DateTime<Utc>>)>;
}
