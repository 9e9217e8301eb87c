//! Unit of Work 模式
//!
//! 一个 CSV 文件的主页、帖子、快照写入在同一事务中完成

use async_trait::async_trait;
use pagepulse_errors::AppResult;

use crate::domain::repositories::{PageRepository, PostMetricsRepository, PostRepository};

/// Unit of Work trait
///
/// ```ignore
/// let uow = uow_factory.begin().await?;
/// uow.pages().upsert(&page).await?;
/// uow.posts().upsert(&post).await?;
/// uow.commit().await?;
/// ```
#[async_trait]
pub trait UnitOfWork: Send + Sync {
    fn pages(&self) -> &dyn PageRepository;

    fn posts(&self) -> &dyn PostRepository;

    fn metrics(&self) -> &dyn PostMetricsRepository;

    /// 提交事务
    async fn commit(self: Box<Self>) -> AppResult<()>;

    /// 回滚事务
    async fn rollback(self: Box<Self>) -> AppResult<()>;
}

/// Unit of Work 工厂
#[async_trait]
pub trait UnitOfWorkFactory: Send + Sync {
    /// 开始新的事务
    async fn begin(&self) -> AppResult<Box<dyn UnitOfWork>>;
}
