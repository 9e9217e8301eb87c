//! 事务内的仓储实现
//!
//! 共享同一个事务而不是连接池

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use pagepulse_errors::{AppError, AppResult};
use sqlx::{Postgres, Transaction};
use tokio::sync::Mutex;

use super::queries;
use crate::domain::entities::{Page, Post, PostMetrics};
use crate::domain::repositories::{PageRepository, PostMetricsRepository, PostRepository};
use crate::domain::value_objects::{EngagementCounters, PageId, PostId};

/// 共享事务
pub type SharedTx = Arc<Mutex<Option<Transaction<'static, Postgres>>>>;

macro_rules! define_tx_repo {
    ($name:ident) => {
        pub struct $name {
            tx: SharedTx,
        }

        impl $name {
            pub fn new(tx: SharedTx) -> Self {
                Self { tx }
            }
        }
    };
}

/// 取出事务连接执行语句
macro_rules! in_tx {
    ($self:ident, |$conn:ident| $body:expr) => {{
        let mut guard = $self.tx.lock().await;
        let tx = guard
            .as_mut()
            .ok_or_else(|| AppError::internal("Transaction consumed"))?;
        let $conn = &mut **tx;
        $body.await
    }};
}

define_tx_repo!(TxPageRepository);
define_tx_repo!(TxPostRepository);
define_tx_repo!(TxPostMetricsRepository);

#[async_trait]
impl PageRepository for TxPageRepository {
    async fn upsert(&self, page: &Page) -> AppResult<()> {
        in_tx!(self, |conn| queries::upsert_page(conn, page))
    }

    async fn find_by_id(&self, page_id: &PageId) -> AppResult<Option<Page>> {
        in_tx!(self, |conn| queries::find_page(conn, page_id))
    }

    async fn list_all(&self) -> AppResult<Vec<Page>> {
        in_tx!(self, |conn| queries::list_pages(conn))
    }

    async fn count(&self) -> AppResult<u64> {
        in_tx!(self, |conn| queries::count_rows(conn, "pages"))
    }
}

#[async_trait]
impl PostRepository for TxPostRepository {
    async fn upsert(&self, post: &Post) -> AppResult<()> {
        in_tx!(self, |conn| queries::upsert_post(conn, post))
    }

    async fn replace(&self, post: &Post) -> AppResult<()> {
        in_tx!(self, |conn| queries::replace_post(conn, post))
    }

    async fn find_by_id(&self, post_id: &PostId) -> AppResult<Option<Post>> {
        in_tx!(self, |conn| queries::find_post(conn, post_id))
    }

    async fn exists(&self, post_id: &PostId) -> AppResult<bool> {
        in_tx!(self, |conn| queries::post_exists(conn, post_id))
    }

    async fn list_all(&self) -> AppResult<Vec<Post>> {
        in_tx!(self, |conn| queries::list_posts(conn))
    }

    async fn list_recent_by_page(&self, page_id: &PageId, limit: usize) -> AppResult<Vec<Post>> {
        in_tx!(self, |conn| queries::list_recent_posts_by_page(conn, page_id, limit))
    }

    async fn update_counters(
        &self,
        post_id: &PostId,
        counters: &EngagementCounters,
    ) -> AppResult<()> {
        in_tx!(self, |conn| queries::update_post_counters(conn, post_id, counters))
    }

    async fn delete_many(&self, post_ids: &[PostId]) -> AppResult<u64> {
        in_tx!(self, |conn| queries::delete_posts(conn, post_ids))
    }

    async fn count(&self) -> AppResult<u64> {
        in_tx!(self, |conn| queries::count_rows(conn, "posts"))
    }

    async fn publish_time_bounds(
        &self,
    ) -> AppResult<(Option<DateTime<Utc>>, Option<DateTime<Utc>>)> {
        in_tx!(self, |conn| queries::publish_time_bounds(conn))
    }
}

#[async_trait]
impl PostMetricsRepository for TxPostMetricsRepository {
    async fn upsert(&self, metrics: &PostMetrics) -> AppResult<()> {
        in_tx!(self, |conn| queries::upsert_metrics(conn, metrics))
    }

    async fn list_by_post(&self, post_id: &PostId) -> AppResult<Vec<PostMetrics>> {
        in_tx!(self, |conn| queries::list_metrics_by_post(conn, post_id))
    }

    async fn count(&self) -> AppResult<u64> {
        in_tx!(self, |conn| queries::count_rows(conn, "post_metrics"))
    }
}
