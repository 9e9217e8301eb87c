//! 基于连接池的仓储实现

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use pagepulse_errors::AppResult;
use sqlx::PgPool;

use super::queries;
use crate::domain::entities::{AudienceOverlap, CsvImport, Page, Post, PostMetrics};
use crate::domain::repositories::{
    ImportRepository, OverlapRepository, PageRepository, PostMetricsRepository, PostRepository,
};
use crate::domain::value_objects::{EngagementCounters, PageId, PostId};

macro_rules! define_pool_repo {
    ($name:ident) => {
        #[derive(Clone)]
        pub struct $name {
            pool: PgPool,
        }

        impl $name {
            pub fn new(pool: PgPool) -> Self {
                Self { pool }
            }
        }
    };
}

define_pool_repo!(PostgresPageRepository);
define_pool_repo!(PostgresPostRepository);
define_pool_repo!(PostgresPostMetricsRepository);
define_pool_repo!(PostgresImportRepository);
define_pool_repo!(PostgresOverlapRepository);

#[async_trait]
impl PageRepository for PostgresPageRepository {
    async fn upsert(&self, page: &Page) -> AppResult<()> {
        queries::upsert_page(&self.pool, page).await
    }

    async fn find_by_id(&self, page_id: &PageId) -> AppResult<Option<Page>> {
        queries::find_page(&self.pool, page_id).await
    }

    async fn list_all(&self) -> AppResult<Vec<Page>> {
        queries::list_pages(&self.pool).await
    }

    async fn count(&self) -> AppResult<u64> {
        queries::count_rows(&self.pool, "pages").await
    }
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn upsert(&self, post: &Post) -> AppResult<()> {
        queries::upsert_post(&self.pool, post).await
    }

    async fn replace(&self, post: &Post) -> AppResult<()> {
        queries::replace_post(&self.pool, post).await
    }

    async fn find_by_id(&self, post_id: &PostId) -> AppResult<Option<Post>> {
        queries::find_post(&self.pool, post_id).await
    }

    async fn exists(&self, post_id: &PostId) -> AppResult<bool> {
        queries::post_exists(&self.pool, post_id).await
    }

    async fn list_all(&self) -> AppResult<Vec<Post>> {
        queries::list_posts(&self.pool).await
    }

    async fn list_recent_by_page(&self, page_id: &PageId, limit: usize) -> AppResult<Vec<Post>> {
        queries::list_recent_posts_by_page(&self.pool, page_id, limit).await
    }

    async fn update_counters(
        &self,
        post_id: &PostId,
        counters: &EngagementCounters,
    ) -> AppResult<()> {
        queries::update_post_counters(&self.pool, post_id, counters).await
    }

    async fn delete_many(&self, post_ids: &[PostId]) -> AppResult<u64> {
        queries::delete_posts(&self.pool, post_ids).await
    }

    async fn count(&self) -> AppResult<u64> {
        queries::count_rows(&self.pool, "posts").await
    }

    async fn publish_time_bounds(
        &self,
    ) -> AppResult<(Option<DateTime<Utc>>, Option<DateTime<Utc>>)> {
        queries::publish_time_bounds(&self.pool).await
    }
}

#[async_trait]
impl PostMetricsRepository for PostgresPostMetricsRepository {
    async fn upsert(&self, metrics: &PostMetrics) -> AppResult<()> {
        queries::upsert_metrics(&self.pool, metrics).await
    }

    async fn list_by_post(&self, post_id: &PostId) -> AppResult<Vec<PostMetrics>> {
        queries::list_metrics_by_post(&self.pool, post_id).await
    }

    async fn count(&self) -> AppResult<u64> {
        queries::count_rows(&self.pool, "post_metrics").await
    }
}

#[async_trait]
impl ImportRepository for PostgresImportRepository {
    async fn record(&self, import: &CsvImport) -> AppResult<i64> {
        queries::insert_import(&self.pool, import).await
    }

    async fn list_recent(&self, limit: usize) -> AppResult<Vec<CsvImport>> {
        queries::list_recent_imports(&self.pool, limit).await
    }

    async fn count(&self) -> AppResult<u64> {
        queries::count_rows(&self.pool, "csv_imports").await
    }
}

#[async_trait]
impl OverlapRepository for PostgresOverlapRepository {
    async fn save(&self, overlap: &AudienceOverlap) -> AppResult<i64> {
        queries::upsert_overlap(&self.pool, overlap).await
    }

    async fn list(&self, page_id: Option<&PageId>, limit: usize) -> AppResult<Vec<AudienceOverlap>> {
        queries::list_overlaps(&self.pool, page_id, limit).await
    }
}
