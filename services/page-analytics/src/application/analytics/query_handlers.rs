//! 统计查询处理器
//!
//! 帖子量级在万条以内，全部读入内存后用领域层的纯函数聚合

use std::sync::Arc;

use chrono::Utc;
use pagepulse_common::PagedResult;
use pagepulse_errors::{AppError, AppResult};
use serde::Serialize;

use super::queries::*;
use crate::application::export::{build_snapshot, ExportSnapshot};
use crate::application::{AnalyticsSettings, Repositories};
use crate::domain::entities::{Post, PostMetrics};
use crate::domain::services::{
    daily_by_page, daily_engagement, dashboard_stats, page_comparison, page_summaries,
    post_type_stats, top_posts, AnalyticsFilter,
};
use crate::domain::value_objects::{PageId, PostId};
use crate::domain::views::{
    DailyByPage, DailyEngagement, DashboardStats, DatabaseStats, PageComparison, PageSummary,
    PostTypeStats, TopPost,
};

/// 帖子详情及快照历史
#[derive(Debug, Clone, Serialize)]
pub struct PostDetail {
    #[serde(flatten)]
    pub post: Post,
    pub engagement: i64,
    pub pes: i64,
    pub qes: f64,
    pub viral_coefficient: f64,
    pub engagement_rate: f64,
    pub history: Vec<PostMetrics>,
}

pub struct AnalyticsQueryHandler {
    repos: Repositories,
    settings: Arc<AnalyticsSettings>,
}

impl AnalyticsQueryHandler {
    pub fn new(repos: Repositories, settings: AnalyticsSettings) -> Self {
        Self {
            repos,
            settings: Arc::new(settings),
        }
    }

    pub fn settings(&self) -> &AnalyticsSettings {
        &self.settings
    }

    pub async fn handle_dashboard(&self, filter: &AnalyticsFilter) -> AppResult<DashboardStats> {
        let posts = self.repos.posts.list_all().await?;
        let all_pages = self.repos.pages.count().await?;
        let tz = self.settings.timezone;
        Ok(dashboard_stats(&filter.apply(&posts, tz), all_pages, tz))
    }

    pub async fn handle_daily(&self, filter: &AnalyticsFilter) -> AppResult<Vec<DailyEngagement>> {
        let posts = self.repos.posts.list_all().await?;
        let tz = self.settings.timezone;
        Ok(daily_engagement(&filter.apply(&posts, tz), tz))
    }

    pub async fn handle_post_types(
        &self,
        filter: &AnalyticsFilter,
    ) -> AppResult<Vec<PostTypeStats>> {
        let posts = self.repos.posts.list_all().await?;
        Ok(post_type_stats(&filter.apply(&posts, self.settings.timezone)))
    }

    pub async fn handle_top_posts(&self, query: &TopPostsQuery) -> AppResult<Vec<TopPost>> {
        let posts = self.repos.posts.list_all().await?;
        let pages = self.repos.pages.list_all().await?;
        let filtered = query.filter.apply(&posts, self.settings.timezone);
        Ok(top_posts(&filtered, &pages, query.metric, query.limit))
    }

    pub async fn handle_page_comparison(
        &self,
        filter: &AnalyticsFilter,
    ) -> AppResult<Vec<PageComparison>> {
        let posts = self.repos.posts.list_all().await?;
        let pages = self.repos.pages.list_all().await?;
        Ok(page_comparison(
            &filter.apply(&posts, self.settings.timezone),
            &pages,
        ))
    }

    pub async fn handle_daily_by_page(&self, filter: &AnalyticsFilter) -> AppResult<DailyByPage> {
        let posts = self.repos.posts.list_all().await?;
        let pages = self.repos.pages.list_all().await?;
        let tz = self.settings.timezone;
        Ok(daily_by_page(
            &filter.apply(&posts, tz),
            &pages,
            &self.settings.page_name_prefix,
            tz,
        ))
    }

    /// 主页列表（统计全部帖子）
    pub async fn handle_list_pages(&self) -> AppResult<Vec<PageSummary>> {
        let posts = self.repos.posts.list_all().await?;
        let pages = self.repos.pages.list_all().await?;
        Ok(page_summaries(&posts, &pages))
    }

    pub async fn handle_get_page(&self, page_id: &PageId) -> AppResult<PageSummary> {
        let page = self
            .repos
            .pages
            .find_by_id(page_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Page {} not found", page_id)))?;
        let posts: Vec<Post> = self
            .repos
            .posts
            .list_all()
            .await?
            .into_iter()
            .filter(|p| &p.page_id == page_id)
            .collect();

        page_summaries(&posts, std::slice::from_ref(&page))
            .into_iter()
            .next()
            .ok_or_else(|| AppError::internal("Page summary missing"))
    }

    /// 帖子分页，新的在前
    pub async fn handle_list_posts(&self, query: &ListPostsQuery) -> AppResult<PagedResult<Post>> {
        let tz = self.settings.timezone;
        let posts: Vec<Post> = self
            .repos
            .posts
            .list_all()
            .await?
            .into_iter()
            .filter(|p| query.filter.matches(p, tz))
            .collect();
        let total = posts.len() as u64;
        let items = query.pagination.slice(&posts).to_vec();
        Ok(PagedResult::new(items, total, &query.pagination))
    }

    /// 发布时间最新的帖子
    pub async fn handle_latest_post(&self) -> AppResult<Post> {
        self.repos
            .posts
            .list_all()
            .await?
            .into_iter()
            .filter(|p| p.publish_time.is_some())
            .max_by(|a, b| a.publish_time.cmp(&b.publish_time))
            .ok_or_else(|| AppError::not_found("No posts found"))
    }

    pub async fn handle_get_post(&self, post_id: &PostId) -> AppResult<PostDetail> {
        let post = self
            .repos
            .posts
            .find_by_id(post_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Post {} not found", post_id)))?;
        let history = self.repos.metrics.list_by_post(post_id).await?;

        Ok(PostDetail {
            engagement: post.engagement(),
            pes: post.pes(),
            qes: post.qes(),
            viral_coefficient: post.counters.viral_coefficient(),
            engagement_rate: post.counters.engagement_rate(),
            post,
            history,
        })
    }

    pub async fn handle_database_stats(&self) -> AppResult<DatabaseStats> {
        let (earliest_post, latest_post) = self.repos.posts.publish_time_bounds().await?;
        Ok(DatabaseStats {
            pages: self.repos.pages.count().await?,
            posts: self.repos.posts.count().await?,
            post_metrics: self.repos.metrics.count().await?,
            imports: self.repos.imports.count().await?,
            earliest_post,
            latest_post,
        })
    }

    /// 前端静态数据
    pub async fn handle_export(&self, top_limit: usize) -> AppResult<ExportSnapshot> {
        let posts = self.repos.posts.list_all().await?;
        let pages = self.repos.pages.list_all().await?;
        Ok(build_snapshot(
            &posts,
            &pages,
            self.settings.timezone,
            top_limit,
            Utc::now(),
        ))
    }
}
