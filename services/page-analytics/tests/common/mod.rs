//! 集成测试公共设施：内存仓储与假数据源

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use page_analytics::application::{AnalyticsSettings, Repositories};
use page_analytics::domain::entities::{AudienceOverlap, CsvImport, Page, Post, PostMetrics};
use page_analytics::domain::repositories::{
    ImportRepository, OverlapRepository, PageRepository, PostMetricsRepository, PostRepository,
};
use page_analytics::domain::services::{FetchedPage, FetchedPost, SocialGraphSource};
use page_analytics::domain::unit_of_work::{UnitOfWork, UnitOfWorkFactory};
use page_analytics::domain::value_objects::{
    EngagementCounters, PageId, PostId, ReactionBreakdown,
};
use pagepulse_errors::{AppError, AppResult};
use secrecy::Secret;

#[derive(Default)]
struct Tables {
    pages: BTreeMap<PageId, Page>,
    posts: BTreeMap<PostId, Post>,
    metrics: Vec<PostMetrics>,
    imports: Vec<CsvImport>,
    overlaps: Vec<AudienceOverlap>,
}

/// 所有仓储共享的一份内存数据
#[derive(Clone, Default)]
pub struct InMemoryStore {
    tables: Arc<Mutex<Tables>>,
    fail_post_writes: Arc<AtomicBool>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap()
    }

    /// 之后的帖子写入全部返回数据库错误
    pub fn fail_post_writes(&self) {
        self.fail_post_writes.store(true, Ordering::SeqCst);
    }

    fn check_post_write(&self) -> AppResult<()> {
        if self.fail_post_writes.load(Ordering::SeqCst) {
            return Err(AppError::database("connection reset by peer"));
        }
        Ok(())
    }

    pub fn seed_page(&self, page: Page) {
        self.lock().pages.insert(page.page_id.clone(), page);
    }

    pub fn seed_post(&self, post: Post) {
        self.lock().posts.insert(post.post_id.clone(), post);
    }

    pub fn post(&self, post_id: &str) -> Option<Post> {
        self.lock().posts.get(&PostId::new(post_id)).cloned()
    }

    pub fn page(&self, page_id: &str) -> Option<Page> {
        self.lock().pages.get(&PageId::new(page_id)).cloned()
    }

    pub fn post_count(&self) -> usize {
        self.lock().posts.len()
    }

    pub fn metrics(&self) -> Vec<PostMetrics> {
        self.lock().metrics.clone()
    }

    pub fn imports(&self) -> Vec<CsvImport> {
        self.lock().imports.clone()
    }

    pub fn repositories(&self) -> Repositories {
        Repositories {
            pages: Arc::new(self.clone()),
            posts: Arc::new(self.clone()),
            metrics: Arc::new(self.clone()),
            imports: Arc::new(self.clone()),
            overlaps: Arc::new(self.clone()),
            uow_factory: Arc::new(self.clone()),
        }
    }
}

fn newest_first(posts: &mut [Post]) {
    posts.sort_by(|a, b| match (a.publish_time, b.publish_time) {
        (Some(x), Some(y)) => y.cmp(&x).then_with(|| a.post_id.cmp(&b.post_id)),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => a.post_id.cmp(&b.post_id),
    });
}

#[async_trait]
impl PageRepository for InMemoryStore {
    async fn upsert(&self, page: &Page) -> AppResult<()> {
        let mut tables = self.lock();
        let merged = match tables.pages.get(&page.page_id) {
            Some(existing) => existing.merged_with(page),
            None => page.clone(),
        };
        tables.pages.insert(page.page_id.clone(), merged);
        Ok(())
    }

    async fn find_by_id(&self, page_id: &PageId) -> AppResult<Option<Page>> {
        Ok(self.lock().pages.get(page_id).cloned())
    }

    async fn list_all(&self) -> AppResult<Vec<Page>> {
        let mut pages: Vec<Page> = self.lock().pages.values().cloned().collect();
        pages.sort_by(|a, b| a.page_name.cmp(&b.page_name));
        Ok(pages)
    }

    async fn count(&self) -> AppResult<u64> {
        Ok(self.lock().pages.len() as u64)
    }
}

#[async_trait]
impl PostRepository for InMemoryStore {
    async fn upsert(&self, post: &Post) -> AppResult<()> {
        self.check_post_write()?;
        let mut tables = self.lock();
        let merged = match tables.posts.get(&post.post_id) {
            Some(existing) => existing.merged_with(post),
            None => post.clone(),
        };
        tables.posts.insert(post.post_id.clone(), merged);
        Ok(())
    }

    async fn replace(&self, post: &Post) -> AppResult<()> {
        self.check_post_write()?;
        self.lock().posts.insert(post.post_id.clone(), post.clone());
        Ok(())
    }

    async fn find_by_id(&self, post_id: &PostId) -> AppResult<Option<Post>> {
        Ok(self.lock().posts.get(post_id).cloned())
    }

    async fn exists(&self, post_id: &PostId) -> AppResult<bool> {
        Ok(self.lock().posts.contains_key(post_id))
    }

    async fn list_all(&self) -> AppResult<Vec<Post>> {
        let mut posts: Vec<Post> = self.lock().posts.values().cloned().collect();
        newest_first(&mut posts);
        Ok(posts)
    }

    async fn list_recent_by_page(&self, page_id: &PageId, limit: usize) -> AppResult<Vec<Post>> {
        let mut posts: Vec<Post> = self
            .lock()
            .posts
            .values()
            .filter(|p| &p.page_id == page_id)
            .cloned()
            .collect();
        newest_first(&mut posts);
        posts.truncate(limit);
        Ok(posts)
    }

    async fn update_counters(
        &self,
        post_id: &PostId,
        counters: &EngagementCounters,
    ) -> AppResult<()> {
        self.check_post_write()?;
        if let Some(post) = self.lock().posts.get_mut(post_id) {
            post.counters = *counters;
        }
        Ok(())
    }

    async fn delete_many(&self, post_ids: &[PostId]) -> AppResult<u64> {
        let mut tables = self.lock();
        let mut deleted = 0;
        for post_id in post_ids {
            if tables.posts.remove(post_id).is_some() {
                deleted += 1;
            }
        }
        tables.metrics.retain(|m| !post_ids.contains(&m.post_id));
        Ok(deleted)
    }

    async fn count(&self) -> AppResult<u64> {
        Ok(self.lock().posts.len() as u64)
    }

    async fn publish_time_bounds(
        &self,
    ) -> AppResult<(Option<DateTime<Utc>>, Option<DateTime<Utc>>)> {
        let tables = self.lock();
        let times = tables.posts.values().filter_map(|p| p.publish_time);
        let earliest = times.clone().min();
        let latest = times.max();
        Ok((earliest, latest))
    }
}

#[async_trait]
impl PostMetricsRepository for InMemoryStore {
    async fn upsert(&self, metrics: &PostMetrics) -> AppResult<()> {
        let mut tables = self.lock();
        tables.metrics.retain(|m| {
            !(m.post_id == metrics.post_id
                && m.metric_date == metrics.metric_date
                && m.source == metrics.source)
        });
        tables.metrics.push(metrics.clone());
        Ok(())
    }

    async fn list_by_post(&self, post_id: &PostId) -> AppResult<Vec<PostMetrics>> {
        let mut rows: Vec<PostMetrics> = self
            .lock()
            .metrics
            .iter()
            .filter(|m| &m.post_id == post_id)
            .cloned()
            .collect();
        rows.sort_by_key(|m| m.metric_date);
        Ok(rows)
    }

    async fn count(&self) -> AppResult<u64> {
        Ok(self.lock().metrics.len() as u64)
    }
}

#[async_trait]
impl ImportRepository for InMemoryStore {
    async fn record(&self, import: &CsvImport) -> AppResult<i64> {
        let mut tables = self.lock();
        let id = tables.imports.len() as i64 + 1;
        let mut stored = import.clone();
        stored.id = Some(id);
        tables.imports.push(stored);
        Ok(id)
    }

    async fn list_recent(&self, limit: usize) -> AppResult<Vec<CsvImport>> {
        let mut imports = self.lock().imports.clone();
        imports.reverse();
        imports.truncate(limit);
        Ok(imports)
    }

    async fn count(&self) -> AppResult<u64> {
        Ok(self.lock().imports.len() as u64)
    }
}

#[async_trait]
impl OverlapRepository for InMemoryStore {
    async fn save(&self, overlap: &AudienceOverlap) -> AppResult<i64> {
        let mut tables = self.lock();
        tables.overlaps.retain(|o| {
            !(o.page_id_1 == overlap.page_id_1
                && o.page_id_2 == overlap.page_id_2
                && o.analysis_date == overlap.analysis_date)
        });
        let id = tables.overlaps.iter().filter_map(|o| o.id).max().unwrap_or(0) + 1;
        let mut stored = overlap.clone();
        stored.id = Some(id);
        tables.overlaps.push(stored);
        Ok(id)
    }

    async fn list(&self, page_id: Option<&PageId>, limit: usize) -> AppResult<Vec<AudienceOverlap>> {
        let mut rows: Vec<AudienceOverlap> = self
            .lock()
            .overlaps
            .iter()
            .filter(|o| page_id.is_none_or(|p| &o.page_id_1 == p || &o.page_id_2 == p))
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.id.cmp(&a.id));
        rows.truncate(limit);
        Ok(rows)
    }
}

/// 直接写入共享数据，提交与回滚均为空操作
pub struct InMemoryUnitOfWork {
    store: InMemoryStore,
}

#[async_trait]
impl UnitOfWork for InMemoryUnitOfWork {
    fn pages(&self) -> &dyn PageRepository {
        &self.store
    }

    fn posts(&self) -> &dyn PostRepository {
        &self.store
    }

    fn metrics(&self) -> &dyn PostMetricsRepository {
        &self.store
    }

    async fn commit(self: Box<Self>) -> AppResult<()> {
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> AppResult<()> {
        Ok(())
    }
}

#[async_trait]
impl UnitOfWorkFactory for InMemoryStore {
    async fn begin(&self) -> AppResult<Box<dyn UnitOfWork>> {
        Ok(Box::new(InMemoryUnitOfWork {
            store: self.clone(),
        }))
    }
}

/// 固定返回预置数据的 Graph API
pub struct FakeGraphSource {
    pub page: FetchedPage,
    pub posts: Vec<FetchedPost>,
    pub breakdown: ReactionBreakdown,
}

#[async_trait]
impl SocialGraphSource for FakeGraphSource {
    async fn get_page_info(
        &self,
        page_id: &PageId,
        _token: &Secret<String>,
    ) -> AppResult<FetchedPage> {
        if page_id != &self.page.page_id {
            return Err(AppError::external_service("Unsupported get request"));
        }
        Ok(self.page.clone())
    }

    async fn get_page_posts(
        &self,
        _page_id: &PageId,
        _token: &Secret<String>,
        since: DateTime<Utc>,
        until: DateTime<Utc>,
    ) -> AppResult<Vec<FetchedPost>> {
        Ok(self
            .posts
            .iter()
            .filter(|p| p.created_time.is_none_or(|t| t >= since && t <= until))
            .cloned()
            .collect())
    }

    async fn get_post_reactions(
        &self,
        _post_id: &PostId,
        _token: &Secret<String>,
    ) -> AppResult<ReactionBreakdown> {
        Ok(self.breakdown)
    }
}

pub fn settings() -> AnalyticsSettings {
    AnalyticsSettings::default()
}

/// Meta Business Suite 导出的典型表头
pub const EXPORT_HEADER: &str = "Post ID,Page ID,Page name,Title,Post type,Publish time,Reactions,Comments,Shares,Views,Reach";

pub fn csv_body(rows: &[&str]) -> Vec<u8> {
    let mut body = String::from(EXPORT_HEADER);
    for row in rows {
        body.push('\n');
        body.push_str(row);
    }
    body.push('\n');
    body.into_bytes()
}
