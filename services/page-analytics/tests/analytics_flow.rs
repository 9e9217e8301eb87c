//! 统计查询、Graph API 同步与受众重叠分析

mod common;

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{Duration, NaiveDate, TimeZone, Utc};
use common::{settings, FakeGraphSource, InMemoryStore};
use page_analytics::application::analytics::{ListPostsQuery, TopPostsQuery};
use page_analytics::application::{
    AnalyticsQueryHandler, AnalyzeOverlapCommand, OverlapCommandHandler, SyncCommandHandler,
    SyncPageCommand,
};
use page_analytics::domain::entities::{Page, Post, PostFilter};
use page_analytics::domain::enums::{MetricSource, PostType};
use page_analytics::domain::services::{AnalyticsFilter, FetchedPage, FetchedPost, TopPostMetric};
use page_analytics::domain::value_objects::{PageId, PostId, ReactionBreakdown};
use pagepulse_common::Pagination;
use pagepulse_errors::AppError;
use secrecy::Secret;

fn post(id: &str, page: &str, day: u32, counters: (i64, i64, i64), post_type: PostType) -> Post {
    let mut post = Post::new(PostId::new(id), PageId::new(page));
    post.publish_time = Some(Utc.with_ymd_and_hms(2025, 12, day, 4, 0, 0).unwrap());
    post.title = Some(format!("Stream recap {}", id));
    post.post_type = post_type;
    post.counters.reactions = counters.0;
    post.counters.comments = counters.1;
    post.counters.shares = counters.2;
    post
}

/// 两个有帖子的主页加一个空主页
fn seeded_store() -> InMemoryStore {
    let store = InMemoryStore::new();
    store.seed_page(Page::new(PageId::new("106"), "Juana Babe Ana"));
    store.seed_page(Page::new(PageId::new("207"), "Juana Babe Bea"));
    store.seed_page(Page::new(PageId::new("308"), "Juana Babe Cora"));
    store.seed_post(post("a", "106", 1, (100, 10, 5), PostType::Image));
    store.seed_post(post("b", "106", 3, (40, 2, 1), PostType::Reel));
    store.seed_post(post("c", "207", 2, (0, 0, 0), PostType::Video));
    store.seed_post(post("d", "207", 2, (20, 0, 0), PostType::Video));
    store
}

fn analytics(store: &InMemoryStore) -> AnalyticsQueryHandler {
    AnalyticsQueryHandler::new(store.repositories(), settings())
}

#[tokio::test]
async fn test_dashboard_counts_active_posts_only() {
    let store = seeded_store();
    let stats = analytics(&store)
        .handle_dashboard(&AnalyticsFilter::default())
        .await
        .unwrap();

    assert_eq!(stats.total_posts, 3);
    assert_eq!(stats.total_pages, 2);
    assert_eq!(stats.all_pages, 3);
    assert_eq!(stats.total_engagement, 115 + 43 + 20);
    assert_eq!(stats.total_pes, 135 + 47 + 20);
    assert_eq!(stats.date_range_start, NaiveDate::from_ymd_opt(2025, 12, 1));
    assert_eq!(stats.date_range_end, NaiveDate::from_ymd_opt(2025, 12, 3));
}

#[tokio::test]
async fn test_dashboard_filters_by_page_and_dates() {
    let store = seeded_store();
    let handler = analytics(&store);

    let by_page = handler
        .handle_dashboard(&AnalyticsFilter::for_page(PageId::new("106")))
        .await
        .unwrap();
    assert_eq!(by_page.total_posts, 2);
    assert_eq!(by_page.avg_engagement, 79.0);

    let by_date = handler
        .handle_dashboard(&AnalyticsFilter {
            start_date: NaiveDate::from_ymd_opt(2025, 12, 2),
            end_date: NaiveDate::from_ymd_opt(2025, 12, 2),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(by_date.total_posts, 1);
    assert_eq!(by_date.total_engagement, 20);
}

#[tokio::test]
async fn test_daily_and_post_type_breakdowns() {
    let store = seeded_store();
    let handler = analytics(&store);

    let post_types = handler
        .handle_post_types(&AnalyticsFilter::default())
        .await
        .unwrap();
    let video = post_types
        .iter()
        .find(|s| s.post_type == PostType::Video)
        .unwrap();
    assert_eq!(video.count, 1);
    assert_eq!(video.total_engagement, 20);

    let comparison = handler
        .handle_page_comparison(&AnalyticsFilter::default())
        .await
        .unwrap();
    let ana = comparison
        .iter()
        .find(|c| c.page_id == PageId::new("106"))
        .unwrap();
    assert_eq!(ana.post_count, 2);
    assert_eq!(ana.total_engagement, 158);
}

#[tokio::test]
async fn test_top_posts_respects_window_and_metric() {
    let store = seeded_store();
    let now = Utc::now();
    let mut recent = post("r1", "207", 1, (5, 30, 0), PostType::Text);
    recent.publish_time = Some(now - Duration::hours(6));
    store.seed_post(recent);
    let mut older = post("r2", "106", 1, (50, 0, 0), PostType::Text);
    older.publish_time = Some(now - Duration::days(3));
    store.seed_post(older);

    let handler = analytics(&store);
    let top = handler
        .handle_top_posts(&TopPostsQuery {
            filter: AnalyticsFilter::default().since_days(7),
            metric: TopPostMetric::Engagement,
            limit: 10,
        })
        .await
        .unwrap();
    let ids: Vec<&str> = top.iter().map(|t| t.post_id.as_str()).collect();
    assert_eq!(ids, vec!["r2", "r1"]);
    assert_eq!(top[1].page_name, "Juana Babe Bea");

    let by_comments = handler
        .handle_top_posts(&TopPostsQuery {
            filter: AnalyticsFilter::default().since_days(7),
            metric: TopPostMetric::Comments,
            limit: 1,
        })
        .await
        .unwrap();
    assert_eq!(by_comments.len(), 1);
    assert_eq!(by_comments[0].post_id.as_str(), "r1");
}

#[tokio::test]
async fn test_pages_posts_and_lookups() {
    let store = seeded_store();
    let handler = analytics(&store);

    let page = handler.handle_get_page(&PageId::new("207")).await.unwrap();
    assert_eq!(page.post_count, 2);
    let missing = handler.handle_get_page(&PageId::new("999")).await.unwrap_err();
    assert!(matches!(missing, AppError::NotFound(_)));

    let listed = handler
        .handle_list_posts(&ListPostsQuery {
            filter: PostFilter {
                page_id: Some(PageId::new("106")),
                ..Default::default()
            },
            pagination: Pagination::new(1, 1),
        })
        .await
        .unwrap();
    assert_eq!(listed.total, 2);
    assert_eq!(listed.items.len(), 1);
    assert_eq!(listed.items[0].post_id.as_str(), "b");

    let latest = handler.handle_latest_post().await.unwrap();
    assert_eq!(latest.post_id.as_str(), "b");

    let detail = handler.handle_get_post(&PostId::new("a")).await.unwrap();
    assert_eq!(detail.engagement, 115);
    assert_eq!(detail.pes, 135);
    assert!(detail.history.is_empty());

    let stats = handler.handle_database_stats().await.unwrap();
    assert_eq!((stats.pages, stats.posts, stats.imports), (3, 4, 0));
}

#[tokio::test]
async fn test_latest_post_on_empty_store() {
    let store = InMemoryStore::new();
    let err = analytics(&store).handle_latest_post().await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn test_export_snapshot_scopes() {
    let store = seeded_store();
    let snapshot = analytics(&store).handle_export(5).await.unwrap();

    assert_eq!(snapshot.stats.all.total_posts, 3);
    assert_eq!(snapshot.stats.by_page.len(), 2);
    assert!(!snapshot.stats.by_page.contains_key(&PageId::new("308")));
    assert_eq!(snapshot.top_posts.all.len(), 3);
    assert_eq!(snapshot.pages.len(), 2);
}

fn graph_source(now: chrono::DateTime<Utc>) -> FakeGraphSource {
    let fetched = |id: &str, hours_ago: i64, reactions: i64| FetchedPost {
        post_id: PostId::new(id),
        message: Some(format!("Live now {}", id)),
        created_time: Some(now - Duration::hours(hours_ago)),
        permalink: Some(format!("https://facebook.com/{}", id)),
        post_type: PostType::Reel,
        reactions,
        comments: 4,
        shares: 1,
    };
    FakeGraphSource {
        page: FetchedPage {
            page_id: PageId::new("106"),
            name: "Juana Babe Ana".to_string(),
            fan_count: Some(1200),
            followers_count: Some(1500),
            link: Some("https://facebook.com/ana".to_string()),
        },
        posts: vec![fetched("106_1", 5, 40), fetched("106_2", 30, 12)],
        breakdown: ReactionBreakdown {
            like: 20,
            love: 10,
            haha: 5,
            wow: 5,
            ..Default::default()
        },
    }
}

fn sync_handler(store: &InMemoryStore, with_token: bool) -> SyncCommandHandler {
    let mut tokens = HashMap::new();
    if with_token {
        tokens.insert("106".to_string(), Secret::new("page-token".to_string()));
    }
    SyncCommandHandler::new(
        store.repositories(),
        Some(Arc::new(graph_source(Utc::now()))),
        tokens,
        settings(),
    )
}

#[tokio::test]
async fn test_sync_creates_then_updates_posts() {
    let store = InMemoryStore::new();
    let handler = sync_handler(&store, true);
    let cmd = SyncPageCommand {
        page_id: PageId::new("106"),
        days_back: 90,
        fetch_reactions: true,
    };

    let first = handler.handle_sync(cmd.clone()).await.unwrap();
    assert_eq!(first.page_name, "Juana Babe Ana");
    assert_eq!(first.posts_fetched, 2);
    assert_eq!((first.posts_created, first.posts_updated), (2, 0));

    let second = handler.handle_sync(cmd).await.unwrap();
    assert_eq!((second.posts_created, second.posts_updated), (0, 2));

    let page = store.page("106").unwrap();
    assert_eq!(page.fan_count, Some(1200));
    let post = store.post("106_1").unwrap();
    assert_eq!(post.post_type, PostType::Reel);
    assert_eq!(post.qes(), 50.0);

    let metrics = store.metrics();
    // 同一天同一来源只保留一份快照
    assert_eq!(metrics.len(), 2);
    assert!(metrics.iter().all(|m| m.source == MetricSource::Api));
}

#[tokio::test]
async fn test_sync_requires_token_and_valid_window() {
    let store = InMemoryStore::new();

    let err = sync_handler(&store, false)
        .handle_sync(SyncPageCommand {
            page_id: PageId::new("106"),
            days_back: 30,
            fetch_reactions: false,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::FailedPrecondition(_)));

    let err = sync_handler(&store, true)
        .handle_sync(SyncPageCommand {
            page_id: PageId::new("106"),
            days_back: 0,
            fetch_reactions: false,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    let unconfigured = SyncCommandHandler::new(
        store.repositories(),
        None,
        HashMap::from([("106".to_string(), Secret::new("t".to_string()))]),
        settings(),
    );
    let err = unconfigured
        .handle_sync(SyncPageCommand {
            page_id: PageId::new("106"),
            days_back: 30,
            fetch_reactions: false,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::FailedPrecondition(_)));
    assert_eq!(store.post_count(), 0);
}

#[tokio::test]
async fn test_overlap_analysis_and_history() {
    let store = seeded_store();
    let handler = OverlapCommandHandler::new(store.repositories(), settings());

    let same = handler
        .handle_analyze(AnalyzeOverlapCommand {
            page_id_1: PageId::new("106"),
            page_id_2: PageId::new("106"),
            persist: false,
        })
        .await
        .unwrap_err();
    assert!(matches!(same, AppError::Validation(_)));

    let unknown = handler
        .handle_analyze(AnalyzeOverlapCommand {
            page_id_1: PageId::new("106"),
            page_id_2: PageId::new("999"),
            persist: false,
        })
        .await
        .unwrap_err();
    assert!(matches!(unknown, AppError::NotFound(_)));

    let transient = handler
        .handle_analyze(AnalyzeOverlapCommand {
            page_id_1: PageId::new("106"),
            page_id_2: PageId::new("207"),
            persist: false,
        })
        .await
        .unwrap();
    assert_eq!(transient.id, None);
    assert!((0.0..=100.0).contains(&transient.estimated_overlap_percentage));

    let saved = handler
        .handle_analyze(AnalyzeOverlapCommand {
            page_id_1: PageId::new("106"),
            page_id_2: PageId::new("207"),
            persist: true,
        })
        .await
        .unwrap();
    assert!(saved.id.is_some());

    let history = handler
        .handle_list(Some(&PageId::new("207")), 10)
        .await
        .unwrap();
    assert_eq!(history.len(), 1);
    assert!(handler
        .handle_list(Some(&PageId::new("308")), 10)
        .await
        .unwrap()
        .is_empty());
}
