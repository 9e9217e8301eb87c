//! 前端静态数据快照
//!
//! 前端在无后端部署时直接读取该 JSON

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde::Serialize;

use crate::domain::entities::{Page, Post};
use crate::domain::services::{
    daily_engagement, dashboard_stats, page_comparison, post_type_stats, top_posts, TopPostMetric,
};
use crate::domain::value_objects::PageId;
use crate::domain::views::{DailyEngagement, DashboardStats, PageComparison, PostTypeStats, TopPost};

/// 全量加按主页拆分
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scoped<T> {
    pub all: T,
    #[serde(rename = "byPage")]
    pub by_page: BTreeMap<PageId, T>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportSnapshot {
    pub generated_at: DateTime<Utc>,
    pub stats: Scoped<DashboardStats>,
    pub pages: Vec<PageComparison>,
    pub post_types: Scoped<Vec<PostTypeStats>>,
    pub daily: Scoped<Vec<DailyEngagement>>,
    pub top_posts: Scoped<Vec<TopPost>>,
}

fn per_page<T>(
    by_page: &BTreeMap<&PageId, Vec<&Post>>,
    build: impl Fn(&[&Post]) -> T,
) -> BTreeMap<PageId, T> {
    by_page
        .iter()
        .map(|(page_id, posts)| ((*page_id).clone(), build(posts)))
        .collect()
}

/// 由全部帖子生成快照；`byPage` 只包含有活跃帖子的主页
pub fn build_snapshot(
    posts: &[Post],
    pages: &[Page],
    tz: Tz,
    top_limit: usize,
    generated_at: DateTime<Utc>,
) -> ExportSnapshot {
    let all: Vec<&Post> = posts.iter().collect();
    let active_pages: BTreeSet<&PageId> = posts
        .iter()
        .filter(|p| p.is_active())
        .map(|p| &p.page_id)
        .collect();
    let by_page: BTreeMap<&PageId, Vec<&Post>> = active_pages
        .iter()
        .map(|page_id| {
            let page_posts = posts.iter().filter(|p| &p.page_id == *page_id).collect();
            (*page_id, page_posts)
        })
        .collect();

    ExportSnapshot {
        generated_at,
        stats: Scoped {
            all: dashboard_stats(&all, pages.len() as u64, tz),
            by_page: per_page(&by_page, |p| dashboard_stats(p, 1, tz)),
        },
        pages: page_comparison(&all, pages),
        post_types: Scoped {
            all: post_type_stats(&all),
            by_page: per_page(&by_page, post_type_stats),
        },
        daily: Scoped {
            all: daily_engagement(&all, tz),
            by_page: per_page(&by_page, |p| daily_engagement(p, tz)),
        },
        top_posts: Scoped {
            all: top_posts(&all, pages, TopPostMetric::Engagement, top_limit),
            by_page: per_page(&by_page, |p| {
                top_posts(p, pages, TopPostMetric::Engagement, top_limit)
            }),
        },
    }
}
