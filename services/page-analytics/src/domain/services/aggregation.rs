//! 指标聚合
//!
//! 所有聚合都在内存中对帖子集合进行，按天分桶使用报表时区

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::fmt;
use std::str::FromStr;

use chrono::{Duration, NaiveDate};
use chrono_tz::Tz;
use pagepulse_common::{ratio, round1, round2, DateRange};
use pagepulse_errors::AppError;
use serde::{Deserialize, Serialize};

use crate::domain::entities::{Page, Post};
use crate::domain::enums::PostType;
use crate::domain::services::today_in;
use crate::domain::value_objects::PageId;
use crate::domain::views::{
    DailyByPage, DailyEngagement, DailyPageRow, DashboardStats, PageComparison, PageSummary,
    PostTypeStats, TopPost,
};

/// 聚合过滤条件
///
/// 日期在报表时区内比较；设置日期条件时没有发布时间的帖子被排除
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsFilter {
    pub page_id: Option<PageId>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    /// 最近 N 天（含今天往前 N 天）
    pub since_days: Option<u32>,
}

impl AnalyticsFilter {
    pub fn for_page(page_id: PageId) -> Self {
        Self {
            page_id: Some(page_id),
            ..Default::default()
        }
    }

    pub fn since_days(mut self, days: u32) -> Self {
        self.since_days = Some(days);
        self
    }

    /// 合并 `start_date` 与 `since_days` 后的起始日期
    pub fn effective_start(&self, today: NaiveDate) -> Option<NaiveDate> {
        let since = self
            .since_days
            .map(|days| today - Duration::days(i64::from(days)));
        match (self.start_date, since) {
            (Some(start), Some(since)) => Some(start.max(since)),
            (start, since) => start.or(since),
        }
    }

    /// 以今天（报表时区）为基准过滤
    pub fn apply<'a>(&self, posts: &'a [Post], tz: Tz) -> Vec<&'a Post> {
        self.apply_at(posts, tz, today_in(tz))
    }

    pub fn apply_at<'a>(&self, posts: &'a [Post], tz: Tz, today: NaiveDate) -> Vec<&'a Post> {
        let start = self.effective_start(today);
        let dated = start.is_some() || self.end_date.is_some();

        posts
            .iter()
            .filter(|post| {
                if let Some(page_id) = &self.page_id {
                    if &post.page_id != page_id {
                        return false;
                    }
                }
                if !dated {
                    return true;
                }
                match post.publish_date(tz) {
                    Some(date) => {
                        start.is_none_or(|s| date >= s) && self.end_date.is_none_or(|e| date <= e)
                    }
                    None => false,
                }
            })
            .collect()
    }
}

/// 排行榜排序指标
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TopPostMetric {
    #[default]
    Engagement,
    Reactions,
    Comments,
    Shares,
    Pes,
    Views,
    Reach,
}

impl TopPostMetric {
    pub fn as_str(&self) -> &'static str {
        match self {
            TopPostMetric::Engagement => "engagement",
            TopPostMetric::Reactions => "reactions",
            TopPostMetric::Comments => "comments",
            TopPostMetric::Shares => "shares",
            TopPostMetric::Pes => "pes",
            TopPostMetric::Views => "views",
            TopPostMetric::Reach => "reach",
        }
    }

    pub fn value(&self, post: &Post) -> i64 {
        let c = &post.counters;
        match self {
            TopPostMetric::Engagement => c.engagement(),
            TopPostMetric::Reactions => c.reactions,
            TopPostMetric::Comments => c.comments,
            TopPostMetric::Shares => c.shares,
            TopPostMetric::Pes => c.pes(),
            TopPostMetric::Views => c.views,
            TopPostMetric::Reach => c.reach,
        }
    }
}

impl FromStr for TopPostMetric {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "engagement" => Ok(TopPostMetric::Engagement),
            "reactions" => Ok(TopPostMetric::Reactions),
            "comments" => Ok(TopPostMetric::Comments),
            "shares" => Ok(TopPostMetric::Shares),
            "pes" => Ok(TopPostMetric::Pes),
            "views" => Ok(TopPostMetric::Views),
            "reach" => Ok(TopPostMetric::Reach),
            other => Err(AppError::validation(format!("不支持的排序指标: {}", other))),
        }
    }
}

impl fmt::Display for TopPostMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 计数累加器
#[derive(Debug, Clone, Copy, Default)]
struct Totals {
    posts: u64,
    reactions: i64,
    comments: i64,
    shares: i64,
    views: i64,
    reach: i64,
    pes: i64,
}

impl Totals {
    fn add(&mut self, post: &Post) {
        let c = &post.counters;
        self.posts += 1;
        self.reactions += c.reactions;
        self.comments += c.comments;
        self.shares += c.shares;
        self.views += c.views;
        self.reach += c.reach;
        self.pes += c.pes();
    }

    fn engagement(&self) -> i64 {
        self.reactions + self.comments + self.shares
    }

    fn avg_engagement(&self) -> f64 {
        ratio(self.engagement() as f64, self.posts as f64)
    }

    fn avg_pes(&self) -> f64 {
        ratio(self.pes as f64, self.posts as f64)
    }
}

fn page_lookup(pages: &[Page]) -> HashMap<&PageId, &Page> {
    pages.iter().map(|p| (&p.page_id, p)).collect()
}

/// 仪表盘汇总
///
/// 计数只含活跃帖子；日期范围覆盖所有有发布时间的帖子
pub fn dashboard_stats(posts: &[&Post], all_pages: u64, tz: Tz) -> DashboardStats {
    let mut totals = Totals::default();
    let mut active_pages = HashSet::new();
    for post in posts.iter().filter(|p| p.is_active()) {
        totals.add(post);
        active_pages.insert(&post.page_id);
    }

    let range = DateRange::spanning(posts.iter().filter_map(|p| p.publish_date(tz)));

    DashboardStats {
        total_posts: totals.posts,
        total_pages: active_pages.len() as u64,
        all_pages,
        total_reactions: totals.reactions,
        total_comments: totals.comments,
        total_shares: totals.shares,
        total_engagement: totals.engagement(),
        total_views: totals.views,
        total_reach: totals.reach,
        total_pes: totals.pes,
        avg_engagement: round1(totals.avg_engagement()),
        avg_pes: round1(totals.avg_pes()),
        date_range_start: range.map(|r| r.start),
        date_range_end: range.map(|r| r.end),
    }
}

/// 按天汇总活跃帖子，日期升序
pub fn daily_engagement(posts: &[&Post], tz: Tz) -> Vec<DailyEngagement> {
    let mut days: BTreeMap<NaiveDate, Totals> = BTreeMap::new();
    for post in posts.iter().filter(|p| p.is_active()) {
        if let Some(date) = post.publish_date(tz) {
            days.entry(date).or_default().add(post);
        }
    }

    days.into_iter()
        .map(|(date, t)| DailyEngagement {
            date,
            posts: t.posts,
            reactions: t.reactions,
            comments: t.comments,
            shares: t.shares,
            engagement: t.engagement(),
            views: t.views,
            reach: t.reach,
            pes: t.pes,
        })
        .collect()
}

/// 按帖子类型汇总活跃帖子，按数量降序
pub fn post_type_stats(posts: &[&Post]) -> Vec<PostTypeStats> {
    let mut by_type: HashMap<PostType, Totals> = HashMap::new();
    for post in posts.iter().filter(|p| p.is_active()) {
        by_type.entry(post.post_type).or_default().add(post);
    }

    let mut stats: Vec<PostTypeStats> = by_type
        .into_iter()
        .map(|(post_type, t)| PostTypeStats {
            post_type,
            count: t.posts,
            reactions: t.reactions,
            comments: t.comments,
            shares: t.shares,
            total_engagement: t.engagement(),
            avg_engagement: round1(t.avg_engagement()),
            avg_pes: round1(t.avg_pes()),
        })
        .collect();
    stats.sort_by(|a, b| {
        b.count
            .cmp(&a.count)
            .then_with(|| a.post_type.as_str().cmp(b.post_type.as_str()))
    });
    stats
}

/// 按指标排序的活跃帖子
pub fn top_posts(
    posts: &[&Post],
    pages: &[Page],
    metric: TopPostMetric,
    limit: usize,
) -> Vec<TopPost> {
    let lookup = page_lookup(pages);
    let mut ranked: Vec<&Post> = posts.iter().copied().filter(|p| p.is_active()).collect();
    ranked.sort_by(|a, b| {
        metric
            .value(b)
            .cmp(&metric.value(a))
            .then_with(|| b.publish_time.cmp(&a.publish_time))
            .then_with(|| a.post_id.cmp(&b.post_id))
    });

    ranked
        .into_iter()
        .take(limit)
        .map(|post| TopPost {
            post_id: post.post_id.clone(),
            page_id: post.page_id.clone(),
            page_name: lookup
                .get(&post.page_id)
                .map(|p| p.page_name.clone())
                .unwrap_or_else(|| post.page_id.to_string()),
            title: post.title.clone(),
            post_type: post.post_type,
            publish_time: post.publish_time,
            permalink: post.permalink.clone(),
            reactions: post.counters.reactions,
            comments: post.counters.comments,
            shares: post.counters.shares,
            views: post.counters.views,
            reach: post.counters.reach,
            engagement: post.engagement(),
            pes: post.pes(),
        })
        .collect()
}

/// 主页对比，只含有活跃帖子的主页，按互动总量降序
pub fn page_comparison(posts: &[&Post], pages: &[Page]) -> Vec<PageComparison> {
    let mut by_page: HashMap<&PageId, Totals> = HashMap::new();
    for post in posts.iter().filter(|p| p.is_active()) {
        by_page.entry(&post.page_id).or_default().add(post);
    }

    let lookup = page_lookup(pages);
    let mut rows: Vec<PageComparison> = by_page
        .into_iter()
        .map(|(page_id, t)| {
            let page = lookup.get(page_id);
            PageComparison {
                page_id: page_id.clone(),
                page_name: page
                    .map(|p| p.page_name.clone())
                    .unwrap_or_else(|| page_id.to_string()),
                fan_count: page.and_then(|p| p.fan_count),
                followers_count: page.and_then(|p| p.followers_count),
                post_count: t.posts,
                total_reactions: t.reactions,
                total_comments: t.comments,
                total_shares: t.shares,
                total_engagement: t.engagement(),
                total_views: t.views,
                total_reach: t.reach,
                avg_engagement: round1(t.avg_engagement()),
                avg_pes: round1(t.avg_pes()),
            }
        })
        .collect();
    rows.sort_by(|a, b| {
        b.total_engagement
            .cmp(&a.total_engagement)
            .then_with(|| a.page_name.cmp(&b.page_name))
    });
    rows
}

/// 主页列表，每个主页都出现，统计全部帖子
pub fn page_summaries(posts: &[Post], pages: &[Page]) -> Vec<PageSummary> {
    let mut by_page: HashMap<&PageId, Totals> = HashMap::new();
    for post in posts {
        by_page.entry(&post.page_id).or_default().add(post);
    }

    let mut rows: Vec<PageSummary> = pages
        .iter()
        .map(|page| {
            let t = by_page.get(&page.page_id).copied().unwrap_or_default();
            PageSummary {
                page_id: page.page_id.clone(),
                page_name: page.page_name.clone(),
                page_url: page.page_url.clone(),
                fan_count: page.fan_count,
                followers_count: page.followers_count,
                is_competitor: page.is_competitor,
                post_count: t.posts,
                total_engagement: t.engagement(),
                total_views: t.views,
                total_reach: t.reach,
                total_reactions: t.reactions,
                total_comments: t.comments,
                total_shares: t.shares,
                avg_engagement: round2(t.avg_engagement()),
                avg_reach: ratio(t.reach as f64, t.posts as f64).round() as i64,
                avg_views: ratio(t.views as f64, t.posts as f64).round() as i64,
                updated_at: page.updated_at,
            }
        })
        .collect();
    rows.sort_by(|a, b| {
        b.total_engagement
            .cmp(&a.total_engagement)
            .then_with(|| a.page_name.cmp(&b.page_name))
    });
    rows
}

/// 堆叠图：每天每个主页的发帖数（含非活跃帖子），缺失补 0
pub fn daily_by_page(posts: &[&Post], pages: &[Page], prefix: &str, tz: Tz) -> DailyByPage {
    let short_names: HashMap<&PageId, String> = pages
        .iter()
        .map(|p| (&p.page_id, p.short_name(prefix)))
        .collect();

    // 未登记的主页以原始 ID 作为列名
    let mut names: BTreeSet<String> = short_names.values().cloned().collect();
    let mut days: BTreeMap<NaiveDate, BTreeMap<String, u64>> = BTreeMap::new();
    for post in posts {
        let Some(date) = post.publish_date(tz) else {
            continue;
        };
        let name = short_names
            .get(&post.page_id)
            .cloned()
            .unwrap_or_else(|| post.page_id.to_string());
        names.insert(name.clone());
        *days.entry(date).or_default().entry(name).or_insert(0) += 1;
    }
    let page_names: Vec<String> = names.into_iter().collect();

    let data = days
        .into_iter()
        .map(|(date, mut counts)| {
            for name in &page_names {
                counts.entry(name.clone()).or_insert(0);
            }
            DailyPageRow { date, counts }
        })
        .collect();

    DailyByPage { data, page_names }
}
