use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::value_objects::PageId;

/// 主页对比（仅统计活跃帖子）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageComparison {
    pub page_id: PageId,
    pub page_name: String,
    pub fan_count: Option<i64>,
    pub followers_count: Option<i64>,
    pub post_count: u64,
    pub total_reactions: i64,
    pub total_comments: i64,
    pub total_shares: i64,
    pub total_engagement: i64,
    pub total_views: i64,
    pub total_reach: i64,
    pub avg_engagement: f64,
    pub avg_pes: f64,
}

/// 主页列表项（统计全部帖子）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageSummary {
    pub page_id: PageId,
    pub page_name: String,
    pub page_url: Option<String>,
    pub fan_count: Option<i64>,
    pub followers_count: Option<i64>,
    pub is_competitor: bool,
    pub post_count: u64,
    pub total_engagement: i64,
    pub total_views: i64,
    pub total_reach: i64,
    pub total_reactions: i64,
    pub total_comments: i64,
    pub total_shares: i64,
    pub avg_engagement: f64,
    pub avg_reach: i64,
    pub avg_views: i64,
    pub updated_at: DateTime<Utc>,
}

/// 数据库概况
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DatabaseStats {
    pub pages: u64,
    pub posts: u64,
    pub post_metrics: u64,
    pub imports: u64,
    pub earliest_post: Option<DateTime<Utc>>,
    pub latest_post: Option<DateTime<Utc>>,
}
