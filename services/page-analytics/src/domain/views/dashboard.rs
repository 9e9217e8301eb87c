use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::enums::PostType;
use crate::domain::value_objects::{PageId, PostId};

/// 仪表盘汇总
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardStats {
    /// 活跃帖子数
    pub total_posts: u64,
    /// 有活跃帖子的主页数
    pub total_pages: u64,
    /// 数据库中全部主页数
    pub all_pages: u64,
    pub total_reactions: i64,
    pub total_comments: i64,
    pub total_shares: i64,
    pub total_engagement: i64,
    pub total_views: i64,
    pub total_reach: i64,
    pub total_pes: i64,
    pub avg_engagement: f64,
    pub avg_pes: f64,
    pub date_range_start: Option<NaiveDate>,
    pub date_range_end: Option<NaiveDate>,
}

/// 按天汇总
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DailyEngagement {
    pub date: NaiveDate,
    pub posts: u64,
    pub reactions: i64,
    pub comments: i64,
    pub shares: i64,
    pub engagement: i64,
    pub views: i64,
    pub reach: i64,
    pub pes: i64,
}

/// 按帖子类型汇总
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostTypeStats {
    pub post_type: PostType,
    pub count: u64,
    pub reactions: i64,
    pub comments: i64,
    pub shares: i64,
    pub total_engagement: i64,
    pub avg_engagement: f64,
    pub avg_pes: f64,
}

/// 排行榜条目
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopPost {
    pub post_id: PostId,
    pub page_id: PageId,
    pub page_name: String,
    pub title: Option<String>,
    pub post_type: PostType,
    pub publish_time: Option<DateTime<Utc>>,
    pub permalink: Option<String>,
    pub reactions: i64,
    pub comments: i64,
    pub shares: i64,
    pub views: i64,
    pub reach: i64,
    pub engagement: i64,
    pub pes: i64,
}

/// 堆叠图的一天：日期加每个主页短名对应的发帖数
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyPageRow {
    pub date: NaiveDate,
    #[serde(flatten)]
    pub counts: BTreeMap<String, u64>,
}

/// 按主页的每日发帖数
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DailyByPage {
    pub data: Vec<DailyPageRow>,
    #[serde(rename = "pageNames")]
    pub page_names: Vec<String>,
}
