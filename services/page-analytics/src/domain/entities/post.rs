//! 帖子

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::domain::enums::PostType;
use crate::domain::services::local_date;
use crate::domain::value_objects::{EngagementCounters, PageId, PostId, ReactionBreakdown};

/// 标题最大长度（字符）
pub const MAX_TITLE_CHARS: usize = 500;

/// 帖子及其最新计数
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub post_id: PostId,
    pub page_id: PageId,
    pub title: Option<String>,
    pub description: Option<String>,
    pub post_type: PostType,
    pub publish_time: Option<DateTime<Utc>>,
    pub permalink: Option<String>,
    pub is_crosspost: bool,
    pub is_share: bool,
    pub duration_sec: Option<i32>,
    pub counters: EngagementCounters,
    /// 表情细分，仅 Graph API 同步时可能获取
    pub reactions_breakdown: Option<ReactionBreakdown>,
    pub fetched_at: DateTime<Utc>,
}

impl Post {
    pub fn new(post_id: PostId, page_id: PageId) -> Self {
        Self {
            post_id,
            page_id,
            title: None,
            description: None,
            post_type: PostType::Unknown,
            publish_time: None,
            permalink: None,
            is_crosspost: false,
            is_share: false,
            duration_sec: None,
            counters: EngagementCounters::default(),
            reactions_breakdown: None,
            fetched_at: Utc::now(),
        }
    }

    pub fn engagement(&self) -> i64 {
        self.counters.engagement()
    }

    pub fn pes(&self) -> i64 {
        self.counters.pes()
    }

    pub fn is_active(&self) -> bool {
        self.counters.is_active()
    }

    pub fn qes(&self) -> f64 {
        self.reactions_breakdown
            .map(|b| b.qes(self.counters.reactions))
            .unwrap_or(0.0)
    }

    /// 报表时区下的发布日期
    pub fn publish_date(&self, tz: Tz) -> Option<NaiveDate> {
        self.publish_time.map(|t| local_date(t, tz))
    }

    /// 以新值覆盖，描述性可选字段缺失时保留旧值
    pub fn merged_with(&self, incoming: &Post) -> Post {
        Post {
            post_id: self.post_id.clone(),
            page_id: incoming.page_id.clone(),
            title: incoming.title.clone().or_else(|| self.title.clone()),
            description: incoming.description.clone().or_else(|| self.description.clone()),
            post_type: if incoming.post_type == PostType::Unknown {
                self.post_type
            } else {
                incoming.post_type
            },
            publish_time: incoming.publish_time.or(self.publish_time),
            permalink: incoming.permalink.clone().or_else(|| self.permalink.clone()),
            is_crosspost: incoming.is_crosspost,
            is_share: incoming.is_share,
            duration_sec: incoming.duration_sec.or(self.duration_sec),
            counters: incoming.counters,
            reactions_breakdown: incoming.reactions_breakdown.or(self.reactions_breakdown),
            fetched_at: incoming.fetched_at,
        }
    }
}

/// 帖子列表过滤条件
#[derive(Debug, Clone, Default)]
pub struct PostFilter {
    pub page_id: Option<PageId>,
    pub post_type: Option<PostType>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    /// 标题关键字（不区分大小写）
    pub search: Option<String>,
}

impl PostFilter {
    /// 在报表时区内判断帖子是否满足条件
    pub fn matches(&self, post: &Post, tz: Tz) -> bool {
        if let Some(page_id) = &self.page_id {
            if &post.page_id != page_id {
                return false;
            }
        }
        if let Some(post_type) = self.post_type {
            if post.post_type != post_type {
                return false;
            }
        }
        if self.start_date.is_some() || self.end_date.is_some() {
            let Some(date) = post.publish_date(tz) else {
                return false;
            };
            if self.start_date.is_some_and(|start| date < start) {
                return false;
            }
            if self.end_date.is_some_and(|end| date > end) {
                return false;
            }
        }
        if let Some(search) = &self.search {
            let needle = search.to_lowercase();
            let found = post
                .title
                .as_deref()
                .is_some_and(|t| t.to_lowercase().contains(&needle));
            if !found {
                return false;
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn post_at(hour_utc: u32) -> Post {
        let mut post = Post::new(PostId::new("1"), PageId::new("p1"));
        post.publish_time = Some(Utc.with_ymd_and_hms(2025, 12, 1, hour_utc, 0, 0).unwrap());
        post.title = Some("Morning Stream Highlights".to_string());
        post
    }

    #[test]
    fn test_filter_uses_reporting_timezone() {
        let tz = chrono_tz::Asia::Manila;
        let filter = PostFilter {
            start_date: NaiveDate::from_ymd_opt(2025, 12, 2),
            ..Default::default()
        };
        // 17:00 UTC = 次日 01:00 PHT
        assert!(filter.matches(&post_at(17), tz));
        assert!(!filter.matches(&post_at(15), tz));
    }

    #[test]
    fn test_filter_date_excludes_posts_without_time() {
        let filter = PostFilter {
            end_date: NaiveDate::from_ymd_opt(2030, 1, 1),
            ..Default::default()
        };
        let post = Post::new(PostId::new("1"), PageId::new("p1"));
        assert!(!filter.matches(&post, chrono_tz::UTC));
        assert!(PostFilter::default().matches(&post, chrono_tz::UTC));
    }

    #[test]
    fn test_filter_search_is_case_insensitive() {
        let filter = PostFilter {
            search: Some("stream".to_string()),
            ..Default::default()
        };
        assert!(filter.matches(&post_at(1), chrono_tz::UTC));
    }

    #[test]
    fn test_merge_keeps_descriptive_fields_and_breakdown() {
        let mut existing = post_at(1);
        existing.post_type = PostType::Video;
        existing.reactions_breakdown = Some(ReactionBreakdown {
            love: 3,
            ..Default::default()
        });

        let mut incoming = Post::new(PostId::new("1"), PageId::new("p1"));
        incoming.counters.reactions = 40;

        let merged = existing.merged_with(&incoming);
        assert_eq!(merged.title, existing.title);
        assert_eq!(merged.post_type, PostType::Video);
        assert_eq!(merged.publish_time, existing.publish_time);
        assert_eq!(merged.counters.reactions, 40);
        assert_eq!(merged.reactions_breakdown.unwrap().love, 3);
    }
}
