//! 社交图谱数据源端口

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use pagepulse_errors::AppResult;
use secrecy::Secret;

use crate::domain::entities::{Page, Post};
use crate::domain::enums::PostType;
use crate::domain::value_objects::{EngagementCounters, PageId, PostId, ReactionBreakdown};

/// 主页基本信息
#[derive(Debug, Clone, PartialEq)]
pub struct FetchedPage {
    pub page_id: PageId,
    pub name: String,
    pub fan_count: Option<i64>,
    pub followers_count: Option<i64>,
    pub link: Option<String>,
}

impl FetchedPage {
    pub fn into_page(self) -> Page {
        Page::new(self.page_id, self.name)
            .with_audience(self.fan_count, self.followers_count)
            .with_url(self.link)
    }
}

/// 拉取到的帖子
#[derive(Debug, Clone, PartialEq)]
pub struct FetchedPost {
    pub post_id: PostId,
    pub message: Option<String>,
    pub created_time: Option<DateTime<Utc>>,
    pub permalink: Option<String>,
    pub post_type: PostType,
    pub reactions: i64,
    pub comments: i64,
    pub shares: i64,
}

impl FetchedPost {
    pub fn into_post(self, page_id: PageId, breakdown: Option<ReactionBreakdown>) -> Post {
        let mut post = Post::new(self.post_id, page_id);
        post.title = self.message;
        post.publish_time = self.created_time;
        post.permalink = self.permalink;
        post.post_type = self.post_type;
        post.counters = EngagementCounters {
            reactions: self.reactions,
            comments: self.comments,
            shares: self.shares,
            ..Default::default()
        };
        post.reactions_breakdown = breakdown;
        post
    }
}

/// Graph API 等数据源
#[async_trait]
pub trait SocialGraphSource: Send + Sync {
    async fn get_page_info(
        &self,
        page_id: &PageId,
        token: &Secret<String>,
    ) -> AppResult<FetchedPage>;

    /// 拉取时间窗口内的全部帖子（自动翻页）
    async fn get_page_posts(
        &self,
        page_id: &PageId,
        token: &Secret<String>,
        since: DateTime<Utc>,
        until: DateTime<Utc>,
    ) -> AppResult<Vec<FetchedPost>>;

    /// 各表情类型计数；单个类型失败记为 0
    async fn get_post_reactions(
        &self,
        post_id: &PostId,
        token: &Secret<String>,
    ) -> AppResult<ReactionBreakdown>;
}
