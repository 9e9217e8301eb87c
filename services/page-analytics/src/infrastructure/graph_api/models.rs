//! Graph API 响应结构

use serde::Deserialize;

use crate::domain::enums::PostType;
use crate::domain::services::parse_graph_time;
use crate::domain::services::{FetchedPage, FetchedPost};
use crate::domain::value_objects::{PageId, PostId};

#[derive(Debug, Deserialize)]
pub struct GraphErrorBody {
    pub error: GraphError,
}

#[derive(Debug, Deserialize)]
pub struct GraphError {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub code: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct PageInfo {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub fan_count: Option<i64>,
    #[serde(default)]
    pub followers_count: Option<i64>,
    #[serde(default)]
    pub link: Option<String>,
}

impl From<PageInfo> for FetchedPage {
    fn from(info: PageInfo) -> Self {
        let name = info.name.unwrap_or_else(|| info.id.clone());
        FetchedPage {
            page_id: PageId::new(info.id),
            name,
            fan_count: info.fan_count,
            followers_count: info.followers_count,
            link: info.link,
        }
    }
}

/// 带游标的列表响应
#[derive(Debug, Deserialize)]
pub struct Paged<T> {
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
    #[serde(default)]
    pub paging: Option<Paging>,
}

impl<T> Paged<T> {
    /// 存在下一页时返回 after 游标
    pub fn next_cursor(&self) -> Option<&str> {
        let paging = self.paging.as_ref()?;
        paging.next.as_ref()?;
        paging.cursors.as_ref()?.after.as_deref()
    }
}

#[derive(Debug, Deserialize)]
pub struct Paging {
    #[serde(default)]
    pub cursors: Option<Cursors>,
    #[serde(default)]
    pub next: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Cursors {
    #[serde(default)]
    pub after: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Summary {
    #[serde(default)]
    pub total_count: i64,
}

#[derive(Debug, Default, Deserialize)]
pub struct SummaryEdge {
    #[serde(default)]
    pub summary: Summary,
}

#[derive(Debug, Default, Deserialize)]
pub struct ShareCount {
    #[serde(default)]
    pub count: i64,
}

#[derive(Debug, Default, Deserialize)]
pub struct Attachment {
    #[serde(default, rename = "type")]
    pub attachment_type: Option<String>,
    #[serde(default)]
    pub media_type: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Attachments {
    #[serde(default)]
    pub data: Vec<Attachment>,
}

#[derive(Debug, Deserialize)]
pub struct GraphPost {
    pub id: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub created_time: Option<String>,
    #[serde(default)]
    pub permalink_url: Option<String>,
    #[serde(default)]
    pub shares: Option<ShareCount>,
    #[serde(default)]
    pub attachments: Option<Attachments>,
    #[serde(default)]
    pub reactions: Option<SummaryEdge>,
    #[serde(default)]
    pub comments: Option<SummaryEdge>,
}

impl From<GraphPost> for FetchedPost {
    fn from(post: GraphPost) -> Self {
        let post_type = classify_post_type(post.attachments.as_ref());
        FetchedPost {
            post_id: PostId::new(post.id),
            message: post.message.filter(|m| !m.trim().is_empty()),
            created_time: post.created_time.as_deref().and_then(parse_graph_time),
            permalink: post.permalink_url,
            post_type,
            reactions: post.reactions.map(|r| r.summary.total_count).unwrap_or(0),
            comments: post.comments.map(|c| c.summary.total_count).unwrap_or(0),
            shares: post.shares.map(|s| s.count).unwrap_or(0),
        }
    }
}

/// 按第一个附件判断帖子类型
pub fn classify_post_type(attachments: Option<&Attachments>) -> PostType {
    let Some(first) = attachments.and_then(|a| a.data.first()) else {
        return PostType::Text;
    };
    let media_type = first.media_type.as_deref().unwrap_or("").to_lowercase();
    let attachment_type = first.attachment_type.as_deref().unwrap_or("").to_lowercase();

    match media_type.as_str() {
        "video" if attachment_type.contains("reel") || attachment_type.contains("video_inline") => {
            PostType::Reel
        }
        "video" => PostType::Video,
        "photo" => PostType::Image,
        "album" => PostType::Carousel,
        _ if attachment_type.contains("link") || attachment_type.contains("share") => {
            PostType::Link
        }
        _ => PostType::Text,
    }
}
