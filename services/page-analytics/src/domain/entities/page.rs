//! Facebook 主页

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::value_objects::PageId;

/// Facebook 主页
///
/// 可选字段为 None 时，upsert 保留数据库中已有的值
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    pub page_id: PageId,
    pub page_name: String,
    pub page_url: Option<String>,
    pub fan_count: Option<i64>,
    pub followers_count: Option<i64>,
    pub talking_about_count: Option<i64>,
    pub overall_star_rating: Option<f64>,
    pub rating_count: Option<i64>,
    pub is_competitor: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Page {
    pub fn new(page_id: PageId, page_name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            page_id,
            page_name: page_name.into(),
            page_url: None,
            fan_count: None,
            followers_count: None,
            talking_about_count: None,
            overall_star_rating: None,
            rating_count: None,
            is_competitor: false,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_url(mut self, url: Option<String>) -> Self {
        self.page_url = url;
        self
    }

    pub fn with_audience(mut self, fan_count: Option<i64>, followers_count: Option<i64>) -> Self {
        self.fan_count = fan_count;
        self.followers_count = followers_count;
        self
    }

    /// 以新值覆盖，新值缺失时保留旧值
    pub fn merged_with(&self, incoming: &Page) -> Page {
        Page {
            page_id: self.page_id.clone(),
            page_name: incoming.page_name.clone(),
            page_url: incoming.page_url.clone().or_else(|| self.page_url.clone()),
            fan_count: incoming.fan_count.or(self.fan_count),
            followers_count: incoming.followers_count.or(self.followers_count),
            talking_about_count: incoming.talking_about_count.or(self.talking_about_count),
            overall_star_rating: incoming.overall_star_rating.or(self.overall_star_rating),
            rating_count: incoming.rating_count.or(self.rating_count),
            is_competitor: self.is_competitor || incoming.is_competitor,
            created_at: self.created_at,
            updated_at: incoming.updated_at,
        }
    }

    /// 去掉统一前缀后的短名，用于图表图例
    pub fn short_name(&self, prefix: &str) -> String {
        if prefix.is_empty() {
            return self.page_name.clone();
        }
        self.page_name.replace(prefix, "")
    }
}
