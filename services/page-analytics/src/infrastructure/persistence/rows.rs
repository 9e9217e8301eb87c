//! 数据库行结构与领域对象转换

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::types::Json;

use crate::domain::entities::{AudienceOverlap, CsvImport, Page, Post, PostMetrics};
use crate::domain::enums::{ImportStatus, MetricSource, PostType};
use crate::domain::value_objects::{
    EngagementCounters, PageId, PostId, ReactionBreakdown,
};

pub const PAGE_COLUMNS: &str = "page_id, page_name, page_url, fan_count, followers_count, \
    talking_about_count, overall_star_rating, rating_count, is_competitor, created_at, updated_at";

pub const POST_COLUMNS: &str = "post_id, page_id, title, description, post_type, publish_time, \
    permalink, is_crosspost, is_share, duration_sec, reactions, comments, shares, views, reach, \
    total_clicks, link_clicks, other_clicks, like_count, love_count, haha_count, wow_count, \
    sad_count, angry_count, fetched_at";

pub const METRICS_COLUMNS: &str = "post_id, metric_date, reactions, comments, shares, views, \
    reach, total_clicks, link_clicks, other_clicks, source, recorded_at";

pub const IMPORT_COLUMNS: &str = "id, filename, file_path, import_date, rows_imported, \
    rows_updated, rows_skipped, date_range_start, date_range_end, page_filter, status, \
    error_message";

pub const OVERLAP_COLUMNS: &str = "id, page_id_1, page_id_2, analysis_date, content_similarity, \
    timing_correlation, engagement_pattern_score, estimated_overlap_percentage, analysis_method, \
    recommendations, notes, created_at";

#[derive(Debug, sqlx::FromRow)]
pub struct PageRow {
    pub page_id: String,
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

impl From<PageRow> for Page {
    fn from(row: PageRow) -> Self {
        Page {
            page_id: PageId::new(row.page_id),
            page_name: row.page_name,
            page_url: row.page_url,
            fan_count: row.fan_count,
            followers_count: row.followers_count,
            talking_about_count: row.talking_about_count,
            overall_star_rating: row.overall_star_rating,
            rating_count: row.rating_count,
            is_competitor: row.is_competitor,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
pub struct PostRow {
    pub post_id: String,
    pub page_id: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub post_type: String,
    pub publish_time: Option<DateTime<Utc>>,
    pub permalink: Option<String>,
    pub is_crosspost: bool,
    pub is_share: bool,
    pub duration_sec: Option<i32>,
    pub reactions: i64,
    pub comments: i64,
    pub shares: i64,
    pub views: i64,
    pub reach: i64,
    pub total_clicks: i64,
    pub link_clicks: i64,
    pub other_clicks: i64,
    pub like_count: Option<i64>,
    pub love_count: Option<i64>,
    pub haha_count: Option<i64>,
    pub wow_count: Option<i64>,
    pub sad_count: Option<i64>,
    pub angry_count: Option<i64>,
    pub fetched_at: DateTime<Utc>,
}

impl PostRow {
    fn breakdown(&self) -> Option<ReactionBreakdown> {
        let counts = [
            self.like_count,
            self.love_count,
            self.haha_count,
            self.wow_count,
            self.sad_count,
            self.angry_count,
        ];
        if counts.iter().all(Option::is_none) {
            return None;
        }
        Some(ReactionBreakdown {
            like: self.like_count.unwrap_or(0),
            love: self.love_count.unwrap_or(0),
            haha: self.haha_count.unwrap_or(0),
            wow: self.wow_count.unwrap_or(0),
            sad: self.sad_count.unwrap_or(0),
            angry: self.angry_count.unwrap_or(0),
        })
    }
}

impl From<PostRow> for Post {
    fn from(row: PostRow) -> Self {
        let reactions_breakdown = row.breakdown();
        Post {
            post_id: PostId::new(row.post_id),
            page_id: PageId::new(row.page_id),
            title: row.title,
            description: row.description,
            post_type: PostType::from_label(&row.post_type),
            publish_time: row.publish_time,
            permalink: row.permalink,
            is_crosspost: row.is_crosspost,
            is_share: row.is_share,
            duration_sec: row.duration_sec,
            counters: EngagementCounters {
                reactions: row.reactions,
                comments: row.comments,
                shares: row.shares,
                views: row.views,
                reach: row.reach,
                total_clicks: row.total_clicks,
                link_clicks: row.link_clicks,
                other_clicks: row.other_clicks,
            },
            reactions_breakdown,
            fetched_at: row.fetched_at,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
pub struct PostMetricsRow {
    pub post_id: String,
    pub metric_date: NaiveDate,
    pub reactions: i64,
    pub comments: i64,
    pub shares: i64,
    pub views: i64,
    pub reach: i64,
    pub total_clicks: i64,
    pub link_clicks: i64,
    pub other_clicks: i64,
    pub source: String,
    pub recorded_at: DateTime<Utc>,
}

impl From<PostMetricsRow> for PostMetrics {
    fn from(row: PostMetricsRow) -> Self {
        PostMetrics {
            post_id: PostId::new(row.post_id),
            metric_date: row.metric_date,
            counters: EngagementCounters {
                reactions: row.reactions,
                comments: row.comments,
                shares: row.shares,
                views: row.views,
                reach: row.reach,
                total_clicks: row.total_clicks,
                link_clicks: row.link_clicks,
                other_clicks: row.other_clicks,
            },
            source: MetricSource::from(row.source.as_str()),
            recorded_at: row.recorded_at,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
pub struct CsvImportRow {
    pub id: i64,
    pub filename: String,
    pub file_path: Option<String>,
    pub import_date: DateTime<Utc>,
    pub rows_imported: i32,
    pub rows_updated: i32,
    pub rows_skipped: i32,
    pub date_range_start: Option<NaiveDate>,
    pub date_range_end: Option<NaiveDate>,
    pub page_filter: Option<String>,
    pub status: String,
    pub error_message: Option<String>,
}

impl From<CsvImportRow> for CsvImport {
    fn from(row: CsvImportRow) -> Self {
        CsvImport {
            id: Some(row.id),
            filename: row.filename,
            file_path: row.file_path,
            import_date: row.import_date,
            rows_imported: row.rows_imported,
            rows_updated: row.rows_updated,
            rows_skipped: row.rows_skipped,
            date_range_start: row.date_range_start,
            date_range_end: row.date_range_end,
            page_filter: row.page_filter,
            status: ImportStatus::from(row.status.as_str()),
            error_message: row.error_message,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
pub struct OverlapRow {
    pub id: i64,
    pub page_id_1: String,
    pub page_id_2: String,
    pub analysis_date: NaiveDate,
    pub content_similarity: f64,
    pub timing_correlation: f64,
    pub engagement_pattern_score: f64,
    pub estimated_overlap_percentage: f64,
    pub analysis_method: String,
    pub recommendations: Json<Vec<String>>,
    pub notes: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

impl From<OverlapRow> for AudienceOverlap {
    fn from(row: OverlapRow) -> Self {
        AudienceOverlap {
            id: Some(row.id),
            page_id_1: PageId::new(row.page_id_1),
            page_id_2: PageId::new(row.page_id_2),
            analysis_date: row.analysis_date,
            content_similarity: row.content_similarity,
            timing_correlation: row.timing_correlation,
            engagement_pattern_score: row.engagement_pattern_score,
            estimated_overlap_percentage: row.estimated_overlap_percentage,
            analysis_method: row.analysis_method,
            recommendations: row.recommendations.0,
            notes: row.notes,
            created_at: row.created_at,
        }
    }
}
