//! 受众重叠分析结果

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::value_objects::PageId;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudienceOverlap {
    pub id: Option<i64>,
    pub page_id_1: PageId,
    pub page_id_2: PageId,
    pub analysis_date: NaiveDate,
    /// 0-100
    pub content_similarity: f64,
    /// 0-1
    pub timing_correlation: f64,
    /// 0-100
    pub engagement_pattern_score: f64,
    /// 0-100
    pub estimated_overlap_percentage: f64,
    pub analysis_method: String,
    pub recommendations: Vec<String>,
    /// 各维度的明细
    pub notes: serde_json::Value,
    pub created_at: DateTime<Utc>,
}
