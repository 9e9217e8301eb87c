//! 帖子指标快照

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::enums::MetricSource;
use crate::domain::value_objects::{EngagementCounters, PostId};

/// 某一天、某一来源的计数快照
///
/// (post_id, metric_date, source) 唯一，同日重复导入覆盖
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostMetrics {
    pub post_id: PostId,
    pub metric_date: NaiveDate,
    #[serde(flatten)]
    pub counters: EngagementCounters,
    pub source: MetricSource,
    pub recorded_at: DateTime<Utc>,
}

impl PostMetrics {
    pub fn new(
        post_id: PostId,
        metric_date: NaiveDate,
        counters: EngagementCounters,
        source: MetricSource,
    ) -> Self {
        Self {
            post_id,
            metric_date,
            counters,
            source,
            recorded_at: Utc::now(),
        }
    }
}
