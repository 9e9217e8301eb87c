//! 统计查询定义

use pagepulse_common::Pagination;

use crate::domain::entities::PostFilter;
use crate::domain::services::{AnalyticsFilter, TopPostMetric};

/// 排行榜查询
#[derive(Debug, Clone)]
pub struct TopPostsQuery {
    pub filter: AnalyticsFilter,
    pub metric: TopPostMetric,
    pub limit: usize,
}

/// 帖子分页查询
#[derive(Debug, Clone, Default)]
pub struct ListPostsQuery {
    pub filter: PostFilter,
    pub pagination: Pagination,
}
