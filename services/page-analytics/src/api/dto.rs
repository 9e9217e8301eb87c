//! 请求参数
//!
//! 查询参数先反序列化为宽松类型，再校验范围并转换为应用层查询

use chrono::NaiveDate;
use pagepulse_common::Pagination;
use pagepulse_errors::{AppError, AppResult};
use serde::Deserialize;

use crate::application::analytics::{ListPostsQuery, TopPostsQuery};
use crate::application::{AnalyzeOverlapCommand, ImportCsvCommand};
use crate::domain::entities::PostFilter;
use crate::domain::enums::{ImportMode, PostType};
use crate::domain::services::{AnalyticsFilter, TopPostMetric};
use crate::domain::value_objects::PageId;

const DEFAULT_DAILY_DAYS: u32 = 30;
const MAX_DAILY_DAYS: u32 = 365;
const DEFAULT_TOP_LIMIT: usize = 10;
const MAX_TOP_LIMIT: usize = 100;
const DEFAULT_TOP_DAYS: u32 = 365;
const MAX_TOP_DAYS: u32 = 730;
const DEFAULT_DAILY_BY_PAGE_DAYS: u32 = 60;
const DEFAULT_PER_PAGE: u32 = 50;
const MAX_PER_PAGE: u32 = 200;
const DEFAULT_SYNC_DAYS: u32 = 90;
const DEFAULT_HISTORY_LIMIT: usize = 20;
const MAX_HISTORY_LIMIT: usize = 100;

fn in_range<T>(name: &str, value: T, min: T, max: T) -> AppResult<T>
where
    T: PartialOrd + std::fmt::Display + Copy,
{
    if value < min || value > max {
        return Err(AppError::validation(format!(
            "{} must be between {} and {}",
            name, min, max
        )));
    }
    Ok(value)
}

fn parse_page_id(raw: Option<&str>) -> AppResult<Option<PageId>> {
    raw.filter(|s| !s.trim().is_empty())
        .map(str::parse)
        .transpose()
}

fn check_dates(start: Option<NaiveDate>, end: Option<NaiveDate>) -> AppResult<()> {
    if let (Some(start), Some(end)) = (start, end)
        && start > end
    {
        return Err(AppError::validation("start_date must not be after end_date"));
    }
    Ok(())
}

/// `page_id`、`start_date`、`end_date`
#[derive(Debug, Default, Deserialize)]
pub struct FilterParams {
    pub page_id: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl FilterParams {
    pub fn into_filter(self) -> AppResult<AnalyticsFilter> {
        check_dates(self.start_date, self.end_date)?;
        Ok(AnalyticsFilter {
            page_id: parse_page_id(self.page_id.as_deref())?,
            start_date: self.start_date,
            end_date: self.end_date,
            since_days: None,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct DailyParams {
    pub days: Option<u32>,
    pub page_id: Option<String>,
}

impl DailyParams {
    pub fn into_filter(self) -> AppResult<AnalyticsFilter> {
        let days = in_range(
            "days",
            self.days.unwrap_or(DEFAULT_DAILY_DAYS),
            1,
            MAX_DAILY_DAYS,
        )?;
        Ok(AnalyticsFilter {
            page_id: parse_page_id(self.page_id.as_deref())?,
            ..Default::default()
        }
        .since_days(days))
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct DailyByPageParams {
    pub days: Option<u32>,
}

impl DailyByPageParams {
    pub fn into_filter(self) -> AppResult<AnalyticsFilter> {
        let days = in_range(
            "days",
            self.days.unwrap_or(DEFAULT_DAILY_BY_PAGE_DAYS),
            1,
            MAX_DAILY_DAYS,
        )?;
        Ok(AnalyticsFilter::default().since_days(days))
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct TopPostsParams {
    pub metric: Option<String>,
    pub limit: Option<usize>,
    pub days: Option<u32>,
    pub page_id: Option<String>,
}

impl TopPostsParams {
    pub fn into_query(self) -> AppResult<TopPostsQuery> {
        let metric = match self.metric.as_deref() {
            Some(raw) if !raw.trim().is_empty() => raw.parse::<TopPostMetric>()?,
            _ => TopPostMetric::default(),
        };
        let limit = in_range(
            "limit",
            self.limit.unwrap_or(DEFAULT_TOP_LIMIT),
            1,
            MAX_TOP_LIMIT,
        )?;
        let days = in_range(
            "days",
            self.days.unwrap_or(DEFAULT_TOP_DAYS),
            1,
            MAX_TOP_DAYS,
        )?;
        Ok(TopPostsQuery {
            filter: AnalyticsFilter {
                page_id: parse_page_id(self.page_id.as_deref())?,
                ..Default::default()
            }
            .since_days(days),
            metric,
            limit,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct PostListParams {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    pub page_id: Option<String>,
    pub post_type: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub search: Option<String>,
}

impl PostListParams {
    pub fn into_query(self) -> AppResult<ListPostsQuery> {
        let page = in_range("page", self.page.unwrap_or(1), 1, u32::MAX)?;
        let per_page = in_range(
            "per_page",
            self.per_page.unwrap_or(DEFAULT_PER_PAGE),
            1,
            MAX_PER_PAGE,
        )?;
        check_dates(self.start_date, self.end_date)?;
        let post_type = self
            .post_type
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .map(str::parse::<PostType>)
            .transpose()?;

        Ok(ListPostsQuery {
            filter: PostFilter {
                page_id: parse_page_id(self.page_id.as_deref())?,
                post_type,
                start_date: self.start_date,
                end_date: self.end_date,
                search: self.search.filter(|s| !s.trim().is_empty()),
            },
            pagination: Pagination::new(page, per_page),
        })
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct SyncParams {
    pub days_back: Option<u32>,
    pub reactions: Option<bool>,
}

impl SyncParams {
    pub fn days_back(&self) -> u32 {
        self.days_back.unwrap_or(DEFAULT_SYNC_DAYS)
    }

    pub fn fetch_reactions(&self) -> bool {
        self.reactions.unwrap_or(false)
    }
}

/// `limit`，可选 `page_id`
#[derive(Debug, Default, Deserialize)]
pub struct HistoryParams {
    pub limit: Option<usize>,
    pub page_id: Option<String>,
}

impl HistoryParams {
    pub fn limit(&self) -> AppResult<usize> {
        in_range(
            "limit",
            self.limit.unwrap_or(DEFAULT_HISTORY_LIMIT),
            1,
            MAX_HISTORY_LIMIT,
        )
    }

    pub fn page_id(&self) -> AppResult<Option<PageId>> {
        parse_page_id(self.page_id.as_deref())
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ImportParams {
    pub mode: Option<String>,
    pub page_filter: Option<String>,
    pub dry_run: Option<bool>,
}

impl ImportParams {
    pub fn into_command(self, filename: String, bytes: Vec<u8>) -> AppResult<ImportCsvCommand> {
        let mode = match self.mode.as_deref() {
            Some(raw) if !raw.trim().is_empty() => raw.parse::<ImportMode>()?,
            _ => ImportMode::default(),
        };
        Ok(ImportCsvCommand::new(filename, bytes)
            .with_mode(mode)
            .with_page_filter(self.page_filter)
            .dry_run(self.dry_run.unwrap_or(false)))
    }
}

#[derive(Debug, Deserialize)]
pub struct AnalyzeOverlapRequest {
    pub page_id_1: String,
    pub page_id_2: String,
    #[serde(default)]
    pub persist: bool,
}

impl AnalyzeOverlapRequest {
    pub fn into_command(self) -> AppResult<AnalyzeOverlapCommand> {
        Ok(AnalyzeOverlapCommand {
            page_id_1: self.page_id_1.parse()?,
            page_id_2: self.page_id_2.parse()?,
            persist: self.persist,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_daily_defaults_and_range() {
        let filter = DailyParams::default().into_filter().unwrap();
        assert_eq!(filter.since_days, Some(30));

        let err = DailyParams {
            days: Some(366),
            page_id: None,
        }
        .into_filter()
        .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert!(DailyParams {
            days: Some(0),
            page_id: None
        }
        .into_filter()
        .is_err());
    }

    #[test]
    fn test_top_posts_params() {
        let query = TopPostsParams::default().into_query().unwrap();
        assert_eq!(query.metric, TopPostMetric::Engagement);
        assert_eq!(query.limit, 10);
        assert_eq!(query.filter.since_days, Some(365));

        let query = TopPostsParams {
            metric: Some("PES".to_string()),
            limit: Some(100),
            days: Some(730),
            page_id: Some("106".to_string()),
        }
        .into_query()
        .unwrap();
        assert_eq!(query.metric, TopPostMetric::Pes);
        assert_eq!(query.filter.page_id, Some(PageId::new("106")));

        assert!(TopPostsParams {
            limit: Some(101),
            ..Default::default()
        }
        .into_query()
        .is_err());
        assert!(TopPostsParams {
            metric: Some("likes".to_string()),
            ..Default::default()
        }
        .into_query()
        .is_err());
    }

    #[test]
    fn test_post_list_params() {
        let query = PostListParams {
            page: Some(2),
            per_page: Some(20),
            post_type: Some("reels".to_string()),
            search: Some("  ".to_string()),
            ..Default::default()
        }
        .into_query()
        .unwrap();
        assert_eq!(query.pagination.offset(), 20);
        assert_eq!(query.filter.post_type, Some(PostType::Reel));
        assert_eq!(query.filter.search, None);

        assert!(PostListParams {
            per_page: Some(201),
            ..Default::default()
        }
        .into_query()
        .is_err());
        assert!(PostListParams {
            page: Some(0),
            ..Default::default()
        }
        .into_query()
        .is_err());
    }

    #[test]
    fn test_filter_rejects_reversed_dates() {
        let params = FilterParams {
            page_id: None,
            start_date: NaiveDate::from_ymd_opt(2025, 12, 10),
            end_date: NaiveDate::from_ymd_opt(2025, 12, 1),
        };
        assert!(params.into_filter().is_err());
    }

    #[test]
    fn test_import_params() {
        let cmd = ImportParams {
            mode: Some("append".to_string()),
            page_filter: Some("".to_string()),
            dry_run: Some(true),
        }
        .into_command("posts.csv".to_string(), Vec::new())
        .unwrap();
        assert_eq!(cmd.mode, ImportMode::Append);
        assert_eq!(cmd.page_filter, None);
        assert!(cmd.dry_run);

        assert!(ImportParams {
            mode: Some("upsert".to_string()),
            ..Default::default()
        }
        .into_command("posts.csv".to_string(), Vec::new())
        .is_err());
    }
}
