//! CSV 读取

use chrono::{DateTime, Utc};
use csv::{ReaderBuilder, StringRecord};
use pagepulse_errors::{AppError, AppResult};

use super::cells::{parse_bool, parse_int, parse_text, parse_title};
use super::columns::{ColumnMap, CsvField};
use crate::domain::entities::Post;
use crate::domain::enums::PostType;
use crate::domain::services::parse_publish_time;
use crate::domain::value_objects::{EngagementCounters, PageId, PostId};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// 一行导出数据
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CsvRow {
    /// 数据行号（从 1 开始，不含表头）
    pub line: u64,
    pub post_id: Option<String>,
    pub page_id: Option<String>,
    pub page_name: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub post_type: PostType,
    pub publish_time: Option<DateTime<Utc>>,
    pub permalink: Option<String>,
    pub counters: EngagementCounters,
    pub duration_sec: Option<i32>,
    pub is_crosspost: bool,
    pub is_share: bool,
}

impl CsvRow {
    fn from_record(line: u64, record: &StringRecord, columns: &ColumnMap) -> Self {
        let cell = |field: CsvField| {
            columns
                .index(field)
                .and_then(|idx| record.get(idx))
                .unwrap_or("")
        };

        Self {
            line,
            post_id: parse_text(cell(CsvField::PostId)),
            page_id: parse_text(cell(CsvField::PageId)),
            page_name: parse_text(cell(CsvField::PageName)),
            title: parse_title(cell(CsvField::Title)),
            description: parse_text(cell(CsvField::Description)),
            post_type: PostType::from_label(cell(CsvField::PostType)),
            publish_time: parse_publish_time(cell(CsvField::PublishTime)),
            permalink: parse_text(cell(CsvField::Permalink)),
            counters: EngagementCounters {
                reactions: parse_int(cell(CsvField::Reactions)),
                comments: parse_int(cell(CsvField::Comments)),
                shares: parse_int(cell(CsvField::Shares)),
                views: parse_int(cell(CsvField::Views)),
                reach: parse_int(cell(CsvField::Reach)),
                total_clicks: parse_int(cell(CsvField::TotalClicks)),
                link_clicks: parse_int(cell(CsvField::LinkClicks)),
                other_clicks: parse_int(cell(CsvField::OtherClicks)),
            },
            duration_sec: parse_text(cell(CsvField::DurationSec))
                .map(|d| parse_int(&d).clamp(0, i64::from(i32::MAX)) as i32),
            is_crosspost: parse_bool(cell(CsvField::IsCrosspost)),
            is_share: parse_bool(cell(CsvField::IsShare)),
        }
    }

    /// 转换为帖子；调用方已确认 post_id 存在
    pub fn to_post(&self, post_id: PostId, page_id: PageId) -> Post {
        let mut post = Post::new(post_id, page_id);
        post.title = self.title.clone();
        post.description = self.description.clone();
        post.post_type = self.post_type;
        post.publish_time = self.publish_time;
        post.permalink = self.permalink.clone();
        post.is_crosspost = self.is_crosspost;
        post.is_share = self.is_share;
        post.duration_sec = self.duration_sec;
        post.counters = self.counters;
        post
    }
}

/// 解析结果：表头映射加逐行结果，格式错误的行保留错误信息
#[derive(Debug)]
pub struct ParsedCsv {
    pub columns: ColumnMap,
    pub rows: Vec<Result<CsvRow, String>>,
}

impl ParsedCsv {
    pub fn valid_rows(&self) -> impl Iterator<Item = &CsvRow> {
        self.rows.iter().filter_map(|r| r.as_ref().ok())
    }

    pub fn errors(&self) -> impl Iterator<Item = &String> {
        self.rows.iter().filter_map(|r| r.as_ref().err())
    }
}

/// 解析整份 CSV；表头无法读取时返回 Validation 错误
pub fn parse_csv(bytes: &[u8]) -> AppResult<ParsedCsv> {
    let body = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    let mut reader = ReaderBuilder::new().flexible(false).from_reader(body);

    let headers = reader
        .headers()
        .map_err(|e| AppError::validation(format!("无法读取 CSV 表头: {}", e)))?
        .clone();
    let columns = ColumnMap::detect(&headers);

    let mut rows = Vec::new();
    for (idx, record) in reader.records().enumerate() {
        let line = idx as u64 + 1;
        rows.push(
            record
                .map(|r| CsvRow::from_record(line, &r, &columns))
                .map_err(|e| format!("Row {}: {}", line, e)),
        );
    }

    Ok(ParsedCsv { columns, rows })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const SAMPLE: &str = "\u{feff}Post ID,Page ID,Page name,Title,Post type,Publish time,Reactions,Comments,Shares,Views\n\
        1222,106,Juana Babe Ana,Hello,Photo,2025-12-01 17:30:00,\"1,234\",5,2,N/A\n\
        1223,106,Juana Babe Ana,,Reels,,10,0,0,300\n";

    #[test]
    fn test_parse_sample() {
        let parsed = parse_csv(SAMPLE.as_bytes()).unwrap();
        assert!(parsed.columns.has(CsvField::Views));
        assert_eq!(parsed.errors().count(), 0);

        let rows: Vec<&CsvRow> = parsed.valid_rows().collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].post_id.as_deref(), Some("1222"));
        assert_eq!(rows[0].post_type, PostType::Image);
        assert_eq!(rows[0].counters.reactions, 1234);
        assert_eq!(rows[0].counters.views, 0);
        assert_eq!(
            rows[0].publish_time,
            Some(Utc.with_ymd_and_hms(2025, 12, 1, 17, 30, 0).unwrap())
        );
        assert_eq!(rows[1].title, None);
        assert_eq!(rows[1].post_type, PostType::Reel);
        assert_eq!(rows[1].publish_time, None);
        assert_eq!(rows[1].line, 2);
    }

    #[test]
    fn test_malformed_row_is_kept_as_error() {
        let data = "Post ID,Reactions\n1,5\n2,6,extra\n3,7\n";
        let parsed = parse_csv(data.as_bytes()).unwrap();
        assert_eq!(parsed.valid_rows().count(), 2);
        let errors: Vec<&String> = parsed.errors().collect();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].starts_with("Row 2"));
    }

    #[test]
    fn test_to_post() {
        let parsed = parse_csv(SAMPLE.as_bytes()).unwrap();
        let row = parsed.valid_rows().next().unwrap();
        let post = row.to_post(PostId::new("1222"), PageId::new("106"));
        assert_eq!(post.engagement(), 1234 + 5 + 2);
        assert_eq!(post.title.as_deref(), Some("Hello"));
    }
}
