//! 时间解析与报表时区换算
//!
//! 所有时间以 UTC 存储；按天分桶、小时分布等都在报表时区内计算

use chrono::{
    DateTime, Datelike, NaiveDate, NaiveDateTime, TimeZone, Timelike, Utc, Weekday,
};
use chrono_tz::Tz;

/// Meta 导出中不带时区的时间格式（按 UTC 解释）
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
    "%m/%d/%Y %I:%M %p",
    "%d/%m/%Y %H:%M:%S",
];

/// 解析 CSV 中的发布时间
///
/// 空值与 `N/A` 视为缺失；无法解析时返回 None
pub fn parse_publish_time(raw: &str) -> Option<DateTime<Utc>> {
    let value = raw.trim();
    if value.is_empty() || value.eq_ignore_ascii_case("n/a") {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%z") {
        return Some(dt.with_timezone(&Utc));
    }
    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
}

/// 解析 Graph API 的 `created_time`，如 `2025-01-05T10:00:00+0000`
pub fn parse_graph_time(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%z")
        .or_else(|_| DateTime::parse_from_rfc3339(raw))
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// 报表时区下的日期
pub fn local_date(instant: DateTime<Utc>, tz: Tz) -> NaiveDate {
    instant.with_timezone(&tz).date_naive()
}

/// 报表时区下的小时（0-23）
pub fn local_hour(instant: DateTime<Utc>, tz: Tz) -> u32 {
    instant.with_timezone(&tz).hour()
}

/// 报表时区下的星期
pub fn local_weekday(instant: DateTime<Utc>, tz: Tz) -> Weekday {
    instant.with_timezone(&tz).weekday()
}

/// 报表时区下的今天
pub fn today_in(tz: Tz) -> NaiveDate {
    local_date(Utc::now(), tz)
}

/// 截断到分钟
pub fn truncate_to_minute(instant: DateTime<Utc>) -> DateTime<Utc> {
    instant
        .with_second(0)
        .and_then(|dt| dt.with_nanosecond(0))
        .unwrap_or(instant)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utc(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
    }

    #[test]
    fn test_parse_csv_formats_as_utc() {
        let expected = utc(2025, 12, 1, 17, 30);
        assert_eq!(parse_publish_time("2025-12-01 17:30:00"), Some(expected));
        assert_eq!(parse_publish_time("2025-12-01T17:30:00"), Some(expected));
        assert_eq!(parse_publish_time("12/01/2025 17:30"), Some(expected));
        assert_eq!(parse_publish_time("12/01/2025 05:30 PM"), Some(expected));
        assert_eq!(parse_publish_time("2025-12-01T17:30:00Z"), Some(expected));
        assert_eq!(parse_publish_time("2025-12-02T01:30:00+08:00"), Some(expected));
    }

    #[test]
    fn test_parse_missing_and_garbage() {
        assert_eq!(parse_publish_time(""), None);
        assert_eq!(parse_publish_time("N/A"), None);
        assert_eq!(parse_publish_time("yesterday"), None);
        assert_eq!(parse_publish_time("2025-12-01"), Some(utc(2025, 12, 1, 0, 0)));
    }

    #[test]
    fn test_graph_time() {
        assert_eq!(
            parse_graph_time("2025-01-05T10:00:00+0000"),
            Some(utc(2025, 1, 5, 10, 0))
        );
        assert_eq!(parse_graph_time("not a time"), None);
    }

    #[test]
    fn test_day_rolls_over_in_manila() {
        let tz = chrono_tz::Asia::Manila;
        let late_utc = utc(2025, 12, 1, 17, 30);
        assert_eq!(local_date(late_utc, tz), NaiveDate::from_ymd_opt(2025, 12, 2).unwrap());
        assert_eq!(local_hour(late_utc, tz), 1);
        assert_eq!(local_weekday(late_utc, tz), Weekday::Tue);
        assert_eq!(local_date(late_utc, chrono_tz::UTC), NaiveDate::from_ymd_opt(2025, 12, 1).unwrap());
    }

    #[test]
    fn test_truncate_to_minute() {
        let t = Utc.with_ymd_and_hms(2025, 1, 1, 8, 15, 42).unwrap();
        assert_eq!(truncate_to_minute(t), utc(2025, 1, 1, 8, 15));
    }
}
