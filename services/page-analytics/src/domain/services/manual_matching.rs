//! 手工导出对账
//!
//! 手工导出的 ID 为科学计数法，无法直接使用；改为按主页名与发布时间匹配已有帖子

use chrono::{DateTime, Duration, Utc};
use chrono_tz::Tz;
use pagepulse_common::truncate_chars;

use crate::domain::entities::{Page, Post};
use crate::domain::services::{local_date, truncate_to_minute};

/// 标题比较长度
const TITLE_PREFIX_CHARS: usize = 100;
/// 标题长于此值才允许跨日期匹配
const ANY_DAY_TITLE_MIN_CHARS: usize = 20;
/// 时间模糊匹配的分钟偏移，按顺序尝试
const MINUTE_OFFSETS: [i64; 6] = [-1, 1, -2, 2, -3, 3];

/// 按名称解析主页：先精确（忽略大小写），再互相包含
pub fn resolve_page<'a>(pages: &'a [Page], name: &str) -> Option<&'a Page> {
    let wanted = name.trim().to_lowercase();
    if wanted.is_empty() {
        return None;
    }
    pages
        .iter()
        .find(|p| p.page_name.to_lowercase() == wanted)
        .or_else(|| {
            pages.iter().find(|p| {
                let candidate = p.page_name.to_lowercase();
                candidate.contains(&wanted) || wanted.contains(&candidate)
            })
        })
}

/// 匹配方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    ExactMinute,
    NearMinute(i64),
    TitleSameDay,
    TitleAnyDay,
}

fn title_key(title: &str) -> String {
    truncate_chars(title.trim(), TITLE_PREFIX_CHARS).trim().to_lowercase()
}

/// 在同一主页的帖子中查找对应帖子
pub fn match_post<'a>(
    candidates: &'a [Post],
    publish_time: DateTime<Utc>,
    title: Option<&str>,
    tz: Tz,
) -> Option<(&'a Post, MatchKind)> {
    let minute = truncate_to_minute(publish_time);
    let at_minute = |target: DateTime<Utc>| {
        candidates
            .iter()
            .find(|p| p.publish_time.map(truncate_to_minute) == Some(target))
    };

    if let Some(post) = at_minute(minute) {
        return Some((post, MatchKind::ExactMinute));
    }
    for offset in MINUTE_OFFSETS {
        if let Some(post) = at_minute(minute + Duration::minutes(offset)) {
            return Some((post, MatchKind::NearMinute(offset)));
        }
    }

    let key = title.map(title_key).filter(|k| !k.is_empty())?;
    let same_title = |p: &&Post| p.title.as_deref().map(title_key).as_deref() == Some(key.as_str());

    let day = local_date(publish_time, tz);
    if let Some(post) = candidates
        .iter()
        .filter(same_title)
        .find(|p| p.publish_date(tz) == Some(day))
    {
        return Some((post, MatchKind::TitleSameDay));
    }

    if key.chars().count() > ANY_DAY_TITLE_MIN_CHARS {
        if let Some(post) = candidates.iter().find(same_title) {
            return Some((post, MatchKind::TitleAnyDay));
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::{PageId, PostId};
    use chrono::TimeZone;

    const TZ: Tz = chrono_tz::Asia::Manila;

    fn at(h: u32, m: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 12, 1, h, m, s).unwrap()
    }

    fn post(id: &str, time: Option<DateTime<Utc>>, title: &str) -> Post {
        let mut p = Post::new(PostId::new(id), PageId::new("p"));
        p.publish_time = time;
        p.title = Some(title.to_string());
        p
    }

    #[test]
    fn test_resolve_page_exact_then_partial() {
        let pages = vec![
            Page::new(PageId::new("1"), "Juana Babe Ana"),
            Page::new(PageId::new("2"), "Juana Babe Bea"),
        ];
        assert_eq!(resolve_page(&pages, "juana babe bea").unwrap().page_id.as_str(), "2");
        assert_eq!(resolve_page(&pages, "Ana").unwrap().page_id.as_str(), "1");
        assert_eq!(
            resolve_page(&pages, "Juana Babe Ana Official").unwrap().page_id.as_str(),
            "1"
        );
        assert!(resolve_page(&pages, "Someone Else").is_none());
        assert!(resolve_page(&pages, "  ").is_none());
    }

    #[test]
    fn test_exact_minute_ignores_seconds() {
        let posts = vec![post("1", Some(at(10, 30, 45)), "a")];
        let (found, kind) = match_post(&posts, at(10, 30, 0), None, TZ).unwrap();
        assert_eq!(found.post_id.as_str(), "1");
        assert_eq!(kind, MatchKind::ExactMinute);
    }

    #[test]
    fn test_near_minute_prefers_earlier_offset() {
        let posts = vec![
            post("later", Some(at(10, 31, 0)), "a"),
            post("earlier", Some(at(10, 29, 0)), "b"),
        ];
        let (found, kind) = match_post(&posts, at(10, 30, 0), None, TZ).unwrap();
        assert_eq!(found.post_id.as_str(), "earlier");
        assert_eq!(kind, MatchKind::NearMinute(-1));

        let far = vec![post("far", Some(at(10, 34, 0)), "a")];
        assert!(match_post(&far, at(10, 30, 0), None, TZ).is_none());
    }

    #[test]
    fn test_title_same_day_then_any_day() {
        let short_title = "Good morning";
        let long_title = "Sunday special with the whole barkada";
        let posts = vec![
            post("same-day", Some(at(2, 0, 0)), short_title),
            post("other-day", Some(Utc.with_ymd_and_hms(2025, 11, 20, 2, 0, 0).unwrap()), long_title),
        ];

        let (found, kind) = match_post(&posts, at(8, 0, 0), Some("GOOD MORNING"), TZ).unwrap();
        assert_eq!(found.post_id.as_str(), "same-day");
        assert_eq!(kind, MatchKind::TitleSameDay);

        let (found, kind) = match_post(&posts, at(8, 0, 0), Some(long_title), TZ).unwrap();
        assert_eq!(found.post_id.as_str(), "other-day");
        assert_eq!(kind, MatchKind::TitleAnyDay);

        // 短标题不跨日期匹配
        let moved = at(8, 0, 0) + Duration::days(3);
        assert!(match_post(&posts, moved, Some(short_title), TZ).is_none());
    }
}
