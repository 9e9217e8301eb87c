//! 表头识别
//!
//! 不同时期、不同语言设置的导出表头不一致，按别名列表匹配

use std::collections::HashMap;

use csv::StringRecord;

/// 可识别的字段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CsvField {
    PostId,
    PageId,
    PageName,
    Title,
    Description,
    PostType,
    PublishTime,
    Permalink,
    Reactions,
    Comments,
    Shares,
    Views,
    Reach,
    TotalClicks,
    LinkClicks,
    OtherClicks,
    DurationSec,
    IsCrosspost,
    IsShare,
}

impl CsvField {
    pub const ALL: [CsvField; 19] = [
        CsvField::PostId,
        CsvField::PageId,
        CsvField::PageName,
        CsvField::Title,
        CsvField::Description,
        CsvField::PostType,
        CsvField::PublishTime,
        CsvField::Permalink,
        CsvField::Reactions,
        CsvField::Comments,
        CsvField::Shares,
        CsvField::Views,
        CsvField::Reach,
        CsvField::TotalClicks,
        CsvField::LinkClicks,
        CsvField::OtherClicks,
        CsvField::DurationSec,
        CsvField::IsCrosspost,
        CsvField::IsShare,
    ];

    /// 校验时要求必须存在的字段
    pub const REQUIRED: [CsvField; 3] = [CsvField::PostId, CsvField::PageId, CsvField::PageName];

    pub fn name(&self) -> &'static str {
        match self {
            CsvField::PostId => "post_id",
            CsvField::PageId => "page_id",
            CsvField::PageName => "page_name",
            CsvField::Title => "title",
            CsvField::Description => "description",
            CsvField::PostType => "post_type",
            CsvField::PublishTime => "publish_time",
            CsvField::Permalink => "permalink",
            CsvField::Reactions => "reactions",
            CsvField::Comments => "comments",
            CsvField::Shares => "shares",
            CsvField::Views => "views",
            CsvField::Reach => "reach",
            CsvField::TotalClicks => "total_clicks",
            CsvField::LinkClicks => "link_clicks",
            CsvField::OtherClicks => "other_clicks",
            CsvField::DurationSec => "duration_sec",
            CsvField::IsCrosspost => "is_crosspost",
            CsvField::IsShare => "is_share",
        }
    }

    /// 按优先级排列的表头别名
    pub fn aliases(&self) -> &'static [&'static str] {
        match self {
            CsvField::PostId => &["Post ID", "PostID", "post_id", "id"],
            CsvField::PageId => &["Page ID", "PageID", "page_id"],
            CsvField::PageName => &["Page name", "PageName", "page_name", "Page"],
            CsvField::Title => &["Title", "title", "Message", "message"],
            CsvField::Description => &["Description", "description", "Caption"],
            CsvField::PostType => &["Post type", "PostType", "post_type", "Type"],
            CsvField::PublishTime => {
                &["Publish time", "PublishTime", "publish_time", "Created", "Date"]
            }
            CsvField::Permalink => &["Permalink", "permalink", "URL", "Link"],
            CsvField::Reactions => &["Reactions", "reactions", "Total Reactions", "Likes"],
            CsvField::Comments => &["Comments", "comments", "Total Comments"],
            CsvField::Shares => &["Shares", "shares", "Total Shares"],
            CsvField::Views => &["Views", "views", "Video Views", "Post Views"],
            CsvField::Reach => &["Reach", "reach", "Total Reach", "Post Reach"],
            CsvField::TotalClicks => &["Total clicks", "TotalClicks", "total_clicks", "Clicks"],
            CsvField::LinkClicks => &["Link clicks", "LinkClicks", "link_clicks"],
            CsvField::OtherClicks => &["Other clicks", "OtherClicks", "other_clicks"],
            CsvField::DurationSec => &["Duration (sec)", "Duration", "duration_sec", "Video Length"],
            CsvField::IsCrosspost => &["Is crosspost", "IsCrosspost", "is_crosspost", "Crosspost"],
            CsvField::IsShare => &["Is share", "IsShare", "is_share", "Shared"],
        }
    }
}

/// 字段到列下标的映射
#[derive(Debug, Clone, Default)]
pub struct ColumnMap {
    indices: HashMap<CsvField, usize>,
}

impl ColumnMap {
    /// 识别表头；比较时去掉首尾空白与 BOM，不区分大小写
    pub fn detect(headers: &StringRecord) -> Self {
        let normalized: Vec<String> = headers
            .iter()
            .map(|h| h.trim_start_matches('\u{feff}').trim().to_lowercase())
            .collect();

        let mut indices = HashMap::new();
        for field in CsvField::ALL {
            let found = field.aliases().iter().find_map(|alias| {
                let alias = alias.to_lowercase();
                normalized.iter().position(|h| *h == alias)
            });
            if let Some(idx) = found {
                indices.insert(field, idx);
            }
        }
        Self { indices }
    }

    pub fn index(&self, field: CsvField) -> Option<usize> {
        self.indices.get(&field).copied()
    }

    pub fn has(&self, field: CsvField) -> bool {
        self.indices.contains_key(&field)
    }

    /// 已识别的字段名，按字段定义顺序
    pub fn detected(&self) -> Vec<&'static str> {
        CsvField::ALL
            .iter()
            .filter(|f| self.has(**f))
            .map(|f| f.name())
            .collect()
    }

    pub fn missing_required(&self) -> Vec<&'static str> {
        CsvField::REQUIRED
            .iter()
            .filter(|f| !self.has(**f))
            .map(|f| f.name())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_meta_headers() {
        let headers = StringRecord::from(vec![
            "\u{feff}Post ID",
            "Page ID",
            " Page name ",
            "Title",
            "Publish time",
            "Reactions",
            "Comments",
            "Shares",
        ]);
        let columns = ColumnMap::detect(&headers);

        assert_eq!(columns.index(CsvField::PostId), Some(0));
        assert_eq!(columns.index(CsvField::PageName), Some(2));
        assert_eq!(columns.index(CsvField::Shares), Some(7));
        assert!(!columns.has(CsvField::Views));
        assert!(columns.missing_required().is_empty());
    }

    #[test]
    fn test_first_alias_wins() {
        let headers = StringRecord::from(vec!["id", "Post ID", "Likes", "Reactions"]);
        let columns = ColumnMap::detect(&headers);
        assert_eq!(columns.index(CsvField::PostId), Some(1));
        assert_eq!(columns.index(CsvField::Reactions), Some(3));
    }

    #[test]
    fn test_missing_required() {
        let headers = StringRecord::from(vec!["message", "created"]);
        let columns = ColumnMap::detect(&headers);
        assert_eq!(columns.detected(), vec!["title", "publish_time"]);
        assert_eq!(
            columns.missing_required(),
            vec!["post_id", "page_id", "page_name"]
        );
    }
}
