//! 帖子类型

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use pagepulse_errors::AppError;

/// 帖子类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum PostType {
    Text,
    Image,
    Video,
    Reel,
    Carousel,
    Link,
    Live,
    #[default]
    Unknown,
}

impl PostType {
    pub const ALL: [PostType; 8] = [
        PostType::Text,
        PostType::Image,
        PostType::Video,
        PostType::Reel,
        PostType::Carousel,
        PostType::Link,
        PostType::Live,
        PostType::Unknown,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PostType::Text => "TEXT",
            PostType::Image => "IMAGE",
            PostType::Video => "VIDEO",
            PostType::Reel => "REEL",
            PostType::Carousel => "CAROUSEL",
            PostType::Link => "LINK",
            PostType::Live => "LIVE",
            PostType::Unknown => "UNKNOWN",
        }
    }

    /// 宽松解析 Meta 导出中的类型标签（`Photos`、`Reels` 等），无法识别时为 Unknown
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "text" | "status" => PostType::Text,
            "image" | "photo" | "photos" | "picture" => PostType::Image,
            "video" | "videos" => PostType::Video,
            "reel" | "reels" => PostType::Reel,
            "carousel" | "album" | "multi photo" | "multi-photo" => PostType::Carousel,
            "link" | "links" | "share" => PostType::Link,
            "live" | "live video" | "live_video" => PostType::Live,
            _ => PostType::Unknown,
        }
    }
}

impl fmt::Display for PostType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 严格解析，用于查询参数
impl FromStr for PostType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match PostType::from_label(s) {
            PostType::Unknown if !s.trim().eq_ignore_ascii_case("unknown") => {
                Err(AppError::validation(format!("未知的帖子类型: {}", s)))
            }
            t => Ok(t),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_label_aliases() {
        assert_eq!(PostType::from_label("Photos"), PostType::Image);
        assert_eq!(PostType::from_label(" reels "), PostType::Reel);
        assert_eq!(PostType::from_label("Album"), PostType::Carousel);
        assert_eq!(PostType::from_label("Status"), PostType::Text);
        assert_eq!(PostType::from_label("Live"), PostType::Live);
        assert_eq!(PostType::from_label(""), PostType::Unknown);
        assert_eq!(PostType::from_label("hologram"), PostType::Unknown);
    }

    #[test]
    fn test_strict_parse() {
        assert_eq!("video".parse::<PostType>().unwrap(), PostType::Video);
        assert_eq!("UNKNOWN".parse::<PostType>().unwrap(), PostType::Unknown);
        assert!("hologram".parse::<PostType>().is_err());
    }

    #[test]
    fn test_serialized_uppercase() {
        assert_eq!(serde_json::to_string(&PostType::Carousel).unwrap(), "\"CAROUSEL\"");
        for t in PostType::ALL {
            assert_eq!(PostType::from_label(t.as_str()), t);
        }
    }
}
