//! 强类型 ID 定义
//!
//! Facebook 的 ID 都是数字字符串，保持字符串形式存储以免精度丢失

use derive_more::{Display, From};
use once_cell::sync::Lazy;
use pagepulse_errors::{AppError, AppResult};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// 表格软件导出的科学计数法 ID，如 `1.22187E+17`
static SCIENTIFIC_NOTATION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d+(\.\d+)?[eE][+-]?\d+$").expect("valid regex"));

fn validate_id(kind: &str, value: &str) -> AppResult<()> {
    if value.is_empty() {
        return Err(AppError::validation(format!("{} 不能为空", kind)));
    }
    if value.len() > 128 {
        return Err(AppError::validation(format!("{} 长度不能超过128个字符", kind)));
    }
    if !value
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-' || c == '.' || c == '+')
    {
        return Err(AppError::validation(format!("{} 含有非法字符: {}", kind, value)));
    }
    Ok(())
}

/// 主页 ID
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display, From)]
#[serde(transparent)]
#[display("{_0}")]
pub struct PageId(pub String);

impl PageId {
    /// CSV 中缺少主页 ID 时使用的占位值
    pub const UNKNOWN: &'static str = "unknown";

    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn unknown() -> Self {
        Self(Self::UNKNOWN.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for PageId {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        validate_id("page_id", trimmed)?;
        Ok(Self(trimmed.to_string()))
    }
}

/// 帖子 ID
///
/// Graph API 返回 `{page_id}_{post_id}`，CSV 导出只有 `{post_id}`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display, From)]
#[serde(transparent)]
#[display("{_0}")]
pub struct PostId(pub String);

impl PostId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// 最后一个 `_` 之后的部分，用于跨格式去重
    pub fn core_id(&self) -> &str {
        match self.0.rsplit_once('_') {
            Some((_, core)) => core,
            None => &self.0,
        }
    }

    /// 是否为有损的科学计数法
    pub fn is_lossy_notation(&self) -> bool {
        SCIENTIFIC_NOTATION.is_match(&self.0)
    }
}

impl FromStr for PostId {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        validate_id("post_id", trimmed)?;
        Ok(Self(trimmed.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_id() {
        assert_eq!(PostId::new("106011874834411_1222").core_id(), "1222");
        assert_eq!(PostId::new("1222").core_id(), "1222");
        assert_eq!(PostId::new("a_b_c").core_id(), "c");
    }

    #[test]
    fn test_lossy_notation() {
        assert!(PostId::new("1.22187E+17").is_lossy_notation());
        assert!(PostId::new("1.2e17").is_lossy_notation());
        assert!(!PostId::new("122187000000000000").is_lossy_notation());
        assert!(!PostId::new("106011874834411_1222").is_lossy_notation());
    }

    #[test]
    fn test_parse_rejects_bad_ids() {
        assert!("".parse::<PageId>().is_err());
        assert!("12 34".parse::<PageId>().is_err());
        assert!("../etc".parse::<PostId>().is_err());
        assert_eq!(" 106011874834411 ".parse::<PageId>().unwrap().as_str(), "106011874834411");
    }

    #[test]
    fn test_serde_transparent() {
        let json = serde_json::to_string(&PageId::new("42")).unwrap();
        assert_eq!(json, "\"42\"");
    }
}
