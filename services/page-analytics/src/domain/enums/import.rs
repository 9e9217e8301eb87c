//! 导入模式与状态

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use pagepulse_errors::AppError;

/// CSV 导入模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ImportMode {
    /// 已存在的帖子更新计数
    #[default]
    Merge,
    /// 已存在的帖子跳过
    Append,
    /// 所有行视为新数据，直接覆盖
    Replace,
}

impl ImportMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImportMode::Merge => "merge",
            ImportMode::Append => "append",
            ImportMode::Replace => "replace",
        }
    }
}

impl FromStr for ImportMode {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "merge" => Ok(ImportMode::Merge),
            "append" => Ok(ImportMode::Append),
            "replace" => Ok(ImportMode::Replace),
            other => Err(AppError::validation(format!(
                "导入模式必须为 merge、append 或 replace: {}",
                other
            ))),
        }
    }
}

impl fmt::Display for ImportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 导入结果状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportStatus {
    Completed,
    /// 部分行因格式错误被跳过
    Partial,
    Failed,
}

impl ImportStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImportStatus::Completed => "completed",
            ImportStatus::Partial => "partial",
            ImportStatus::Failed => "failed",
        }
    }
}

impl From<&str> for ImportStatus {
    fn from(value: &str) -> Self {
        match value {
            "completed" => ImportStatus::Completed,
            "partial" => ImportStatus::Partial,
            _ => ImportStatus::Failed,
        }
    }
}

impl fmt::Display for ImportStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_import_mode_parse() {
        assert_eq!("Merge".parse::<ImportMode>().unwrap(), ImportMode::Merge);
        assert_eq!("append".parse::<ImportMode>().unwrap(), ImportMode::Append);
        assert!("upsert".parse::<ImportMode>().is_err());
        assert_eq!(ImportMode::default(), ImportMode::Merge);
    }

    #[test]
    fn test_status_round_trip_through_text() {
        for status in [ImportStatus::Completed, ImportStatus::Partial, ImportStatus::Failed] {
            assert_eq!(ImportStatus::from(status.as_str()), status);
        }
    }
}
