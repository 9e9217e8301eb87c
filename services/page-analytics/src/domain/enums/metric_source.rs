//! 指标来源

use serde::{Deserialize, Serialize};
use std::fmt;

/// 快照数据来源
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricSource {
    /// Meta Business Suite CSV 导出
    Csv,
    /// Graph API 同步
    Api,
    /// 手工导出对账
    Manual,
}

impl MetricSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricSource::Csv => "csv",
            MetricSource::Api => "api",
            MetricSource::Manual => "manual",
        }
    }
}

impl From<&str> for MetricSource {
    fn from(value: &str) -> Self {
        match value {
            "api" => MetricSource::Api,
            "manual" => MetricSource::Manual,
            _ => MetricSource::Csv,
        }
    }
}

impl fmt::Display for MetricSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
