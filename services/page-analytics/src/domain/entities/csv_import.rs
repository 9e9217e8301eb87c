//! CSV 导入历史

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::enums::ImportStatus;

/// 一次 CSV 导入的记录
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CsvImport {
    pub id: Option<i64>,
    pub filename: String,
    pub file_path: Option<String>,
    pub import_date: DateTime<Utc>,
    pub rows_imported: i32,
    pub rows_updated: i32,
    pub rows_skipped: i32,
    pub date_range_start: Option<NaiveDate>,
    pub date_range_end: Option<NaiveDate>,
    pub page_filter: Option<String>,
    pub status: ImportStatus,
    pub error_message: Option<String>,
}

impl CsvImport {
    pub fn new(filename: impl Into<String>, page_filter: Option<String>) -> Self {
        Self {
            id: None,
            filename: filename.into(),
            file_path: None,
            import_date: Utc::now(),
            rows_imported: 0,
            rows_updated: 0,
            rows_skipped: 0,
            date_range_start: None,
            date_range_end: None,
            page_filter,
            status: ImportStatus::Completed,
            error_message: None,
        }
    }

    pub fn total_processed(&self) -> i32 {
        self.rows_imported + self.rows_updated + self.rows_skipped
    }
}
