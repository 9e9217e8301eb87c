//! 导入相关命令与结果

use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::entities::CsvImport;
use crate::domain::enums::{ImportMode, ImportStatus};

/// 导入 CSV 命令
#[derive(Debug, Clone)]
pub struct ImportCsvCommand {
    pub filename: String,
    pub bytes: Vec<u8>,
    pub mode: ImportMode,
    /// 主页名称子串（不区分大小写）
    pub page_filter: Option<String>,
    pub dry_run: bool,
}

impl ImportCsvCommand {
    pub fn new(filename: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            bytes,
            mode: ImportMode::default(),
            page_filter: None,
            dry_run: false,
        }
    }

    pub fn with_mode(mut self, mode: ImportMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_page_filter(mut self, filter: Option<String>) -> Self {
        self.page_filter = filter.filter(|f| !f.trim().is_empty());
        self
    }

    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }
}

/// 导入结果
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImportResult {
    pub import_id: Option<i64>,
    pub filename: String,
    pub mode: ImportMode,
    pub status: ImportStatus,
    pub rows_imported: i32,
    pub rows_updated: i32,
    pub rows_skipped: i32,
    pub date_range_start: Option<NaiveDate>,
    pub date_range_end: Option<NaiveDate>,
    pub dry_run: bool,
    pub error_message: Option<String>,
    /// 格式错误的行
    pub errors: Vec<String>,
}

impl ImportResult {
    pub(crate) fn from_record(
        record: &CsvImport,
        mode: ImportMode,
        dry_run: bool,
        errors: Vec<String>,
    ) -> Self {
        Self {
            import_id: record.id,
            filename: record.filename.clone(),
            mode,
            status: record.status,
            rows_imported: record.rows_imported,
            rows_updated: record.rows_updated,
            rows_skipped: record.rows_skipped,
            date_range_start: record.date_range_start,
            date_range_end: record.date_range_end,
            dry_run,
            error_message: record.error_message.clone(),
            errors,
        }
    }

    pub fn total_processed(&self) -> i32 {
        self.rows_imported + self.rows_updated + self.rows_skipped
    }
}

/// CSV 预检结果，不写库
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CsvValidation {
    pub valid: bool,
    pub rows: usize,
    pub columns_detected: Vec<String>,
    pub missing_required: Vec<String>,
    pub pages: Vec<String>,
    pub date_range_start: Option<NaiveDate>,
    pub date_range_end: Option<NaiveDate>,
    pub errors: Vec<String>,
}

/// 手工导出对账结果
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ManualExportResult {
    pub updated: u32,
    pub not_found: u32,
    pub skipped: u32,
}

/// 重复帖子清理结果
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DedupeResult {
    pub before: u64,
    pub after: u64,
    pub deleted: u64,
}
