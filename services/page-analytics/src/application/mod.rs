//! 应用层模块

pub mod analytics;
pub mod export;
pub mod import;
pub mod overlap;
pub mod sync;

use std::sync::Arc;

use chrono_tz::Tz;
use pagepulse_config::AnalyticsConfig;

use crate::domain::repositories::{
    ImportRepository, OverlapRepository, PageRepository, PostMetricsRepository, PostRepository,
};
use crate::domain::unit_of_work::UnitOfWorkFactory;

pub use analytics::{AnalyticsQueryHandler, PostDetail};
pub use export::{build_snapshot, ExportSnapshot, Scoped};
pub use import::{
    CsvValidation, DedupeResult, ImportCommandHandler, ImportCsvCommand, ImportQueryHandler,
    ImportResult, ManualExportResult,
};
pub use overlap::{AnalyzeOverlapCommand, OverlapCommandHandler};
pub use sync::{SyncCommandHandler, SyncPageCommand, SyncResult};

/// 统计口径
#[derive(Debug, Clone)]
pub struct AnalyticsSettings {
    pub timezone: Tz,
    pub page_name_prefix: String,
    pub top_posts_limit: usize,
}

impl From<&AnalyticsConfig> for AnalyticsSettings {
    fn from(config: &AnalyticsConfig) -> Self {
        Self {
            timezone: config.timezone,
            page_name_prefix: config.page_name_prefix.clone(),
            top_posts_limit: config.top_posts_limit,
        }
    }
}

impl Default for AnalyticsSettings {
    fn default() -> Self {
        Self::from(&AnalyticsConfig::default())
    }
}

/// 各处理器共用的仓储句柄
#[derive(Clone)]
pub struct Repositories {
    pub pages: Arc<dyn PageRepository>,
    pub posts: Arc<dyn PostRepository>,
    pub metrics: Arc<dyn PostMetricsRepository>,
    pub imports: Arc<dyn ImportRepository>,
    pub overlaps: Arc<dyn OverlapRepository>,
    pub uow_factory: Arc<dyn UnitOfWorkFactory>,
}
