//! 导入历史查询

use std::sync::Arc;

use pagepulse_errors::AppResult;

use crate::domain::entities::CsvImport;
use crate::domain::repositories::ImportRepository;

pub struct ImportQueryHandler {
    imports: Arc<dyn ImportRepository>,
}

impl ImportQueryHandler {
    pub fn new(imports: Arc<dyn ImportRepository>) -> Self {
        Self { imports }
    }

    /// 最近的导入，新的在前
    pub async fn handle_list(&self, limit: usize) -> AppResult<Vec<CsvImport>> {
        self.imports.list_recent(limit).await
    }
}
