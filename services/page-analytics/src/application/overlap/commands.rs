//! 重叠分析命令

use crate::domain::value_objects::PageId;

#[derive(Debug, Clone)]
pub struct AnalyzeOverlapCommand {
    pub page_id_1: PageId,
    pub page_id_2: PageId,
    /// 是否保存结果
    pub persist: bool,
}

impl AnalyzeOverlapCommand {
    pub fn validate(&self) -> Result<(), String> {
        if self.page_id_1 == self.page_id_2 {
            return Err("Cannot analyze overlap of a page with itself".to_string());
        }
        Ok(())
    }
}
