//! 同步命令

use serde::Serialize;

use crate::domain::value_objects::PageId;

/// 同步一个主页
#[derive(Debug, Clone)]
pub struct SyncPageCommand {
    pub page_id: PageId,
    /// 回溯天数
    pub days_back: u32,
    /// 逐帖拉取表情细分（每帖 6 次请求）
    pub fetch_reactions: bool,
}

impl SyncPageCommand {
    pub fn validate(&self) -> Result<(), String> {
        if self.days_back == 0 || self.days_back > 730 {
            return Err("days_back must be between 1 and 730".to_string());
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyncResult {
    pub page_id: PageId,
    pub page_name: String,
    pub posts_fetched: u32,
    pub posts_created: u32,
    pub posts_updated: u32,
}
