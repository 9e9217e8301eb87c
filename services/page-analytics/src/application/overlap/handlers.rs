//! 重叠分析处理器

use pagepulse_errors::{AppError, AppResult};
use tracing::info;

use super::commands::*;
use crate::application::{AnalyticsSettings, Repositories};
use crate::domain::entities::AudienceOverlap;
use crate::domain::services::{analyze_overlap, today_in, OVERLAP_POST_LIMIT};
use crate::domain::value_objects::PageId;

pub struct OverlapCommandHandler {
    repos: Repositories,
    settings: AnalyticsSettings,
}

impl OverlapCommandHandler {
    pub fn new(repos: Repositories, settings: AnalyticsSettings) -> Self {
        Self { repos, settings }
    }

    pub async fn handle_analyze(&self, cmd: AnalyzeOverlapCommand) -> AppResult<AudienceOverlap> {
        cmd.validate().map_err(AppError::validation)?;

        for page_id in [&cmd.page_id_1, &cmd.page_id_2] {
            if self.repos.pages.find_by_id(page_id).await?.is_none() {
                return Err(AppError::not_found(format!("Page {} not found", page_id)));
            }
        }

        let posts_1 = self
            .repos
            .posts
            .list_recent_by_page(&cmd.page_id_1, OVERLAP_POST_LIMIT)
            .await?;
        let posts_2 = self
            .repos
            .posts
            .list_recent_by_page(&cmd.page_id_2, OVERLAP_POST_LIMIT)
            .await?;

        let tz = self.settings.timezone;
        let mut overlap = analyze_overlap(
            &cmd.page_id_1,
            &posts_1,
            &cmd.page_id_2,
            &posts_2,
            tz,
            today_in(tz),
        );

        if cmd.persist {
            overlap.id = Some(self.repos.overlaps.save(&overlap).await?);
        }

        info!(
            page_id_1 = %cmd.page_id_1,
            page_id_2 = %cmd.page_id_2,
            posts_1 = posts_1.len(),
            posts_2 = posts_2.len(),
            estimated = overlap.estimated_overlap_percentage,
            persisted = cmd.persist,
            "Audience overlap analyzed"
        );
        Ok(overlap)
    }

    /// 已保存的分析结果，新的在前
    pub async fn handle_list(
        &self,
        page_id: Option<&PageId>,
        limit: usize,
    ) -> AppResult<Vec<AudienceOverlap>> {
        self.repos.overlaps.list(page_id, limit).await
    }
}
