//! 同步命令处理器

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{Duration, Utc};
use pagepulse_errors::{AppError, AppResult};
use secrecy::Secret;
use tracing::{error, info};

use super::commands::*;
use crate::application::{AnalyticsSettings, Repositories};
use crate::domain::entities::{Post, PostMetrics};
use crate::domain::enums::MetricSource;
use crate::domain::services::{today_in, SocialGraphSource};

pub struct SyncCommandHandler {
    repos: Repositories,
    source: Option<Arc<dyn SocialGraphSource>>,
    page_tokens: HashMap<String, Secret<String>>,
    settings: AnalyticsSettings,
}

impl SyncCommandHandler {
    pub fn new(
        repos: Repositories,
        source: Option<Arc<dyn SocialGraphSource>>,
        page_tokens: HashMap<String, Secret<String>>,
        settings: AnalyticsSettings,
    ) -> Self {
        Self {
            repos,
            source,
            page_tokens,
            settings,
        }
    }

    /// 拉取主页信息与回溯窗口内的帖子并写库
    pub async fn handle_sync(&self, cmd: SyncPageCommand) -> AppResult<SyncResult> {
        cmd.validate().map_err(AppError::validation)?;

        let token = self.page_tokens.get(cmd.page_id.as_str()).ok_or_else(|| {
            AppError::failed_precondition(format!(
                "No access token configured for page {}",
                cmd.page_id
            ))
        })?;
        let source = self
            .source
            .as_ref()
            .ok_or_else(|| AppError::failed_precondition("Graph API client is not configured"))?;

        let fetched_page = source.get_page_info(&cmd.page_id, token).await?;
        let page_name = fetched_page.name.clone();
        let mut page = fetched_page.into_page();
        page.page_id = cmd.page_id.clone();

        let until = Utc::now();
        let since = until - Duration::days(i64::from(cmd.days_back));
        let fetched = source
            .get_page_posts(&cmd.page_id, token, since, until)
            .await?;

        // 网络请求全部完成后再开事务
        let mut posts: Vec<Post> = Vec::with_capacity(fetched.len());
        for item in fetched {
            let breakdown = if cmd.fetch_reactions {
                Some(source.get_post_reactions(&item.post_id, token).await?)
            } else {
                None
            };
            posts.push(item.into_post(cmd.page_id.clone(), breakdown));
        }

        let today = today_in(self.settings.timezone);
        let uow = self.repos.uow_factory.begin().await?;
        let written = async {
            uow.pages().upsert(&page).await?;
            let mut created = 0u32;
            for post in &posts {
                if !uow.posts().exists(&post.post_id).await? {
                    created += 1;
                }
                uow.posts().upsert(post).await?;
                uow.metrics()
                    .upsert(&PostMetrics::new(
                        post.post_id.clone(),
                        today,
                        post.counters,
                        MetricSource::Api,
                    ))
                    .await?;
            }
            Ok::<u32, AppError>(created)
        }
        .await;

        let created = match written {
            Ok(created) => {
                uow.commit().await?;
                created
            }
            Err(e) => {
                if let Err(rollback_err) = uow.rollback().await {
                    error!(error = %rollback_err, "Failed to roll back sync");
                }
                return Err(e);
            }
        };

        let result = SyncResult {
            page_id: cmd.page_id,
            page_name,
            posts_fetched: posts.len() as u32,
            posts_created: created,
            posts_updated: posts.len() as u32 - created,
        };
        info!(
            page_id = %result.page_id,
            fetched = result.posts_fetched,
            created = result.posts_created,
            updated = result.posts_updated,
            "Page sync finished"
        );
        Ok(result)
    }
}
