//! Facebook Graph API 客户端

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use pagepulse_bootstrap::record_graph_api_request;
use pagepulse_common::{retry_transient, RetryPolicy};
use pagepulse_config::FacebookConfig;
use pagepulse_errors::{AppError, AppResult};
use secrecy::{ExposeSecret, Secret};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::models::{GraphErrorBody, GraphPost, PageInfo, Paged, SummaryEdge};
use crate::domain::services::{FetchedPage, FetchedPost, SocialGraphSource};
use crate::domain::value_objects::{PageId, PostId, ReactionBreakdown};

const PAGE_FIELDS: &str = "id,name,fan_count,followers_count,link";
const POST_FIELDS: &str = "id,message,created_time,permalink_url,shares,\
attachments{type,media_type,title,description},\
reactions.summary(total_count).limit(0),\
comments.summary(total_count).limit(0)";
const POSTS_PAGE_SIZE: &str = "100";

#[derive(Debug, Clone)]
pub struct GraphApiClient {
    client: reqwest::Client,
    base_url: String,
    request_delay: Duration,
    retry: RetryPolicy,
}

impl GraphApiClient {
    pub fn new(config: &FacebookConfig) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| AppError::internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: format!(
                "{}/{}",
                config.graph_url.trim_end_matches('/'),
                config.api_version
            ),
            request_delay: Duration::from_millis(config.request_delay_ms),
            retry: RetryPolicy::new(3, Duration::from_millis(500), Duration::from_secs(5)),
        })
    }

    async fn get<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        metric_label: &str,
        token: &Secret<String>,
        params: &[(&str, &str)],
    ) -> AppResult<T> {
        let url = format!("{}/{}", self.base_url, endpoint);
        let result = retry_transient(&self.retry, metric_label, || {
            self.send(&url, token, params)
        })
        .await;
        record_graph_api_request(metric_label, result.is_ok());
        result
    }

    async fn send<T: DeserializeOwned>(
        &self,
        url: &str,
        token: &Secret<String>,
        params: &[(&str, &str)],
    ) -> AppResult<T> {
        let response = self
            .client
            .get(url)
            .query(params)
            .bearer_auth(token.expose_secret())
            .send()
            .await
            .map_err(|e| {
                AppError::external_service(format!("Graph API 请求失败: {}", e.without_url()))
            })?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| {
                AppError::external_service(format!("Graph API 响应读取失败: {}", e.without_url()))
            })?;

        if !status.is_success() {
            let message = serde_json::from_slice::<GraphErrorBody>(&body)
                .map(|b| b.error.message)
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppError::external_service(format!(
                "Graph API 错误 ({}): {}",
                status.as_u16(),
                message
            )));
        }

        serde_json::from_slice(&body)
            .map_err(|e| AppError::external_service(format!("Graph API 响应解析失败: {}", e)))
    }
}

#[async_trait]
impl SocialGraphSource for GraphApiClient {
    async fn get_page_info(
        &self,
        page_id: &PageId,
        token: &Secret<String>,
    ) -> AppResult<FetchedPage> {
        let info: PageInfo = self
            .get(page_id.as_str(), "page", token, &[("fields", PAGE_FIELDS)])
            .await?;
        Ok(info.into())
    }

    async fn get_page_posts(
        &self,
        page_id: &PageId,
        token: &Secret<String>,
        since: DateTime<Utc>,
        until: DateTime<Utc>,
    ) -> AppResult<Vec<FetchedPost>> {
        let endpoint = format!("{}/posts", page_id);
        let since = since.timestamp().to_string();
        let until = until.timestamp().to_string();

        let mut posts = Vec::new();
        let mut after: Option<String> = None;
        loop {
            let mut params = vec![
                ("fields", POST_FIELDS),
                ("limit", POSTS_PAGE_SIZE),
                ("since", since.as_str()),
                ("until", until.as_str()),
            ];
            if let Some(cursor) = after.as_deref() {
                params.push(("after", cursor));
            }

            let page: Paged<GraphPost> = self.get(&endpoint, "posts", token, &params).await?;
            let next = page.next_cursor().map(str::to_string);
            posts.extend(page.data.into_iter().map(FetchedPost::from));
            debug!(page_id = %page_id, fetched = posts.len(), "Fetched posts page");

            match next {
                Some(cursor) => {
                    after = Some(cursor);
                    tokio::time::sleep(self.request_delay).await;
                }
                None => break,
            }
        }

        Ok(posts)
    }

    async fn get_post_reactions(
        &self,
        post_id: &PostId,
        token: &Secret<String>,
    ) -> AppResult<ReactionBreakdown> {
        let endpoint = format!("{}/reactions", post_id);
        let mut breakdown = ReactionBreakdown::default();

        for reaction_type in ReactionBreakdown::TYPES {
            let params = [
                ("type", reaction_type),
                ("summary", "total_count"),
                ("limit", "0"),
            ];
            let count = match self
                .get::<SummaryEdge>(&endpoint, "reactions", token, &params)
                .await
            {
                Ok(edge) => edge.summary.total_count,
                Err(e) => {
                    warn!(post_id = %post_id, reaction_type, error = %e, "Reaction count unavailable");
                    0
                }
            };
            breakdown.set(reaction_type, count);
            tokio::time::sleep(self.request_delay / 2).await;
        }

        Ok(breakdown)
    }
}
