//! HTTP 层共享状态

use std::collections::HashMap;
use std::sync::Arc;

use secrecy::Secret;

use crate::application::{
    AnalyticsQueryHandler, AnalyticsSettings, ImportCommandHandler, ImportQueryHandler,
    OverlapCommandHandler, Repositories, SyncCommandHandler,
};
use crate::domain::services::SocialGraphSource;

#[derive(Clone)]
pub struct AppState {
    pub imports: Arc<ImportCommandHandler>,
    pub import_history: Arc<ImportQueryHandler>,
    pub sync: Arc<SyncCommandHandler>,
    pub overlaps: Arc<OverlapCommandHandler>,
    pub analytics: Arc<AnalyticsQueryHandler>,
    pub top_posts_limit: usize,
}

impl AppState {
    pub fn new(
        repos: Repositories,
        source: Option<Arc<dyn SocialGraphSource>>,
        page_tokens: HashMap<String, Secret<String>>,
        settings: AnalyticsSettings,
    ) -> Self {
        Self {
            imports: Arc::new(ImportCommandHandler::new(repos.clone(), settings.clone())),
            import_history: Arc::new(ImportQueryHandler::new(repos.imports.clone())),
            sync: Arc::new(SyncCommandHandler::new(
                repos.clone(),
                source,
                page_tokens,
                settings.clone(),
            )),
            overlaps: Arc::new(OverlapCommandHandler::new(repos.clone(), settings.clone())),
            top_posts_limit: settings.top_posts_limit,
            analytics: Arc::new(AnalyticsQueryHandler::new(repos, settings)),
        }
    }
}
