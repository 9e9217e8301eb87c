//! HTTP 处理函数

use axum::{
    extract::{Path, State},
    Json,
};
use pagepulse_common::PagedResult;
use pagepulse_errors::AppResult;
use tracing::info;

use super::dto::*;
use super::extract::{ApiJson, ApiQuery};
use super::state::AppState;
use super::upload::CsvUpload;
use crate::application::{
    CsvValidation, DedupeResult, ExportSnapshot, ImportResult, ManualExportResult, PostDetail,
    SyncPageCommand, SyncResult,
};
use crate::domain::entities::{AudienceOverlap, CsvImport, Post};
use crate::domain::value_objects::{PageId, PostId};
use crate::domain::views::{
    DailyByPage, DailyEngagement, DashboardStats, DatabaseStats, PageComparison, PageSummary,
    PostTypeStats, TopPost,
};

// ---------- stats ----------

pub async fn dashboard_stats(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<FilterParams>,
) -> AppResult<Json<DashboardStats>> {
    let filter = params.into_filter()?;
    Ok(Json(state.analytics.handle_dashboard(&filter).await?))
}

pub async fn daily_stats(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<DailyParams>,
) -> AppResult<Json<Vec<DailyEngagement>>> {
    let filter = params.into_filter()?;
    Ok(Json(state.analytics.handle_daily(&filter).await?))
}

pub async fn post_type_stats(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<FilterParams>,
) -> AppResult<Json<Vec<PostTypeStats>>> {
    let filter = params.into_filter()?;
    Ok(Json(state.analytics.handle_post_types(&filter).await?))
}

pub async fn top_posts(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<TopPostsParams>,
) -> AppResult<Json<Vec<TopPost>>> {
    let query = params.into_query()?;
    Ok(Json(state.analytics.handle_top_posts(&query).await?))
}

pub async fn page_comparison(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<FilterParams>,
) -> AppResult<Json<Vec<PageComparison>>> {
    let filter = params.into_filter()?;
    Ok(Json(state.analytics.handle_page_comparison(&filter).await?))
}

pub async fn daily_by_page(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<DailyByPageParams>,
) -> AppResult<Json<DailyByPage>> {
    let filter = params.into_filter()?;
    Ok(Json(state.analytics.handle_daily_by_page(&filter).await?))
}

// ---------- pages ----------

pub async fn list_pages(State(state): State<AppState>) -> AppResult<Json<Vec<PageSummary>>> {
    Ok(Json(state.analytics.handle_list_pages().await?))
}

pub async fn get_page(
    State(state): State<AppState>,
    Path(page_id): Path<String>,
) -> AppResult<Json<PageSummary>> {
    let page_id: PageId = page_id.parse()?;
    Ok(Json(state.analytics.handle_get_page(&page_id).await?))
}

pub async fn sync_page(
    State(state): State<AppState>,
    Path(page_id): Path<String>,
    ApiQuery(params): ApiQuery<SyncParams>,
) -> AppResult<Json<SyncResult>> {
    let cmd = SyncPageCommand {
        page_id: page_id.parse()?,
        days_back: params.days_back(),
        fetch_reactions: params.fetch_reactions(),
    };
    info!(page_id = %cmd.page_id, days_back = cmd.days_back, "Sync page request");
    Ok(Json(state.sync.handle_sync(cmd).await?))
}

// ---------- posts ----------

pub async fn list_posts(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<PostListParams>,
) -> AppResult<Json<PagedResult<Post>>> {
    let query = params.into_query()?;
    Ok(Json(state.analytics.handle_list_posts(&query).await?))
}

pub async fn latest_post(State(state): State<AppState>) -> AppResult<Json<Post>> {
    Ok(Json(state.analytics.handle_latest_post().await?))
}

pub async fn get_post(
    State(state): State<AppState>,
    Path(post_id): Path<String>,
) -> AppResult<Json<PostDetail>> {
    let post_id: PostId = post_id.parse()?;
    Ok(Json(state.analytics.handle_get_post(&post_id).await?))
}

// ---------- imports ----------

pub async fn list_imports(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<HistoryParams>,
) -> AppResult<Json<Vec<CsvImport>>> {
    Ok(Json(state.import_history.handle_list(params.limit()?).await?))
}

pub async fn import_csv(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<ImportParams>,
    upload: CsvUpload,
) -> AppResult<Json<ImportResult>> {
    info!(filename = %upload.filename, bytes = upload.bytes.len(), "CSV upload received");
    let cmd = params.into_command(upload.filename, upload.bytes)?;
    Ok(Json(state.imports.handle_import(cmd).await?))
}

pub async fn validate_csv(
    State(state): State<AppState>,
    upload: CsvUpload,
) -> AppResult<Json<CsvValidation>> {
    Ok(Json(state.imports.handle_validate(&upload.bytes).await?))
}

pub async fn import_manual_export(
    State(state): State<AppState>,
    upload: CsvUpload,
) -> AppResult<Json<ManualExportResult>> {
    Ok(Json(
        state
            .imports
            .handle_manual_export(&upload.filename, &upload.bytes)
            .await?,
    ))
}

pub async fn cleanup_duplicates(State(state): State<AppState>) -> AppResult<Json<DedupeResult>> {
    Ok(Json(state.imports.handle_cleanup_duplicates().await?))
}

// ---------- overlaps ----------

pub async fn list_overlaps(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<HistoryParams>,
) -> AppResult<Json<Vec<AudienceOverlap>>> {
    let page_id = params.page_id()?;
    let limit = params.limit()?;
    Ok(Json(
        state
            .overlaps
            .handle_list(page_id.as_ref(), limit)
            .await?,
    ))
}

pub async fn analyze_overlap(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<AnalyzeOverlapRequest>,
) -> AppResult<Json<AudienceOverlap>> {
    let cmd = request.into_command()?;
    Ok(Json(state.overlaps.handle_analyze(cmd).await?))
}

// ---------- export / database ----------

pub async fn export_snapshot(State(state): State<AppState>) -> AppResult<Json<ExportSnapshot>> {
    Ok(Json(
        state.analytics.handle_export(state.top_posts_limit).await?,
    ))
}

pub async fn database_stats(State(state): State<AppState>) -> AppResult<Json<DatabaseStats>> {
    Ok(Json(state.analytics.handle_database_stats().await?))
}
