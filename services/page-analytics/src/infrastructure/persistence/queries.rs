//! SQL 语句
//!
//! 以 `PgExecutor` 为参数，连接池仓储与事务仓储共用

use chrono::{DateTime, Utc};
use pagepulse_errors::AppResult;
use sqlx::types::Json;
use sqlx::PgExecutor;

use super::error_mapper::map_sqlx_error;
use super::rows::*;
use crate::domain::entities::{AudienceOverlap, CsvImport, Page, Post, PostMetrics};
use crate::domain::value_objects::{EngagementCounters, PageId, PostId};

pub async fn upsert_page<'e, E: PgExecutor<'e>>(executor: E, page: &Page) -> AppResult<()> {
    sqlx::query(
        r#"
        INSERT INTO pages (page_id, page_name, page_url, fan_count, followers_count,
                           talking_about_count, overall_star_rating, rating_count,
                           is_competitor, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
        ON CONFLICT (page_id) DO UPDATE SET
            page_name = EXCLUDED.page_name,
            page_url = COALESCE(EXCLUDED.page_url, pages.page_url),
            fan_count = COALESCE(EXCLUDED.fan_count, pages.fan_count),
            followers_count = COALESCE(EXCLUDED.followers_count, pages.followers_count),
            talking_about_count = COALESCE(EXCLUDED.talking_about_count, pages.talking_about_count),
            overall_star_rating = COALESCE(EXCLUDED.overall_star_rating, pages.overall_star_rating),
            rating_count = COALESCE(EXCLUDED.rating_count, pages.rating_count),
            is_competitor = pages.is_competitor OR EXCLUDED.is_competitor,
            updated_at = EXCLUDED.updated_at
        "#,
    )
    .bind(page.page_id.as_str())
    .bind(&page.page_name)
    .bind(&page.page_url)
    .bind(page.fan_count)
    .bind(page.followers_count)
    .bind(page.talking_about_count)
    .bind(page.overall_star_rating)
    .bind(page.rating_count)
    .bind(page.is_competitor)
    .bind(page.created_at)
    .bind(page.updated_at)
    .execute(executor)
    .await
    .map_err(map_sqlx_error)?;
    Ok(())
}

pub async fn find_page<'e, E: PgExecutor<'e>>(
    executor: E,
    page_id: &PageId,
) -> AppResult<Option<Page>> {
    let sql = format!("SELECT {} FROM pages WHERE page_id = $1", PAGE_COLUMNS);
    let row = sqlx::query_as::<_, PageRow>(&sql)
        .bind(page_id.as_str())
        .fetch_optional(executor)
        .await
        .map_err(map_sqlx_error)?;
    Ok(row.map(Page::from))
}

pub async fn list_pages<'e, E: PgExecutor<'e>>(executor: E) -> AppResult<Vec<Page>> {
    let sql = format!("SELECT {} FROM pages ORDER BY page_name", PAGE_COLUMNS);
    let rows = sqlx::query_as::<_, PageRow>(&sql)
        .fetch_all(executor)
        .await
        .map_err(map_sqlx_error)?;
    Ok(rows.into_iter().map(Page::from).collect())
}

const POST_INSERT: &str = r#"
    INSERT INTO posts (post_id, page_id, title, description, post_type, publish_time,
                       permalink, is_crosspost, is_share, duration_sec,
                       reactions, comments, shares, views, reach,
                       total_clicks, link_clicks, other_clicks,
                       like_count, love_count, haha_count, wow_count, sad_count, angry_count,
                       fetched_at)
    VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15,
            $16, $17, $18, $19, $20, $21, $22, $23, $24, $25)
"#;

/// 描述性字段为空时保留旧值
const POST_MERGE: &str = r#"
    ON CONFLICT (post_id) DO UPDATE SET
        page_id = EXCLUDED.page_id,
        title = COALESCE(EXCLUDED.title, posts.title),
        description = COALESCE(EXCLUDED.description, posts.description),
        post_type = CASE WHEN EXCLUDED.post_type = 'UNKNOWN'
                         THEN posts.post_type ELSE EXCLUDED.post_type END,
        publish_time = COALESCE(EXCLUDED.publish_time, posts.publish_time),
        permalink = COALESCE(EXCLUDED.permalink, posts.permalink),
        is_crosspost = EXCLUDED.is_crosspost,
        is_share = EXCLUDED.is_share,
        duration_sec = COALESCE(EXCLUDED.duration_sec, posts.duration_sec),
        reactions = EXCLUDED.reactions,
        comments = EXCLUDED.comments,
        shares = EXCLUDED.shares,
        views = EXCLUDED.views,
        reach = EXCLUDED.reach,
        total_clicks = EXCLUDED.total_clicks,
        link_clicks = EXCLUDED.link_clicks,
        other_clicks = EXCLUDED.other_clicks,
        like_count = COALESCE(EXCLUDED.like_count, posts.like_count),
        love_count = COALESCE(EXCLUDED.love_count, posts.love_count),
        haha_count = COALESCE(EXCLUDED.haha_count, posts.haha_count),
        wow_count = COALESCE(EXCLUDED.wow_count, posts.wow_count),
        sad_count = COALESCE(EXCLUDED.sad_count, posts.sad_count),
        angry_count = COALESCE(EXCLUDED.angry_count, posts.angry_count),
        fetched_at = EXCLUDED.fetched_at,
        updated_at = NOW()
"#;

/// 整行覆盖，空值也写入
const POST_OVERWRITE: &str = r#"
    ON CONFLICT (post_id) DO UPDATE SET
        page_id = EXCLUDED.page_id,
        title = EXCLUDED.title,
        description = EXCLUDED.description,
        post_type = EXCLUDED.post_type,
        publish_time = EXCLUDED.publish_time,
        permalink = EXCLUDED.permalink,
        is_crosspost = EXCLUDED.is_crosspost,
        is_share = EXCLUDED.is_share,
        duration_sec = EXCLUDED.duration_sec,
        reactions = EXCLUDED.reactions,
        comments = EXCLUDED.comments,
        shares = EXCLUDED.shares,
        views = EXCLUDED.views,
        reach = EXCLUDED.reach,
        total_clicks = EXCLUDED.total_clicks,
        link_clicks = EXCLUDED.link_clicks,
        other_clicks = EXCLUDED.other_clicks,
        like_count = EXCLUDED.like_count,
        love_count = EXCLUDED.love_count,
        haha_count = EXCLUDED.haha_count,
        wow_count = EXCLUDED.wow_count,
        sad_count = EXCLUDED.sad_count,
        angry_count = EXCLUDED.angry_count,
        fetched_at = EXCLUDED.fetched_at,
        updated_at = NOW()
"#;

pub async fn upsert_post<'e, E: PgExecutor<'e>>(executor: E, post: &Post) -> AppResult<()> {
    write_post(executor, post, POST_MERGE).await
}

pub async fn replace_post<'e, E: PgExecutor<'e>>(executor: E, post: &Post) -> AppResult<()> {
    write_post(executor, post, POST_OVERWRITE).await
}

async fn write_post<'e, E: PgExecutor<'e>>(
    executor: E,
    post: &Post,
    on_conflict: &str,
) -> AppResult<()> {
    let sql = format!("{}{}", POST_INSERT, on_conflict);
    let breakdown = post.reactions_breakdown;
    sqlx::query(&sql)
        .bind(post.post_id.as_str())
        .bind(post.page_id.as_str())
        .bind(&post.title)
        .bind(&post.description)
        .bind(post.post_type.as_str())
        .bind(post.publish_time)
        .bind(&post.permalink)
        .bind(post.is_crosspost)
        .bind(post.is_share)
        .bind(post.duration_sec)
        .bind(post.counters.reactions)
        .bind(post.counters.comments)
        .bind(post.counters.shares)
        .bind(post.counters.views)
        .bind(post.counters.reach)
        .bind(post.counters.total_clicks)
        .bind(post.counters.link_clicks)
        .bind(post.counters.other_clicks)
        .bind(breakdown.map(|b| b.like))
        .bind(breakdown.map(|b| b.love))
        .bind(breakdown.map(|b| b.haha))
        .bind(breakdown.map(|b| b.wow))
        .bind(breakdown.map(|b| b.sad))
        .bind(breakdown.map(|b| b.angry))
        .bind(post.fetched_at)
        .execute(executor)
        .await
        .map_err(map_sqlx_error)?;
    Ok(())
}

pub async fn find_post<'e, E: PgExecutor<'e>>(
    executor: E,
    post_id: &PostId,
) -> AppResult<Option<Post>> {
    let sql = format!("SELECT {} FROM posts WHERE post_id = $1", POST_COLUMNS);
    let row = sqlx::query_as::<_, PostRow>(&sql)
        .bind(post_id.as_str())
        .fetch_optional(executor)
        .await
        .map_err(map_sqlx_error)?;
    Ok(row.map(Post::from))
}

pub async fn post_exists<'e, E: PgExecutor<'e>>(executor: E, post_id: &PostId) -> AppResult<bool> {
    sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM posts WHERE post_id = $1)")
        .bind(post_id.as_str())
        .fetch_one(executor)
        .await
        .map_err(map_sqlx_error)
}

pub async fn list_posts<'e, E: PgExecutor<'e>>(executor: E) -> AppResult<Vec<Post>> {
    let sql = format!(
        "SELECT {} FROM posts ORDER BY publish_time DESC NULLS LAST, post_id",
        POST_COLUMNS
    );
    let rows = sqlx::query_as::<_, PostRow>(&sql)
        .fetch_all(executor)
        .await
        .map_err(map_sqlx_error)?;
    Ok(rows.into_iter().map(Post::from).collect())
}

pub async fn list_recent_posts_by_page<'e, E: PgExecutor<'e>>(
    executor: E,
    page_id: &PageId,
    limit: usize,
) -> AppResult<Vec<Post>> {
    let sql = format!(
        "SELECT {} FROM posts WHERE page_id = $1 \
         ORDER BY publish_time DESC NULLS LAST, post_id LIMIT $2",
        POST_COLUMNS
    );
    let rows = sqlx::query_as::<_, PostRow>(&sql)
        .bind(page_id.as_str())
        .bind(limit as i64)
        .fetch_all(executor)
        .await
        .map_err(map_sqlx_error)?;
    Ok(rows.into_iter().map(Post::from).collect())
}

pub async fn update_post_counters<'e, E: PgExecutor<'e>>(
    executor: E,
    post_id: &PostId,
    counters: &EngagementCounters,
) -> AppResult<()> {
    sqlx::query(
        r#"
        UPDATE posts SET
            reactions = $2, comments = $3, shares = $4, views = $5, reach = $6,
            total_clicks = $7, link_clicks = $8, other_clicks = $9, updated_at = NOW()
        WHERE post_id = $1
        "#,
    )
    .bind(post_id.as_str())
    .bind(counters.reactions)
    .bind(counters.comments)
    .bind(counters.shares)
    .bind(counters.views)
    .bind(counters.reach)
    .bind(counters.total_clicks)
    .bind(counters.link_clicks)
    .bind(counters.other_clicks)
    .execute(executor)
    .await
    .map_err(map_sqlx_error)?;
    Ok(())
}

/// 快照通过外键级联删除
pub async fn delete_posts<'e, E: PgExecutor<'e>>(
    executor: E,
    post_ids: &[PostId],
) -> AppResult<u64> {
    if post_ids.is_empty() {
        return Ok(0);
    }
    let ids: Vec<String> = post_ids.iter().map(|id| id.to_string()).collect();
    let result = sqlx::query("DELETE FROM posts WHERE post_id = ANY($1)")
        .bind(ids)
        .execute(executor)
        .await
        .map_err(map_sqlx_error)?;
    Ok(result.rows_affected())
}

pub async fn publish_time_bounds<'e, E: PgExecutor<'e>>(
    executor: E,
) -> AppResult<(Option<DateTime<Utc>>, Option<DateTime<Utc>>)> {
    sqlx::query_as::<_, (Option<DateTime<Utc>>, Option<DateTime<Utc>>)>(
        "SELECT MIN(publish_time), MAX(publish_time) FROM posts",
    )
    .fetch_one(executor)
    .await
    .map_err(map_sqlx_error)
}

pub async fn upsert_metrics<'e, E: PgExecutor<'e>>(
    executor: E,
    metrics: &PostMetrics,
) -> AppResult<()> {
    let c = &metrics.counters;
    sqlx::query(
        r#"
        INSERT INTO post_metrics (post_id, metric_date, reactions, comments, shares, views, reach,
                                  total_clicks, link_clicks, other_clicks, source, recorded_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
        ON CONFLICT (post_id, metric_date, source) DO UPDATE SET
            reactions = EXCLUDED.reactions,
            comments = EXCLUDED.comments,
            shares = EXCLUDED.shares,
            views = EXCLUDED.views,
            reach = EXCLUDED.reach,
            total_clicks = EXCLUDED.total_clicks,
            link_clicks = EXCLUDED.link_clicks,
            other_clicks = EXCLUDED.other_clicks,
            recorded_at = EXCLUDED.recorded_at
        "#,
    )
    .bind(metrics.post_id.as_str())
    .bind(metrics.metric_date)
    .bind(c.reactions)
    .bind(c.comments)
    .bind(c.shares)
    .bind(c.views)
    .bind(c.reach)
    .bind(c.total_clicks)
    .bind(c.link_clicks)
    .bind(c.other_clicks)
    .bind(metrics.source.as_str())
    .bind(metrics.recorded_at)
    .execute(executor)
    .await
    .map_err(map_sqlx_error)?;
    Ok(())
}

pub async fn list_metrics_by_post<'e, E: PgExecutor<'e>>(
    executor: E,
    post_id: &PostId,
) -> AppResult<Vec<PostMetrics>> {
    let sql = format!(
        "SELECT {} FROM post_metrics WHERE post_id = $1 ORDER BY metric_date, source",
        METRICS_COLUMNS
    );
    let rows = sqlx::query_as::<_, PostMetricsRow>(&sql)
        .bind(post_id.as_str())
        .fetch_all(executor)
        .await
        .map_err(map_sqlx_error)?;
    Ok(rows.into_iter().map(PostMetrics::from).collect())
}

pub async fn insert_import<'e, E: PgExecutor<'e>>(
    executor: E,
    import: &CsvImport,
) -> AppResult<i64> {
    sqlx::query_scalar::<_, i64>(
        r#"
        INSERT INTO csv_imports (filename, file_path, import_date, rows_imported, rows_updated,
                                 rows_skipped, date_range_start, date_range_end, page_filter,
                                 status, error_message)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
        RETURNING id
        "#,
    )
    .bind(&import.filename)
    .bind(&import.file_path)
    .bind(import.import_date)
    .bind(import.rows_imported)
    .bind(import.rows_updated)
    .bind(import.rows_skipped)
    .bind(import.date_range_start)
    .bind(import.date_range_end)
    .bind(&import.page_filter)
    .bind(import.status.as_str())
    .bind(&import.error_message)
    .fetch_one(executor)
    .await
    .map_err(map_sqlx_error)
}

pub async fn list_recent_imports<'e, E: PgExecutor<'e>>(
    executor: E,
    limit: usize,
) -> AppResult<Vec<CsvImport>> {
    let sql = format!(
        "SELECT {} FROM csv_imports ORDER BY import_date DESC, id DESC LIMIT $1",
        IMPORT_COLUMNS
    );
    let rows = sqlx::query_as::<_, CsvImportRow>(&sql)
        .bind(limit as i64)
        .fetch_all(executor)
        .await
        .map_err(map_sqlx_error)?;
    Ok(rows.into_iter().map(CsvImport::from).collect())
}

pub async fn upsert_overlap<'e, E: PgExecutor<'e>>(
    executor: E,
    overlap: &AudienceOverlap,
) -> AppResult<i64> {
    sqlx::query_scalar::<_, i64>(
        r#"
        INSERT INTO audience_overlaps (page_id_1, page_id_2, analysis_date, content_similarity,
                                       timing_correlation, engagement_pattern_score,
                                       estimated_overlap_percentage, analysis_method,
                                       recommendations, notes, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
        ON CONFLICT (page_id_1, page_id_2, analysis_date) DO UPDATE SET
            content_similarity = EXCLUDED.content_similarity,
            timing_correlation = EXCLUDED.timing_correlation,
            engagement_pattern_score = EXCLUDED.engagement_pattern_score,
            estimated_overlap_percentage = EXCLUDED.estimated_overlap_percentage,
            analysis_method = EXCLUDED.analysis_method,
            recommendations = EXCLUDED.recommendations,
            notes = EXCLUDED.notes,
            created_at = EXCLUDED.created_at
        RETURNING id
        "#,
    )
    .bind(overlap.page_id_1.as_str())
    .bind(overlap.page_id_2.as_str())
    .bind(overlap.analysis_date)
    .bind(overlap.content_similarity)
    .bind(overlap.timing_correlation)
    .bind(overlap.engagement_pattern_score)
    .bind(overlap.estimated_overlap_percentage)
    .bind(&overlap.analysis_method)
    .bind(Json(&overlap.recommendations))
    .bind(&overlap.notes)
    .bind(overlap.created_at)
    .fetch_one(executor)
    .await
    .map_err(map_sqlx_error)
}

pub async fn list_overlaps<'e, E: PgExecutor<'e>>(
    executor: E,
    page_id: Option<&PageId>,
    limit: usize,
) -> AppResult<Vec<AudienceOverlap>> {
    let sql = format!(
        "SELECT {} FROM audience_overlaps \
         WHERE $1::TEXT IS NULL OR page_id_1 = $1 OR page_id_2 = $1 \
         ORDER BY analysis_date DESC, id DESC LIMIT $2",
        OVERLAP_COLUMNS
    );
    let rows = sqlx::query_as::<_, OverlapRow>(&sql)
        .bind(page_id.map(|p| p.as_str()))
        .bind(limit as i64)
        .fetch_all(executor)
        .await
        .map_err(map_sqlx_error)?;
    Ok(rows.into_iter().map(AudienceOverlap::from).collect())
}

/// 表行数
pub async fn count_rows<'e, E: PgExecutor<'e>>(executor: E, table: &'static str) -> AppResult<u64> {
    let sql = format!("SELECT COUNT(*) FROM {}", table);
    let count = sqlx::query_scalar::<_, i64>(&sql)
        .fetch_one(executor)
        .await
        .map_err(map_sqlx_error)?;
    Ok(count.max(0) as u64)
}
