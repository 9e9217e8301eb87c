//! 导入命令处理器

use std::collections::{BTreeSet, HashMap, HashSet};

use pagepulse_bootstrap::{record_csv_rows, record_import};
use pagepulse_common::DateRange;
use pagepulse_errors::{AppError, AppResult};
use tracing::{debug, error, info, warn};

use super::commands::*;
use crate::application::{AnalyticsSettings, Repositories};
use crate::domain::entities::{CsvImport, Page, Post, PostMetrics};
use crate::domain::enums::{ImportMode, ImportStatus, MetricSource};
use crate::domain::services::{local_date, match_post, plan_duplicate_cleanup, resolve_page, today_in};
use crate::domain::unit_of_work::UnitOfWork;
use crate::domain::value_objects::{EngagementCounters, PageId, PostId};
use crate::infrastructure::csv::{parse_csv, CsvField, ParsedCsv};

const MISSING_POST_ID_COLUMN: &str = "Could not find Post ID column";
const UNKNOWN_PAGE_NAME: &str = "Unknown Page";
const MANUAL_EXPORT_ROUTE: &str = "/api/v1/imports/manual";

/// 逐行处理计数
#[derive(Debug, Default)]
struct RowTally {
    imported: i32,
    updated: i32,
    skipped: i32,
    dates: Vec<chrono::NaiveDate>,
    errors: Vec<String>,
}

/// 导入命令处理器
pub struct ImportCommandHandler {
    repos: Repositories,
    settings: AnalyticsSettings,
}

impl ImportCommandHandler {
    pub fn new(repos: Repositories, settings: AnalyticsSettings) -> Self {
        Self { repos, settings }
    }

    /// 导入一份 Meta Business Suite 导出
    pub async fn handle_import(&self, cmd: ImportCsvCommand) -> AppResult<ImportResult> {
        let parsed = parse_csv(&cmd.bytes)?;
        let mut record = CsvImport::new(&cmd.filename, cmd.page_filter.clone());
        let mut errors: Vec<String> = parsed.errors().cloned().collect();

        if !parsed.columns.has(CsvField::PostId) {
            warn!(filename = %cmd.filename, "CSV has no post id column");
            record.status = ImportStatus::Failed;
            record.error_message = Some(MISSING_POST_ID_COLUMN.to_string());
            record_import(record.status.as_str());
            return Ok(ImportResult::from_record(&record, cmd.mode, cmd.dry_run, errors));
        }

        let outcome = if cmd.dry_run {
            self.process_rows(&parsed, &cmd, None).await
        } else {
            let uow = self.repos.uow_factory.begin().await?;
            match self.process_rows(&parsed, &cmd, Some(uow.as_ref())).await {
                Ok(tally) => uow.commit().await.map(|()| tally),
                Err(e) => {
                    if let Err(rollback_err) = uow.rollback().await {
                        error!(error = %rollback_err, "Failed to roll back import");
                    }
                    Err(e)
                }
            }
        };

        match outcome {
            Ok(tally) => {
                record.rows_imported = tally.imported;
                record.rows_updated = tally.updated;
                record.rows_skipped = tally.skipped;
                errors.extend(tally.errors);
                if let Some(range) = DateRange::spanning(tally.dates) {
                    record.date_range_start = Some(range.start);
                    record.date_range_end = Some(range.end);
                }
                record.status = if errors.is_empty() {
                    ImportStatus::Completed
                } else {
                    ImportStatus::Partial
                };
            }
            Err(e) => {
                error!(filename = %cmd.filename, error = %e, "CSV import failed");
                record.status = ImportStatus::Failed;
                record.error_message = Some(e.to_string());
            }
        }

        if !cmd.dry_run && (record.total_processed() > 0 || record.status == ImportStatus::Failed) {
            record.id = Some(self.repos.imports.record(&record).await?);
        }

        record_csv_rows("imported", record.rows_imported as u64);
        record_csv_rows("updated", record.rows_updated as u64);
        record_csv_rows("skipped", record.rows_skipped as u64);
        record_csv_rows("error", errors.len() as u64);
        record_import(record.status.as_str());

        info!(
            filename = %cmd.filename,
            mode = %cmd.mode,
            dry_run = cmd.dry_run,
            imported = record.rows_imported,
            updated = record.rows_updated,
            skipped = record.rows_skipped,
            status = record.status.as_str(),
            "CSV import finished"
        );

        Ok(ImportResult::from_record(&record, cmd.mode, cmd.dry_run, errors))
    }

    /// 处理所有行；`uow` 为空时只统计不写库
    async fn process_rows(
        &self,
        parsed: &ParsedCsv,
        cmd: &ImportCsvCommand,
        uow: Option<&dyn UnitOfWork>,
    ) -> AppResult<RowTally> {
        let tz = self.settings.timezone;
        let today = today_in(tz);
        let filter = cmd.page_filter.as_deref().map(str::to_lowercase);
        let mut seen: HashSet<PostId> = HashSet::new();
        let mut tally = RowTally::default();

        for (index, row) in parsed.rows.iter().enumerate() {
            let Ok(row) = row else {
                tally.skipped += 1;
                continue;
            };
            let Some(raw_id) = row.post_id.as_deref() else {
                tally.skipped += 1;
                continue;
            };
            let page_name = row
                .page_name
                .clone()
                .unwrap_or_else(|| UNKNOWN_PAGE_NAME.to_string());
            if let Some(filter) = &filter
                && !page_name.to_lowercase().contains(filter)
            {
                tally.skipped += 1;
                continue;
            }

            let post_id = PostId::new(raw_id);
            if post_id.is_lossy_notation() {
                tally.skipped += 1;
                tally.errors.push(format!(
                    "Row {}: post id '{}' is in scientific notation, import it via {}",
                    index + 1,
                    raw_id,
                    MANUAL_EXPORT_ROUTE
                ));
                continue;
            }
            let page_id = row
                .page_id
                .clone()
                .map(PageId::new)
                .unwrap_or_else(PageId::unknown);

            let existed = seen.contains(&post_id)
                || match uow {
                    Some(uow) => uow.posts().exists(&post_id).await?,
                    None => self.repos.posts.exists(&post_id).await?,
                };
            if existed && cmd.mode == ImportMode::Append {
                tally.skipped += 1;
                continue;
            }

            if let Some(uow) = uow {
                uow.pages()
                    .upsert(&Page::new(page_id.clone(), page_name))
                    .await?;
                let post = row.to_post(post_id.clone(), page_id);
                if cmd.mode == ImportMode::Replace {
                    uow.posts().replace(&post).await?;
                } else {
                    uow.posts().upsert(&post).await?;
                }
                uow.metrics()
                    .upsert(&PostMetrics::new(
                        post_id.clone(),
                        today,
                        row.counters,
                        MetricSource::Csv,
                    ))
                    .await?;
            }

            if let Some(published) = row.publish_time {
                tally.dates.push(local_date(published, tz));
            }
            if existed && cmd.mode == ImportMode::Merge {
                tally.updated += 1;
            } else {
                tally.imported += 1;
            }
            seen.insert(post_id);
        }

        Ok(tally)
    }

    /// 预检 CSV，不写库
    pub async fn handle_validate(&self, bytes: &[u8]) -> AppResult<CsvValidation> {
        let parsed = parse_csv(bytes)?;
        let tz = self.settings.timezone;

        let pages: BTreeSet<String> = parsed
            .valid_rows()
            .filter_map(|r| r.page_name.clone())
            .collect();
        let range = DateRange::spanning(
            parsed
                .valid_rows()
                .filter_map(|r| r.publish_time)
                .map(|t| local_date(t, tz)),
        );
        let errors: Vec<String> = parsed.errors().cloned().collect();
        let missing_required: Vec<String> = parsed
            .columns
            .missing_required()
            .into_iter()
            .map(str::to_string)
            .collect();

        Ok(CsvValidation {
            valid: errors.is_empty(),
            rows: parsed.rows.len(),
            columns_detected: parsed
                .columns
                .detected()
                .into_iter()
                .map(str::to_string)
                .collect(),
            missing_required,
            pages: pages.into_iter().collect(),
            date_range_start: range.map(|r| r.start),
            date_range_end: range.map(|r| r.end),
            errors,
        })
    }

    /// 手工导出对账：忽略有损 ID，按主页名与发布时间匹配已有帖子
    pub async fn handle_manual_export(
        &self,
        filename: &str,
        bytes: &[u8],
    ) -> AppResult<ManualExportResult> {
        let parsed = parse_csv(bytes)?;
        let tz = self.settings.timezone;
        let today = today_in(tz);

        let pages = self.repos.pages.list_all().await?;
        let mut by_page: HashMap<PageId, Vec<Post>> = HashMap::new();
        for post in self.repos.posts.list_all().await? {
            by_page.entry(post.page_id.clone()).or_default().push(post);
        }

        let mut result = ManualExportResult {
            skipped: parsed.errors().count() as u32,
            ..Default::default()
        };
        let mut updates: Vec<(PostId, EngagementCounters)> = Vec::new();

        for row in parsed.valid_rows() {
            let Some(page) = row
                .page_name
                .as_deref()
                .and_then(|name| resolve_page(&pages, name))
            else {
                result.not_found += 1;
                continue;
            };
            let Some(published) = row.publish_time else {
                result.skipped += 1;
                continue;
            };
            let Some(candidates) = by_page.get_mut(&page.page_id) else {
                result.not_found += 1;
                continue;
            };
            let Some((post, kind)) = match_post(candidates, published, row.title.as_deref(), tz)
            else {
                result.not_found += 1;
                continue;
            };
            debug!(post_id = %post.post_id, match_kind = ?kind, "Matched manual export row");

            let post_id = post.post_id.clone();
            let counters = post.counters.raised_to(&row.counters);
            // 同一帖子出现多次时在前一次的基础上继续取较大值
            if let Some(matched) = candidates.iter_mut().find(|p| p.post_id == post_id) {
                matched.counters = counters;
            }
            updates.push((post_id, counters));
            result.updated += 1;
        }

        let uow = self.repos.uow_factory.begin().await?;
        let written = async {
            for (post_id, counters) in &updates {
                uow.posts().update_counters(post_id, counters).await?;
                uow.metrics()
                    .upsert(&PostMetrics::new(
                        post_id.clone(),
                        today,
                        *counters,
                        MetricSource::Manual,
                    ))
                    .await?;
            }
            Ok::<(), AppError>(())
        }
        .await;
        match written {
            Ok(()) => uow.commit().await?,
            Err(e) => {
                if let Err(rollback_err) = uow.rollback().await {
                    error!(error = %rollback_err, "Failed to roll back manual export");
                }
                return Err(e);
            }
        }

        info!(
            filename,
            updated = result.updated,
            not_found = result.not_found,
            skipped = result.skipped,
            "Manual export reconciled"
        );
        Ok(result)
    }

    /// 删除重复帖子（同一主页下 core id 相同）
    pub async fn handle_cleanup_duplicates(&self) -> AppResult<DedupeResult> {
        let posts = self.repos.posts.list_all().await?;
        let before = posts.len() as u64;
        let plan = plan_duplicate_cleanup(&posts);

        if plan.is_empty() {
            info!(posts = before, "No duplicate posts found");
            return Ok(DedupeResult {
                before,
                after: before,
                deleted: 0,
            });
        }

        for group in &plan.groups {
            info!(
                page_id = %group.page_id,
                core_id = %group.core_id,
                keep = %group.keep,
                remove = group.remove.len(),
                "Removing duplicate posts"
            );
        }
        let deleted = self.repos.posts.delete_many(&plan.to_delete()).await?;

        Ok(DedupeResult {
            before,
            after: before.saturating_sub(deleted),
            deleted,
        })
    }
}
