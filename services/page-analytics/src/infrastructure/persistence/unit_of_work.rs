//! PostgreSQL Unit of Work 实现

use std::sync::Arc;

use async_trait::async_trait;
use pagepulse_errors::{AppError, AppResult};
use sqlx::{PgPool, Postgres, Transaction};
use tokio::sync::Mutex;

use super::tx_repositories::{
    SharedTx, TxPageRepository, TxPostMetricsRepository, TxPostRepository,
};
use crate::domain::repositories::{PageRepository, PostMetricsRepository, PostRepository};
use crate::domain::unit_of_work::{UnitOfWork, UnitOfWorkFactory};

/// Postgres Unit of Work 工厂
pub struct PostgresUnitOfWorkFactory {
    pool: PgPool,
}

impl PostgresUnitOfWorkFactory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UnitOfWorkFactory for PostgresUnitOfWorkFactory {
    async fn begin(&self) -> AppResult<Box<dyn UnitOfWork>> {
        let tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::database(format!("Failed to begin transaction: {}", e)))?;

        Ok(Box::new(PostgresUnitOfWork::new(tx)))
    }
}

/// Postgres Unit of Work
pub struct PostgresUnitOfWork {
    tx: SharedTx,
    page_repo: TxPageRepository,
    post_repo: TxPostRepository,
    metrics_repo: TxPostMetricsRepository,
}

impl PostgresUnitOfWork {
    pub fn new(tx: Transaction<'static, Postgres>) -> Self {
        let tx = Arc::new(Mutex::new(Some(tx)));
        Self {
            tx: tx.clone(),
            page_repo: TxPageRepository::new(tx.clone()),
            post_repo: TxPostRepository::new(tx.clone()),
            metrics_repo: TxPostMetricsRepository::new(tx),
        }
    }
}

#[async_trait]
impl UnitOfWork for PostgresUnitOfWork {
    fn pages(&self) -> &dyn PageRepository {
        &self.page_repo
    }

    fn posts(&self) -> &dyn PostRepository {
        &self.post_repo
    }

    fn metrics(&self) -> &dyn PostMetricsRepository {
        &self.metrics_repo
    }

    async fn commit(self: Box<Self>) -> AppResult<()> {
        let mut guard = self.tx.lock().await;
        let tx = guard
            .take()
            .ok_or_else(|| AppError::internal("Transaction already consumed"))?;

        tx.commit()
            .await
            .map_err(|e| AppError::database(format!("Failed to commit transaction: {}", e)))
    }

    async fn rollback(self: Box<Self>) -> AppResult<()> {
        let mut guard = self.tx.lock().await;
        let tx = guard
            .take()
            .ok_or_else(|| AppError::internal("Transaction already consumed"))?;

        tx.rollback()
            .await
            .map_err(|e| AppError::database(format!("Failed to rollback transaction: {}", e)))
    }
}
