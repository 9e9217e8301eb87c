//! PostgreSQL 持久化

mod error_mapper;
mod queries;
mod repositories;
mod rows;
mod tx_repositories;
mod unit_of_work;

pub use error_mapper::map_sqlx_error;
pub use repositories::*;
pub use tx_repositories::SharedTx;
pub use unit_of_work::{PostgresUnitOfWork, PostgresUnitOfWorkFactory};
