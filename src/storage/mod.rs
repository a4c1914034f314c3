//! Relational stats store access.
//!
//! Three storage shapes back the service: per-stat leaders tables, the full
//! season-average tables (regular and clutch context), and the standings
//! table. Strategy selection over those shapes lives in [`plan`]; execution
//! in [`players`] and [`teams`].

pub mod plan;
pub mod players;
pub mod rows;
pub mod teams;

pub use plan::{build_plan, select_strategy, ExecutionStrategy, SqlParam, SqlPlan};
pub use players::PlayerQueryExecutor;
pub use rows::{PlayerStatRow, StandingRow, TeamData, TeamPlayer};
pub use teams::{is_single_team_request, rank_standings, TeamQueryPlanner};

use std::time::Duration;

use sqlx::postgres::PgPoolOptions;
use sqlx::{Executor, PgPool};

use crate::config::DatabaseConfig;
use crate::error::DataError;

/// Build the bounded connection pool. The caps and timeouts are
/// resource-exhaustion guards, not correctness requirements; the per-session
/// statement timeout bounds worst-case latency for runaway SQL.
pub async fn connect(config: &DatabaseConfig) -> Result<PgPool, DataError> {
    let statement_timeout_ms = config.statement_timeout_secs * 1000;

    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .idle_timeout(Duration::from_secs(config.idle_timeout_secs))
        .acquire_timeout(Duration::from_secs(config.connect_timeout_secs))
        .after_connect(move |conn, _meta| {
            Box::pin(async move {
                conn.execute(format!("SET statement_timeout = {statement_timeout_ms}").as_str())
                    .await?;
                Ok(())
            })
        })
        .connect(&config.url)
        .await
        .map_err(DataError::Connection)
}
