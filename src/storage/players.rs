//! Player query execution.

use sqlx::postgres::PgArguments;
use sqlx::query::QueryAs;
use sqlx::{PgPool, Postgres};
use tracing::debug;

use crate::error::DataError;
use crate::query::types::Query;

use super::plan::{build_plan, select_strategy, SqlParam};
use super::rows::PlayerStatRow;

/// Executes validated player queries against the stats store.
///
/// Zero matching rows is not an error; the caller decides how to present
/// "no qualified players".
pub struct PlayerQueryExecutor {
    pool: PgPool,
}

impl PlayerQueryExecutor {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn execute(&self, query: &Query) -> Result<Vec<PlayerStatRow>, DataError> {
        let strategy = select_strategy(query);
        let plan = build_plan(query);
        debug!(?strategy, sql = %plan.sql, params = plan.params.len(), "executing player query");

        let mut statement = sqlx::query_as::<_, PlayerStatRow>(&plan.sql);
        for param in &plan.params {
            statement = bind_param(statement, param);
        }

        let rows = statement
            .fetch_all(&self.pool)
            .await
            .map_err(DataError::Query)?;
        debug!(rows = rows.len(), "player query finished");
        Ok(rows)
    }
}

fn bind_param<'q>(
    statement: QueryAs<'q, Postgres, PlayerStatRow, PgArguments>,
    param: &'q SqlParam,
) -> QueryAs<'q, Postgres, PlayerStatRow, PgArguments> {
    match param {
        SqlParam::Int(v) => statement.bind(v),
        SqlParam::Float(v) => statement.bind(v),
        SqlParam::Text(v) => statement.bind(v),
    }
}
