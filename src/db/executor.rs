//! Query execution engine.
//!
//! [`QueryExecutor::run`] is the only path by which a statement reaches the
//! database. It prepares the statement (first statement only, backticks
//! removed, table references schema-qualified), runs it on the shared session
//! under the configured timeout, and collects the rows as text.
//!
//! Statements are sent without bind parameters, which makes sqlx use the
//! simple-query protocol: values come back in PostgreSQL's text format.

use crate::db::session::PgSession;
use crate::db::types::{CellValue, RowToText};
use crate::error::{DbError, DbResult};
use crate::tools::sql_rewrite::prepare_statement;
use futures_util::TryStreamExt;
use sqlx::postgres::PgConnection;
use sqlx::{Either, Executor};
use std::sync::Arc;
use std::time::Instant;
use tokio::time::timeout;
use tracing::{debug, warn};

/// Rows and completion data for one executed statement.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryOutput {
    pub rows: Vec<Vec<CellValue>>,
    /// Count from the server's command tag (`SELECT n`, `COPY n`, ...).
    pub rows_affected: u64,
    pub execution_time_ms: u64,
}

/// Query executor bound to the shared session.
#[derive(Debug, Clone)]
pub struct QueryExecutor {
    session: Arc<PgSession>,
}

impl QueryExecutor {
    pub fn new(session: Arc<PgSession>) -> Self {
        Self { session }
    }

    /// Schema table references are qualified with.
    pub fn schema(&self) -> &str {
        self.session.schema()
    }

    /// Prepare and execute a statement.
    pub async fn run(&self, sql: &str) -> DbResult<QueryOutput> {
        let statement = prepare_statement(sql, self.session.schema());
        let query_timeout = self.session.settings().query_timeout;

        debug!(
            sql = %statement,
            timeout_secs = query_timeout.as_secs(),
            "Executing statement"
        );

        let result = {
            let mut conn = self.session.acquire().await?;
            timeout(query_timeout, fetch_all(&mut conn, &statement)).await
        };

        match result {
            Ok(Ok(output)) => {
                debug!(
                    rows = output.rows.len(),
                    rows_affected = output.rows_affected,
                    execution_time_ms = output.execution_time_ms,
                    "Statement completed"
                );
                Ok(output)
            }
            Ok(Err(e)) => {
                if e.is_connection_lost() {
                    self.session.discard().await;
                }
                Err(e)
            }
            Err(_) => {
                warn!(
                    timeout_secs = query_timeout.as_secs(),
                    "Statement timed out"
                );
                self.session.discard().await;
                Err(DbError::timeout("query execution", query_timeout.as_secs()))
            }
        }
    }
}

async fn fetch_all(conn: &mut PgConnection, sql: &str) -> DbResult<QueryOutput> {
    let start = Instant::now();
    let mut output = QueryOutput::default();

    let mut stream = conn.fetch_many(sql);
    while let Some(item) = stream.try_next().await? {
        match item {
            Either::Left(done) => output.rows_affected += done.rows_affected(),
            Either::Right(row) => output.rows.push(row.to_cells()),
        }
    }

    output.execution_time_ms = start.elapsed().as_millis() as u64;
    Ok(output)
}
