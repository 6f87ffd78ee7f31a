//! The `run_query` command.
//!
//! Executes arbitrary SQL through the shared executor and flattens the
//! returned rows to text. Only the first statement is ever sent; table names
//! are schema-qualified unless the statement starts with EXPLAIN or WITH.

use crate::db::{QueryExecutor, QueryOutput};
use crate::error::DbResult;
use crate::tools::format::flatten_rows;
use tracing::info;

/// Handler for `run_query`.
#[derive(Debug, Clone)]
pub struct QueryToolHandler {
    executor: QueryExecutor,
}

impl QueryToolHandler {
    pub fn new(executor: QueryExecutor) -> Self {
        Self { executor }
    }

    /// Run a query and return the flattened rows.
    pub async fn run_query(&self, query: &str) -> DbResult<String> {
        let output = self.fetch(query).await?;
        info!(
            rows = output.rows.len(),
            execution_time_ms = output.execution_time_ms,
            "run_query completed"
        );
        Ok(flatten_rows(&output.rows))
    }

    /// Run a query and return the raw output.
    pub async fn fetch(&self, query: &str) -> DbResult<QueryOutput> {
        self.executor.run(query).await
    }
}
