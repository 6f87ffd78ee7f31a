//! The `inspect_query` command.
//!
//! Runs `EXPLAIN <query>` and condenses the plan into a single compact
//! string: plan decorations and all whitespace are removed so the agent gets
//! the node names and costs with nothing else.

use crate::db::QueryExecutor;
use crate::error::DbResult;
use crate::tools::format::flatten_rows;
use tracing::{error, info};

/// Fragments removed from the plan text, in order.
const PLAN_DECORATIONS: &[&str] = &["EXPLAIN", "QUERY PLAN", "->", "(", ")"];

/// Handler for `inspect_query`.
#[derive(Debug, Clone)]
pub struct ExplainToolHandler {
    executor: QueryExecutor,
}

impl ExplainToolHandler {
    pub fn new(executor: QueryExecutor) -> Self {
        Self { executor }
    }

    /// Condensed plan, or the condensed error text when EXPLAIN fails.
    pub async fn inspect_query(&self, query: &str) -> DbResult<String> {
        let output = match self.executor.run(&explain_sql(query)).await {
            Ok(output) => output,
            Err(e) => {
                error!(error = %e, "inspect_query failed");
                return Ok(condense_plan(&e.to_string()));
            }
        };

        info!(
            plan_lines = output.rows.len(),
            execution_time_ms = output.execution_time_ms,
            "inspect_query completed"
        );

        Ok(condense_plan(&flatten_rows(&output.rows)))
    }
}

/// `EXPLAIN` statement for a query.
///
/// Statements starting with `EXPLAIN` are never schema-qualified, so table
/// names in the plan resolve through the session `search_path`.
pub fn explain_sql(query: &str) -> String {
    format!("EXPLAIN {};", query)
}

/// Strip plan decorations and every whitespace character.
pub fn condense_plan(plan: &str) -> String {
    let stripped = PLAN_DECORATIONS
        .iter()
        .fold(plan.to_string(), |acc, fragment| acc.replace(fragment, ""));
    stripped.chars().filter(|c| !c.is_whitespace()).collect()
}
