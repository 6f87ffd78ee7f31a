//! The `export_table_to_path` command.
//!
//! Uses server-side `COPY ... TO '<file>'`, so the CSV is written by the
//! database server into its own filesystem. The connecting role needs
//! `pg_write_server_files` (or superuser) for this to succeed.

use crate::db::QueryExecutor;
use crate::error::DbResult;
use crate::tools::sql_rewrite::{quote_ident, quote_literal};
use tracing::info;

/// Handler for `export_table_to_path`.
#[derive(Debug, Clone)]
pub struct ExportToolHandler {
    executor: QueryExecutor,
}

impl ExportToolHandler {
    pub fn new(executor: QueryExecutor) -> Self {
        Self { executor }
    }

    /// Export a table as CSV with a header row. Returns `COPY <n>`.
    pub async fn export_table_to_path(&self, table: &str, path: Option<&str>) -> DbResult<String> {
        let file = export_file_path(table, path);
        let sql = copy_sql(self.executor.schema(), table, &file);
        let output = self.executor.run(&sql).await?;

        info!(
            table = %table,
            file = %file,
            rows = output.rows_affected,
            "export_table_to_path completed"
        );

        Ok(format!("COPY {}", output.rows_affected))
    }
}

/// `<table>.csv`, or `<path>/<table>.csv` when a directory is given.
pub fn export_file_path(table: &str, path: Option<&str>) -> String {
    match path.map(str::trim).filter(|p| !p.is_empty()) {
        Some(dir) => format!("{}/{}.csv", dir.trim_end_matches('/'), table),
        None => format!("{}.csv", table),
    }
}

pub fn copy_sql(schema: &str, table: &str, file: &str) -> String {
    format!(
        "COPY {}.{} TO {} DELIMITER ',' CSV HEADER;",
        quote_ident(schema),
        table,
        quote_literal(file)
    )
}
