//! Schema introspection commands: `show_tables`, `describe_table` and
//! `summarize_table`.
//!
//! All three build catalog queries and run them through the shared executor,
//! so they see the same statement preparation as `run_query`. The generated
//! SQL therefore avoids anything the qualification heuristic would rewrite:
//! every table after `FROM`/`JOIN` is already qualified or quoted.

use crate::db::{CellValue, QueryExecutor};
use crate::error::DbResult;
use crate::tools::format::{flatten_rows, format_cell};
use crate::tools::sql_rewrite::{quote_ident, quote_literal};
use tracing::{debug, info};

/// Column data types that get full statistics in `summarize_table`.
pub const NUMERIC_TYPES: &[&str] = &[
    "smallint",
    "integer",
    "bigint",
    "numeric",
    "real",
    "double precision",
];

/// Header line of the `summarize_table` output.
pub const SUMMARY_HEADER: &str =
    "column_name, data_type, non_null_count, null_count, sum, mean, min, max, stddev";

/// Text shown by `show_tables` for a table without a catalog comment.
pub const NO_DESCRIPTION: &str = "no description";

/// A column as reported by `information_schema.columns`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnInfo {
    pub name: String,
    pub data_type: String,
}

impl ColumnInfo {
    pub fn is_numeric(&self) -> bool {
        NUMERIC_TYPES.contains(&self.data_type.as_str())
    }
}

/// Handler for the schema introspection commands.
#[derive(Debug, Clone)]
pub struct SchemaToolHandler {
    executor: QueryExecutor,
}

impl SchemaToolHandler {
    pub fn new(executor: QueryExecutor) -> Self {
        Self { executor }
    }

    /// List base tables in the schema as `Table: <name> - <description>` lines.
    pub async fn show_tables(&self) -> DbResult<String> {
        let sql = show_tables_sql(self.executor.schema());
        let output = self.executor.run(&sql).await?;

        info!(
            schema = %self.executor.schema(),
            tables = output.rows.len(),
            "show_tables completed"
        );

        Ok(output
            .rows
            .iter()
            .map(|row| format_table_line(row))
            .collect::<Vec<_>>()
            .join("\n"))
    }

    /// List each column's name, comment, data type and maximum character length.
    pub async fn describe_table(&self, table: &str) -> DbResult<String> {
        let schema = self.executor.schema();
        let output = self.executor.run(&describe_table_sql(schema, table)).await?;

        info!(
            schema = %schema,
            table = %table,
            columns = output.rows.len(),
            "describe_table completed"
        );

        Ok(format!(
            "{}.{}\n{}",
            quote_ident(schema),
            table,
            flatten_rows(&output.rows)
        ))
    }

    /// Per-column statistics, one row per column.
    pub async fn summarize_table(&self, table: &str) -> DbResult<String> {
        let schema = self.executor.schema();
        let columns = self.table_columns(table).await?;

        // No catalog columns: let the server report a missing relation.
        if columns.is_empty() {
            self.executor.run(&row_count_sql(schema, table)).await?;
            return Ok(SUMMARY_HEADER.to_string());
        }

        debug!(
            table = %table,
            numeric = columns.iter().filter(|c| c.is_numeric()).count(),
            total = columns.len(),
            "Summarizing columns"
        );

        let output = self
            .executor
            .run(&summarize_table_sql(schema, table, &columns))
            .await?;

        info!(schema = %schema, table = %table, "summarize_table completed");

        Ok(format!("{}\n{}", SUMMARY_HEADER, flatten_rows(&output.rows)))
    }

    /// Columns of a table in ordinal order.
    pub async fn table_columns(&self, table: &str) -> DbResult<Vec<ColumnInfo>> {
        let sql = format!(
            "SELECT column_name, data_type FROM information_schema.columns \
             WHERE table_schema = {} AND table_name = {} ORDER BY ordinal_position",
            quote_literal(self.executor.schema()),
            quote_literal(table)
        );
        let output = self.executor.run(&sql).await?;

        Ok(output
            .rows
            .into_iter()
            .filter_map(|row| match row.as_slice() {
                [Some(name), Some(data_type)] => Some(ColumnInfo {
                    name: name.clone(),
                    data_type: data_type.clone(),
                }),
                _ => None,
            })
            .collect())
    }
}

fn format_table_line(row: &[CellValue]) -> String {
    let name = row.first().map(format_cell).unwrap_or_default();
    let description = row.get(1).and_then(|v| v.as_deref()).unwrap_or(NO_DESCRIPTION);
    format!("Table: {} - {}", name, description)
}

/// Base tables of `schema` with their catalog comment, ordered by name.
pub fn show_tables_sql(schema: &str) -> String {
    format!(
        "SELECT t.table_name, pg_catalog.obj_description(c.oid, 'pg_class') \
         FROM information_schema.tables t \
         JOIN pg_catalog.pg_namespace n ON n.nspname = t.table_schema \
         JOIN pg_catalog.pg_class c ON c.relname = t.table_name AND c.relnamespace = n.oid \
         WHERE t.table_schema = {} AND t.table_type = 'BASE TABLE' \
         ORDER BY t.table_name",
        quote_literal(schema)
    )
}

/// Column name, comment, data type and maximum character length of a table.
pub fn describe_table_sql(schema: &str, table: &str) -> String {
    let regclass = quote_literal(&format!("{}.{}", quote_ident(schema), quote_ident(table)));
    format!(
        "SELECT column_name, \
         pg_catalog.col_description(({regclass})::regclass, ordinal_position) AS column_description, \
         data_type, character_maximum_length \
         FROM information_schema.columns \
         WHERE table_name = {} AND table_schema = {} \
         ORDER BY ordinal_position",
        quote_literal(table),
        quote_literal(schema)
    )
}

/// Row count of a table, qualified with the session schema.
pub fn row_count_sql(schema: &str, table: &str) -> String {
    format!("SELECT COUNT(*) FROM {}.{}", quote_ident(schema), quote_ident(table))
}

/// One `UNION ALL` branch per column. Non-numeric columns get counts only.
pub fn summarize_table_sql(schema: &str, table: &str, columns: &[ColumnInfo]) -> String {
    let target = format!("{}.{}", quote_ident(schema), quote_ident(table));

    columns
        .iter()
        .map(|column| {
            let ident = quote_ident(&column.name);
            let stats = if column.is_numeric() {
                format!(
                    "SUM({ident})::numeric, AVG({ident})::numeric, MIN({ident})::numeric, \
                     MAX({ident})::numeric, STDDEV({ident})::numeric"
                )
            } else {
                "NULL::numeric, NULL::numeric, NULL::numeric, NULL::numeric, NULL::numeric"
                    .to_string()
            };
            format!(
                "SELECT {name} AS column_name, {data_type} AS data_type, \
                 COUNT({ident}) AS non_null_count, COUNT(*) - COUNT({ident}) AS null_count, \
                 {stats} FROM {target}",
                name = quote_literal(&column.name),
                data_type = quote_literal(&column.data_type),
            )
        })
        .collect::<Vec<_>>()
        .join(" UNION ALL ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::sql_rewrite::prepare_statement;

    fn column(name: &str, data_type: &str) -> ColumnInfo {
        ColumnInfo {
            name: name.to_string(),
            data_type: data_type.to_string(),
        }
    }

    #[test]
    fn test_numeric_type_detection() {
        assert!(column("price", "numeric").is_numeric());
        assert!(column("ratio", "double precision").is_numeric());
        assert!(!column("name", "text").is_numeric());
        assert!(!column("created_at", "timestamp without time zone").is_numeric());
    }

    #[test]
    fn test_catalog_queries_survive_preparation() {
        let show = show_tables_sql("shop");
        assert_eq!(prepare_statement(&show, "shop"), show);

        let describe = describe_table_sql("shop", "orders");
        let prepared = prepare_statement(&describe, "shop");
        assert!(prepared.contains("FROM information_schema.columns"));
        assert!(prepared.contains("('\"shop\".\"orders\"')::regclass"));
    }

    #[test]
    fn test_describe_table_sql_escapes_literals() {
        let sql = describe_table_sql("shop", "o'brien");
        assert!(sql.contains("table_name = 'o''brien'"));
    }

    #[test]
    fn test_summarize_sql_numeric_and_text_columns() {
        let sql = summarize_table_sql(
            "shop",
            "orders",
            &[column("amount", "integer"), column("note", "text")],
        );

        assert_eq!(sql.matches(" UNION ALL ").count(), 1);
        assert!(sql.contains("SUM(\"amount\")::numeric"));
        assert!(sql.contains("STDDEV(\"amount\")::numeric"));
        assert!(sql.contains("COUNT(\"note\") AS non_null_count"));
        assert!(!sql.contains("SUM(\"note\")"));
        assert!(sql.contains("FROM \"shop\".\"orders\""));

        let prepared = prepare_statement(&sql, "shop");
        assert!(!prepared.contains("\"shop\".\"shop\""));
    }

    #[test]
    fn test_row_count_sql_is_left_as_is_by_preparation() {
        let sql = row_count_sql("shop", "no\"pe");
        assert_eq!(sql, "SELECT COUNT(*) FROM \"shop\".\"no\"\"pe\"");
        assert_eq!(prepare_statement(&sql, "shop"), sql);
    }

    #[test]
    fn test_table_line_uses_placeholder_for_missing_comment() {
        let row = vec![Some("orders".to_string()), None];
        assert_eq!(format_table_line(&row), "Table: orders - no description");

        let row = vec![Some("users".to_string()), Some("Registered users".to_string())];
        assert_eq!(format_table_line(&row), "Table: users - Registered users");
    }
}
