//! Tool implementations.
//!
//! - `dispatcher`: `PostgresTool`, the entry point for every invocation
//! - `query`: `run_query`
//! - `schema`: `show_tables`, `describe_table`, `summarize_table`
//! - `explain`: `inspect_query`
//! - `export`: `export_table_to_path`
//! - `sql_rewrite`: statement preparation and schema qualification
//! - `format`: result flattening

pub mod dispatcher;
pub mod explain;
pub mod export;
pub mod format;
pub mod query;
pub mod schema;
pub mod sql_rewrite;

pub use dispatcher::PostgresTool;
pub use explain::ExplainToolHandler;
pub use export::ExportToolHandler;
pub use query::QueryToolHandler;
pub use schema::SchemaToolHandler;
