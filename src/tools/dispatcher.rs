//! `PostgresTool`: routes a tool invocation to its command handler.
//!
//! Callers always get a string back. Argument problems produce the fixed
//! `Error: ...` messages and never touch the database; database failures are
//! logged and returned as their display text.

use crate::db::{PgSession, QueryExecutor};
use crate::error::DbResult;
use crate::models::{Command, ConnectionSettings, ToolInput};
use crate::tools::explain::ExplainToolHandler;
use crate::tools::export::ExportToolHandler;
use crate::tools::query::QueryToolHandler;
use crate::tools::schema::SchemaToolHandler;
use std::sync::Arc;
use tracing::{debug, error, warn};

/// The database command tool.
#[derive(Debug, Clone)]
pub struct PostgresTool {
    session: Arc<PgSession>,
    query_handler: QueryToolHandler,
    schema_handler: SchemaToolHandler,
    explain_handler: ExplainToolHandler,
    export_handler: ExportToolHandler,
}

impl PostgresTool {
    /// Create the tool. The connection is opened on first use.
    pub fn new(settings: ConnectionSettings) -> Self {
        Self::with_session(Arc::new(PgSession::new(settings)))
    }

    pub fn with_session(session: Arc<PgSession>) -> Self {
        let executor = QueryExecutor::new(Arc::clone(&session));
        Self {
            query_handler: QueryToolHandler::new(executor.clone()),
            schema_handler: SchemaToolHandler::new(executor.clone()),
            explain_handler: ExplainToolHandler::new(executor.clone()),
            export_handler: ExportToolHandler::new(executor),
            session,
        }
    }

    pub fn session(&self) -> &Arc<PgSession> {
        &self.session
    }

    pub fn schema(&self) -> &str {
        self.session.schema()
    }

    /// Handle one invocation and return the text result.
    pub async fn run(&self, input: ToolInput) -> String {
        let command = match Command::try_from(input) {
            Ok(command) => command,
            Err(e) => {
                warn!(error = %e, "Rejected tool invocation");
                return e.to_string();
            }
        };

        let kind = command.kind();
        debug!(command = %kind, "Dispatching command");

        match self.execute(&command).await {
            Ok(result) => result,
            Err(e) => {
                error!(
                    command = %kind,
                    error = %e,
                    sql_state = e.sql_state().unwrap_or(""),
                    suggestion = e.suggestion().unwrap_or(""),
                    "Command failed"
                );
                e.to_string()
            }
        }
    }

    /// Execute a validated command.
    pub async fn execute(&self, command: &Command) -> DbResult<String> {
        match command {
            Command::ShowTables => self.schema_handler.show_tables().await,
            Command::DescribeTable { table } => self.schema_handler.describe_table(table).await,
            Command::SummarizeTable { table } => self.schema_handler.summarize_table(table).await,
            Command::InspectQuery { query } => self.explain_handler.inspect_query(query).await,
            Command::ExportTableToPath { table, path } => {
                self.export_handler
                    .export_table_to_path(table, path.as_deref())
                    .await
            }
            Command::RunQuery { query } => self.query_handler.run_query(query).await,
        }
    }

    /// Release the database connection.
    pub async fn close(&self) {
        self.session.close().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn offline_tool() -> PostgresTool {
        PostgresTool::new(ConnectionSettings {
            host: Some("127.0.0.1".to_string()),
            port: Some(1),
            connect_timeout: Duration::from_secs(2),
            ..ConnectionSettings::new("public")
        })
    }

    #[tokio::test]
    async fn test_missing_parameters_do_not_connect() {
        let tool = offline_tool();

        assert_eq!(
            tool.run(ToolInput::new("describe_table")).await,
            "Error: 'table' parameter is required for describe_table."
        );
        assert_eq!(
            tool.run(ToolInput::new("run_query").with_table("orders"))
                .await,
            "Error: 'query' parameter is required for run_query."
        );
        assert!(!tool.session().is_connected().await);
    }

    #[tokio::test]
    async fn test_unknown_command() {
        let tool = offline_tool();
        assert_eq!(
            tool.run(ToolInput::new("drop_everything")).await,
            "Error: Invalid command. Supported commands: show_tables, describe_table, \
             summarize_table, inspect_query, export_table_to_path, run_query."
        );
    }

    #[tokio::test]
    async fn test_connection_failure_becomes_text() {
        let tool = offline_tool();
        let result = tool.run(ToolInput::new("show_tables")).await;
        assert!(
            result.starts_with("Connection failed:") || result.starts_with("Timeout:"),
            "unexpected result: {result}"
        );
    }
}
