//! MCP service implementation using rmcp.
//!
//! Exposes `PostgresTool` as a single MCP tool. The tool always answers with
//! text content, including for errors, so agents see the same strings they
//! would get from a direct invocation.

use crate::models::ToolInput;
use crate::tools::PostgresTool;
use rmcp::{
    ErrorData as McpError, ServerHandler,
    handler::server::tool::ToolRouter,
    handler::server::wrapper::Parameters,
    model::{CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo},
    tool, tool_handler, tool_router,
};
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub struct ToolService {
    tool: Arc<PostgresTool>,
    /// Tool router for MCP tool dispatch (auto-generated)
    tool_router: ToolRouter<Self>,
}

impl ToolService {
    pub fn new(tool: Arc<PostgresTool>) -> Self {
        Self {
            tool,
            tool_router: Self::tool_router(),
        }
    }

    pub fn tool(&self) -> &Arc<PostgresTool> {
        &self.tool
    }
}

#[tool_router]
impl ToolService {
    #[tool(
        name = "PostgresTool",
        description = "A tool to connect to a PostgreSQL database and perform read-only operations."
    )]
    async fn postgres_tool(
        &self,
        Parameters(input): Parameters<ToolInput>,
    ) -> Result<CallToolResult, McpError> {
        info!(command = %input.command, "Tool invoked");
        let result = self.tool.run(input).await;
        Ok(CallToolResult::success(vec![Content::text(result)]))
    }
}

#[tool_handler]
impl ServerHandler for ToolService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2025_03_26,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "pg-agent-tool".to_owned(),
                title: Some("PostgreSQL Agent Tool".to_owned()),
                version: env!("CARGO_PKG_VERSION").to_owned(),
                icons: None,
                website_url: None,
            },
            instructions: Some(format!(
                "Read-only access to the PostgreSQL schema \"{schema}\" through the `PostgresTool` tool.\n\
                \n\
                ## Commands\n\
                - `show_tables`: list tables with their descriptions\n\
                - `describe_table` (table): column names, descriptions, types and lengths\n\
                - `summarize_table` (table): per-column counts and numeric statistics\n\
                - `run_query` (query): run a SELECT and get rows as text\n\
                - `inspect_query` (query): condensed EXPLAIN plan\n\
                - `export_table_to_path` (table, optional path): server-side CSV export\n\
                \n\
                ## Workflow\n\
                1. Call `show_tables` to find the relevant tables\n\
                2. Call `describe_table` to get the real column names\n\
                3. Write the query using only those columns\n\
                \n\
                Only the first statement of a query is executed. Results are one row per line \
                with values separated by \", \". Errors come back as text.",
                schema = self.tool.schema()
            )),
        }
    }
}
