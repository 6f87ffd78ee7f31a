//! pg-agent-tool library
//!
//! A read-only PostgreSQL command tool for LLM agents. An agent invokes the
//! tool with a command name and optional `table`, `query` and `path`
//! arguments and always gets a single text string back. The tool is served
//! over MCP (stdio or streamable HTTP) or invoked once from the CLI.

pub mod config;
pub mod db;
pub mod error;
pub mod mcp;
pub mod models;
pub mod tools;
pub mod transport;

pub use config::Config;
pub use error::{DbError, DbResult};
pub use mcp::ToolService;
pub use models::{Command, ConnectionSettings, ToolInput};
pub use tools::PostgresTool;
