//! MCP server integration module.
//!
//! Bridges the MCP protocol to `PostgresTool` using the rmcp framework.

pub mod service;

pub use service::ToolService;
