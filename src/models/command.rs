//! Tool invocation models.
//!
//! The agent calls the tool with a command name plus optional `table`,
//! `query` and `path` arguments. This module turns that loose shape into a
//! [`Command`] and reports which argument is missing when it can't.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Raw tool input as the agent sends it.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct ToolInput {
    /// The command to execute. Options: 'show_tables', 'describe_table', 'run_query',
    /// 'inspect_query', 'summarize_table', 'export_table_to_path'.
    /// Add the schema name to the query like "schema_name".table_name.
    /// Use show_tables to get the list of tables with their descriptions and then use
    /// describe_table to get the structure of the table and its columns.
    /// Do not use column names that are not in the table; use describe_table to get the real column names.
    pub command: String,
    /// Table name (if applicable).
    #[serde(default)]
    pub table: Option<String>,
    /// SQL query (if applicable).
    #[serde(default)]
    pub query: Option<String>,
    /// Directory on the database server to export into (if applicable).
    #[serde(default)]
    pub path: Option<String>,
}

impl ToolInput {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            ..Self::default()
        }
    }

    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.table = Some(table.into());
        self
    }

    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }
}

/// The fixed set of operations the tool supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandKind {
    ShowTables,
    DescribeTable,
    SummarizeTable,
    InspectQuery,
    ExportTableToPath,
    RunQuery,
}

impl CommandKind {
    /// All commands, in the order they are advertised to the agent.
    pub const ALL: [CommandKind; 6] = [
        Self::ShowTables,
        Self::DescribeTable,
        Self::SummarizeTable,
        Self::InspectQuery,
        Self::ExportTableToPath,
        Self::RunQuery,
    ];

    /// Wire name used by the agent.
    pub fn name(&self) -> &'static str {
        match self {
            Self::ShowTables => "show_tables",
            Self::DescribeTable => "describe_table",
            Self::SummarizeTable => "summarize_table",
            Self::InspectQuery => "inspect_query",
            Self::ExportTableToPath => "export_table_to_path",
            Self::RunQuery => "run_query",
        }
    }
}

impl fmt::Display for CommandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CommandKind {
    type Err = CommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or(CommandError::InvalidCommand)
    }
}

/// A validated command with exactly the arguments it needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    ShowTables,
    DescribeTable { table: String },
    SummarizeTable { table: String },
    InspectQuery { query: String },
    ExportTableToPath { table: String, path: Option<String> },
    RunQuery { query: String },
}

impl Command {
    pub fn kind(&self) -> CommandKind {
        match self {
            Self::ShowTables => CommandKind::ShowTables,
            Self::DescribeTable { .. } => CommandKind::DescribeTable,
            Self::SummarizeTable { .. } => CommandKind::SummarizeTable,
            Self::InspectQuery { .. } => CommandKind::InspectQuery,
            Self::ExportTableToPath { .. } => CommandKind::ExportTableToPath,
            Self::RunQuery { .. } => CommandKind::RunQuery,
        }
    }
}

impl TryFrom<ToolInput> for Command {
    type Error = CommandError;

    fn try_from(input: ToolInput) -> Result<Self, Self::Error> {
        let kind: CommandKind = input.command.parse()?;
        let missing = |param| CommandError::MissingParameter {
            param,
            command: kind,
        };

        Ok(match kind {
            CommandKind::ShowTables => Command::ShowTables,
            CommandKind::DescribeTable => Command::DescribeTable {
                table: input.table.ok_or_else(|| missing("table"))?,
            },
            CommandKind::SummarizeTable => Command::SummarizeTable {
                table: input.table.ok_or_else(|| missing("table"))?,
            },
            CommandKind::InspectQuery => Command::InspectQuery {
                query: input.query.ok_or_else(|| missing("query"))?,
            },
            CommandKind::ExportTableToPath => Command::ExportTableToPath {
                table: input.table.ok_or_else(|| missing("table"))?,
                path: input.path,
            },
            CommandKind::RunQuery => Command::RunQuery {
                query: input.query.ok_or_else(|| missing("query"))?,
            },
        })
    }
}

/// Why a tool input could not be turned into a [`Command`].
///
/// The display text is returned to the agent as-is.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    #[error("Error: '{param}' parameter is required for {command}.")]
    MissingParameter {
        param: &'static str,
        command: CommandKind,
    },

    #[error(
        "Error: Invalid command. Supported commands: show_tables, describe_table, summarize_table, inspect_query, export_table_to_path, run_query."
    )]
    InvalidCommand,
}
