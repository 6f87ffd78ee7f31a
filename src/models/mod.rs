//! Data models for the PostgreSQL agent tool.
//!
//! This module re-exports all model types used throughout the application.

pub mod command;
pub mod connection;

pub use command::{Command, CommandError, CommandKind, ToolInput};
pub use connection::{
    ConnectionSettings, ConnectionSettingsError, DEFAULT_PORT, DEFAULT_SCHEMA,
};
