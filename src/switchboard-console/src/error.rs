//! Error types for the console.

use thiserror::Error;

use crate::command::CommandId;

/// Errors returned when changing the command table.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("command pattern has no words")]
    EmptyPattern,

    #[error("command '{0}' is already registered")]
    Duplicate(String),

    #[error("command {0} is not registered")]
    NotRegistered(CommandId),
}

/// Outcome of a dispatch that did not succeed.
///
/// The matching message has already been written to the output sink when
/// one of these is returned.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DispatchError {
    #[error("empty command line")]
    Empty,

    #[error("no such command '{command}' (closest: '{suggestion}')")]
    NotFound { command: String, suggestion: String },

    #[error("permission denied for '{0}'")]
    PermissionDenied(String),

    #[error("command '{0}' cannot be run during shutdown")]
    ShutdownRestricted(String),

    #[error("invalid usage of '{0}'")]
    Usage(String),

    #[error("command '{0}' failed")]
    Failed(String),
}
