// ============================================================================
// bookrip-core/src/error.rs
// ============================================================================
//
// ERROR HANDLING: Error Types for the Conversion Pipeline
//
// Every pipeline stage returns a CoreResult. The dispatcher decides per file
// what to do with an error; nothing in the core library prints and carries on.
//
// KEY COMPONENTS:
// - CoreError: the single error enum for the core library
// - CoreResult: result alias
// - command_*_error helpers for external tool failures

use std::process::ExitStatus;
use thiserror::Error;

/// Errors produced by the bookrip core library.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Input file not found: {0}")]
    InputNotFound(String),

    #[error("Required external program not found: {0}")]
    DependencyNotFound(String),

    #[error("No authorization code found in the command line, $AUTHCODE, .authcode or ~/.authcode")]
    MissingAuthCode,

    #[error("Failed to start {0}: {1}")]
    CommandStart(String, #[source] std::io::Error),

    #[error("Failed waiting for {0}: {1}")]
    CommandWait(String, #[source] std::io::Error),

    #[error("{command} exited with {status}: {stderr}")]
    CommandFailed {
        command: String,
        status: ExitStatus,
        stderr: String,
    },

    #[error("JSON parse error: {0}")]
    JsonParse(String),

    #[error("Metadata field missing: {0}")]
    MissingMetadata(String),

    #[error("Don't know how to split {0} output")]
    UnsupportedSplit(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Result type for bookrip-core operations.
pub type CoreResult<T> = Result<T, CoreError>;

impl From<serde_json::Error> for CoreError {
    fn from(err: serde_json::Error) -> Self {
        CoreError::JsonParse(err.to_string())
    }
}

/// Builds the error for an external command that could not be spawned.
pub fn command_start_error(command: impl Into<String>, err: std::io::Error) -> CoreError {
    CoreError::CommandStart(command.into(), err)
}

/// Builds the error for a failure while waiting on a spawned command.
pub fn command_wait_error(command: impl Into<String>, err: std::io::Error) -> CoreError {
    CoreError::CommandWait(command.into(), err)
}

/// Builds the error for an external command that exited unsuccessfully.
pub fn command_failed_error(
    command: impl Into<String>,
    status: ExitStatus,
    stderr: impl Into<String>,
) -> CoreError {
    CoreError::CommandFailed {
        command: command.into(),
        status,
        stderr: stderr.into(),
    }
}
