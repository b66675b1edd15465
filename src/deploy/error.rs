//! Error types for stack lifecycle commands

use gpudev_stack::{StackError, StackStatus};
use std::path::PathBuf;
use thiserror::Error;

use super::Action;

/// Errors that end a command with a nonzero exit status
#[derive(Debug, Error)]
pub enum DeployError {
    /// create/update was invoked without --key-name
    #[error("key-name is required for action '{action}'")]
    MissingKeyName { action: Action },

    /// The CloudFormation template is not on disk
    #[error("Template {} not found.", .path.display())]
    TemplateNotFound { path: PathBuf },

    /// The template exists but could not be read
    #[error("Failed to read template {}: {source}", .path.display())]
    TemplateRead {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A status query or delete request failed
    #[error(transparent)]
    Stack(#[from] StackError),

    /// --wait gave up before the stack settled
    #[error("Timed out after {waited_secs}s waiting for stack {stack_name} (last status: {status})")]
    WaitTimeout {
        stack_name: String,
        status: StackStatus,
        waited_secs: u64,
    },

    /// --wait saw the stack settle somewhere other than the requested outcome
    #[error("Stack {stack_name} finished in status {status}")]
    StackFailed {
        stack_name: String,
        status: StackStatus,
    },

    /// Writing the report to stdout failed
    #[error("Failed to write output: {0}")]
    Output(#[from] std::io::Error),
}
