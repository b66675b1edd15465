//! Error types for CloudFormation stack operations

use aws_sdk_cloudformation::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use thiserror::Error;

/// Substring CloudFormation uses when the named stack is absent.
pub const STACK_MISSING_MARKER: &str = "does not exist";

/// Substring CloudFormation uses when an update would change nothing.
pub const NO_UPDATES_MARKER: &str = "No updates are to be performed";

/// CloudFormation reports both conditions above under this code.
const VALIDATION_ERROR_CODE: &str = "ValidationError";

/// Only a describe call names the stack itself as the missing resource.
const DESCRIBE_OPERATION: &str = "DescribeStacks";

/// Classification of a service error for programmatic handling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The stack named in the request does not exist
    StackMissing,
    /// The submitted template and parameters match the deployed stack
    NoUpdates,
    /// Anything else (throttling, permissions, malformed template, transport)
    Other,
}

impl ErrorKind {
    /// Classify a service error from the operation, code and message.
    ///
    /// Neither condition has a dedicated error code, so the message substring
    /// decides. A code other than `ValidationError` is never reclassified, and
    /// a missing stack is only recognised on `DescribeStacks`: create and
    /// update use the same wording for missing parameters and key pairs.
    pub fn classify(operation: &str, code: Option<&str>, message: &str) -> Self {
        if code.is_some_and(|c| c != VALIDATION_ERROR_CODE) {
            return ErrorKind::Other;
        }
        if message.contains(NO_UPDATES_MARKER) {
            ErrorKind::NoUpdates
        } else if operation == DESCRIBE_OPERATION && message.contains(STACK_MISSING_MARKER) {
            ErrorKind::StackMissing
        } else {
            ErrorKind::Other
        }
    }
}

/// Errors returned by [`crate::StackApi`] implementations
#[derive(Debug, Error)]
pub enum StackError {
    /// The stack does not exist
    #[error("Stack with id {stack_name} does not exist")]
    NotFound { stack_name: String },

    /// An update or create request would not change the stack
    #[error("An error occurred ({code}) when calling the {operation} operation: {message}")]
    NoUpdates {
        operation: &'static str,
        code: String,
        message: String,
    },

    /// Any other failure reported by the SDK or the service
    #[error("An error occurred ({code}) when calling the {operation} operation: {message}")]
    Service {
        operation: &'static str,
        code: String,
        message: String,
    },
}

impl StackError {
    /// Build an error from the pieces of a service response.
    pub fn from_parts(
        operation: &'static str,
        stack_name: &str,
        code: Option<&str>,
        message: impl Into<String>,
    ) -> Self {
        let message = message.into();
        let kind = ErrorKind::classify(operation, code, &message);
        let code = code.unwrap_or("Unknown").to_string();
        match kind {
            ErrorKind::StackMissing => StackError::NotFound {
                stack_name: stack_name.to_string(),
            },
            ErrorKind::NoUpdates => StackError::NoUpdates {
                operation,
                code,
                message,
            },
            ErrorKind::Other => StackError::Service {
                operation,
                code,
                message,
            },
        }
    }

    /// Convert an SDK error, keeping the service code and message when present.
    pub(crate) fn from_sdk<E, R>(
        operation: &'static str,
        stack_name: &str,
        err: SdkError<E, R>,
    ) -> Self
    where
        E: ProvideErrorMetadata + std::error::Error + Send + Sync + 'static,
        R: std::fmt::Debug + Send + Sync + 'static,
    {
        let code = err.code().map(str::to_string);
        let message = match err.message() {
            Some(message) => message.to_string(),
            None => DisplayErrorContext(&err).to_string(),
        };
        Self::from_parts(operation, stack_name, code.as_deref(), message)
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            StackError::NotFound { .. } => ErrorKind::StackMissing,
            StackError::NoUpdates { .. } => ErrorKind::NoUpdates,
            StackError::Service { .. } => ErrorKind::Other,
        }
    }
}

/// Result type alias for StackError
pub type Result<T> = std::result::Result<T, StackError>;
