// gpudev-stack - CloudFormation stack operations
//
// The dispatcher only sees the `StackApi` trait:
// - CloudFormationClient talks to the real service through aws-sdk-cloudformation
// - tests substitute recording fakes
//
// Service errors are classified once, at the client boundary, into StackError.

use async_trait::async_trait;

mod client;
mod error;
mod params;
mod status;

pub use client::CloudFormationClient;
pub use error::{ErrorKind, Result, StackError, NO_UPDATES_MARKER, STACK_MISSING_MARKER};
pub use params::{
    parse_cidr, Capability, StackParameter, StackParameters, StackRequest, IAM_CAPABILITIES,
};
pub use status::{
    get_stack_status, StackDescription, StackState, StackStatus, DOES_NOT_EXIST,
    SSH_COMMAND_OUTPUT,
};

/// The four CloudFormation operations the CLI issues
#[async_trait]
pub trait StackApi: Send + Sync {
    /// Describe a stack by name.
    ///
    /// Returns [`StackError::NotFound`] when CloudFormation has no such stack.
    async fn describe_stack(&self, stack_name: &str) -> Result<StackDescription>;

    /// Submit a create request, returning the new stack id when reported
    async fn create_stack(&self, request: &StackRequest) -> Result<Option<String>>;

    /// Submit an update request, returning the stack id when reported
    async fn update_stack(&self, request: &StackRequest) -> Result<Option<String>>;

    /// Request deletion. Does not wait for it to finish.
    async fn delete_stack(&self, stack_name: &str) -> Result<()>;
}
