//! Stack status and outputs

use std::collections::BTreeMap;
use std::fmt;

use crate::error::{Result, StackError};
use crate::StackApi;

/// Output key the dev environment template publishes its SSH command under
pub const SSH_COMMAND_OUTPUT: &str = "SSHCommand";

/// Label reported when CloudFormation knows no stack by the requested name
pub const DOES_NOT_EXIST: &str = "DOES_NOT_EXIST";

/// Current status of a stack
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StackStatus {
    /// CloudFormation has no stack by this name
    DoesNotExist,
    /// Status label as reported by CloudFormation, e.g. `CREATE_COMPLETE`
    Reported(String),
}

impl StackStatus {
    pub fn as_str(&self) -> &str {
        match self {
            StackStatus::DoesNotExist => DOES_NOT_EXIST,
            StackStatus::Reported(label) => label,
        }
    }

    pub fn exists(&self) -> bool {
        !matches!(self, StackStatus::DoesNotExist)
    }

    /// True while CloudFormation is still working on the stack
    pub fn is_in_progress(&self) -> bool {
        self.as_str().ends_with("_IN_PROGRESS")
    }

    /// Settled in a state that did not reach the requested outcome
    pub fn is_failed(&self) -> bool {
        if self.is_in_progress() {
            return false;
        }
        let label = self.as_str();
        label.contains("FAILED") || label.contains("ROLLBACK")
    }
}

impl fmt::Display for StackStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A stack as returned by `DescribeStacks`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StackDescription {
    pub status: String,
    pub outputs: BTreeMap<String, String>,
}

/// Result of a status query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackState {
    pub status: StackStatus,
    pub outputs: BTreeMap<String, String>,
}

impl StackState {
    pub fn missing() -> Self {
        Self {
            status: StackStatus::DoesNotExist,
            outputs: BTreeMap::new(),
        }
    }

    /// The `SSHCommand` output, if the stack published a non-empty one
    pub fn ssh_command(&self) -> Option<&str> {
        self.outputs
            .get(SSH_COMMAND_OUTPUT)
            .map(String::as_str)
            .filter(|cmd| !cmd.is_empty())
    }
}

impl From<StackDescription> for StackState {
    fn from(description: StackDescription) -> Self {
        Self {
            status: StackStatus::Reported(description.status),
            outputs: description.outputs,
        }
    }
}

/// Retrieve the stack status and outputs.
///
/// A missing stack is not an error: it yields [`StackStatus::DoesNotExist`]
/// with no outputs. Every other failure is returned to the caller.
pub async fn get_stack_status<A>(api: &A, stack_name: &str) -> Result<StackState>
where
    A: StackApi + ?Sized,
{
    match api.describe_stack(stack_name).await {
        Ok(description) => Ok(description.into()),
        Err(StackError::NotFound { .. }) => {
            tracing::debug!(stack_name, "stack not found");
            Ok(StackState::missing())
        }
        Err(e) => Err(e),
    }
}
