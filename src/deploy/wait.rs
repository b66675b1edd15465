//! Polling a stack until CloudFormation finishes with it

use gpudev_config::WaitConfig;
use gpudev_stack::{get_stack_status, StackApi, StackState, StackStatus};
use std::io::Write;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, warn};

use super::DeployError;

/// How often to poll and when to give up
#[derive(Debug, Clone, Copy)]
pub(crate) struct WaitPolicy {
    pub poll_interval: Duration,
    pub timeout: Duration,
}

impl WaitPolicy {
    /// The timeout expires before a second poll could run.
    fn single_poll(&self) -> bool {
        self.poll_interval > self.timeout
    }
}

impl From<&WaitConfig> for WaitPolicy {
    fn from(config: &WaitConfig) -> Self {
        Self {
            poll_interval: config.poll_interval(),
            timeout: config.timeout(),
        }
    }
}

/// The outcome the caller asked CloudFormation for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Target {
    Present,
    Deleted,
}

impl Target {
    fn reached(self, status: &StackStatus) -> bool {
        match self {
            Target::Present => status.exists() && !status.is_failed(),
            Target::Deleted => !status.exists() || status.as_str() == "DELETE_COMPLETE",
        }
    }
}

/// Poll until the stack leaves every `*_IN_PROGRESS` state.
///
/// Each status change is printed as it is observed.
pub(crate) async fn until_settled<A, W>(
    api: &A,
    stack_name: &str,
    target: Target,
    policy: WaitPolicy,
    out: &mut W,
) -> Result<StackState, DeployError>
where
    A: StackApi + ?Sized,
    W: Write,
{
    if policy.single_poll() {
        warn!(
            poll_interval_secs = policy.poll_interval.as_secs(),
            timeout_secs = policy.timeout.as_secs(),
            "wait.poll_interval_secs exceeds wait.timeout_secs; only one poll will run"
        );
    }

    let started = Instant::now();
    let mut last: Option<StackStatus> = None;

    loop {
        let state = get_stack_status(api, stack_name).await?;

        if last.as_ref() != Some(&state.status) {
            writeln!(out, "Stack {} status: {}", stack_name, state.status)?;
            last = Some(state.status.clone());
        }

        if !state.status.is_in_progress() {
            if target.reached(&state.status) {
                return Ok(state);
            }
            return Err(DeployError::StackFailed {
                stack_name: stack_name.to_string(),
                status: state.status,
            });
        }

        let waited = started.elapsed();
        if waited >= policy.timeout {
            return Err(DeployError::WaitTimeout {
                stack_name: stack_name.to_string(),
                status: state.status,
                waited_secs: waited.as_secs(),
            });
        }

        debug!(stack_name, status = %state.status, "stack still in progress");
        tokio::time::sleep(policy.poll_interval).await;
    }
}
