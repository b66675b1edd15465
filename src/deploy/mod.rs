//! Stack lifecycle commands: create, update, delete and status
//!
//! Every action talks to CloudFormation through [`StackApi`] and reports to
//! the supplied writer. Errors on create/update are printed and absorbed;
//! errors on status/delete are returned to the caller.

mod error;
mod template;
mod wait;

pub use error::DeployError;

use clap::{Args, ValueEnum};
use gpudev_config::DeployConfig;
use gpudev_stack::{
    get_stack_status, parse_cidr, StackApi, StackError, StackParameters, StackRequest,
};
use std::io::Write;
use tracing::{info, warn};

use wait::{Target, WaitPolicy};

/// Operation to perform on the stack
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Action {
    Create,
    Update,
    Delete,
    Status,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Create => "create",
            Action::Update => "update",
            Action::Delete => "delete",
            Action::Status => "status",
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Args, Debug, Clone)]
pub struct DeployArgs {
    /// Stack operation to perform
    #[arg(long, value_enum)]
    pub action: Action,

    /// Your IP in CIDR, e.g., 1.2.3.4/32
    #[arg(long, value_name = "CIDR", default_value = "0.0.0.0/0", value_parser = parse_cidr)]
    pub my_ip: String,

    /// EC2 key pair name (required for create and update)
    #[arg(long)]
    pub key_name: Option<String>,

    /// EC2 instance type
    #[arg(long, default_value = "g4dn.xlarge")]
    pub instance_type: String,

    /// Root volume size in GB
    #[arg(long, value_name = "GB", default_value_t = 100)]
    pub volume_size: u32,

    /// Poll until the stack finishes creating, updating or deleting
    #[arg(long)]
    pub wait: bool,
}

#[derive(Debug, Clone, Copy)]
enum Mutation {
    Create,
    Update,
}

/// Run one action against the configured stack.
pub async fn run<A, W>(
    api: &A,
    config: &DeployConfig,
    args: &DeployArgs,
    out: &mut W,
) -> Result<(), DeployError>
where
    A: StackApi + ?Sized,
    W: Write,
{
    info!(
        action = %args.action,
        stack_name = %config.stack.name,
        region = %config.stack.region,
        "running stack action"
    );

    match args.action {
        Action::Status => status(api, config, out).await,
        Action::Delete => delete(api, config, args.wait, out).await,
        Action::Create => apply(api, config, args, Mutation::Create, out).await,
        Action::Update => apply(api, config, args, Mutation::Update, out).await,
    }
}

async fn status<A, W>(api: &A, config: &DeployConfig, out: &mut W) -> Result<(), DeployError>
where
    A: StackApi + ?Sized,
    W: Write,
{
    let stack_name = &config.stack.name;
    let state = get_stack_status(api, stack_name).await?;
    writeln!(out, "Stack {} status: {}", stack_name, state.status)?;

    match state.ssh_command() {
        Some(command) => writeln!(out, "SSH Command: {}", command)?,
        None => writeln!(
            out,
            "SSH Command not available. Stack might not be fully created yet."
        )?,
    }
    Ok(())
}

async fn delete<A, W>(
    api: &A,
    config: &DeployConfig,
    wait_for_completion: bool,
    out: &mut W,
) -> Result<(), DeployError>
where
    A: StackApi + ?Sized,
    W: Write,
{
    let stack_name = &config.stack.name;
    let state = get_stack_status(api, stack_name).await?;
    if !state.status.exists() {
        writeln!(out, "Stack {} does not exist.", stack_name)?;
        return Ok(());
    }

    writeln!(out, "Deleting stack {}...", stack_name)?;
    api.delete_stack(stack_name).await?;

    if wait_for_completion {
        let policy = WaitPolicy::from(&config.wait);
        wait::until_settled(api, stack_name, Target::Deleted, policy, out).await?;
    }
    Ok(())
}

async fn apply<A, W>(
    api: &A,
    config: &DeployConfig,
    args: &DeployArgs,
    mutation: Mutation,
    out: &mut W,
) -> Result<(), DeployError>
where
    A: StackApi + ?Sized,
    W: Write,
{
    let key_name = args
        .key_name
        .as_deref()
        .ok_or(DeployError::MissingKeyName {
            action: args.action,
        })?;

    let template_body = template::read_template(&config.stack.template_path)?;

    let parameters = StackParameters {
        my_ip: args.my_ip.clone(),
        key_name: key_name.to_string(),
        instance_type: args.instance_type.clone(),
        volume_size: args.volume_size,
    };
    let stack_name = &config.stack.name;
    let request = StackRequest::new(stack_name, template_body, &parameters);

    let submitted = match mutation {
        Mutation::Create => {
            writeln!(out, "Creating stack {}...", stack_name)?;
            api.create_stack(&request).await
        }
        Mutation::Update => {
            writeln!(out, "Updating stack {}...", stack_name)?;
            api.update_stack(&request).await
        }
    };

    match submitted {
        Ok(_) => {
            if args.wait {
                let policy = WaitPolicy::from(&config.wait);
                let state =
                    wait::until_settled(api, stack_name, Target::Present, policy, out).await?;
                if let Some(command) = state.ssh_command() {
                    writeln!(out, "SSH Command: {}", command)?;
                }
            }
        }
        Err(StackError::NoUpdates { .. }) => writeln!(out, "No updates required.")?,
        Err(e) => {
            warn!(error = %e, action = %args.action, "stack request failed");
            writeln!(out, "Error: {}", e)?;
        }
    }

    Ok(())
}
