//! Test harness for dispatcher tests
//!
//! Provides a scripted, recording implementation of `StackApi`:
//! - describe replies are consumed in order; the last one repeats
//! - create/update either succeed or fail with a configured service error
//! - every call is recorded for assertions

#![allow(dead_code)]

use async_trait::async_trait;
use gpudev_config::DeployConfig;
use gpudev_stack::{StackApi, StackDescription, StackError, StackRequest, Result};
use std::collections::{BTreeMap, VecDeque};
use std::path::Path;
use std::sync::Mutex;

pub const STACK_NAME: &str = "gpu-dev-env";

pub const TEMPLATE_BODY: &str = "AWSTemplateFormatVersion: '2010-09-09'\nResources: {}\n";

/// A call received by the fake
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Describe(String),
    Create(StackRequest),
    Update(StackRequest),
    Delete(String),
}

/// One scripted reply to `describe_stack`
#[derive(Debug, Clone)]
pub enum DescribeReply {
    Found(StackDescription),
    Missing,
    Fail { code: String, message: String },
}

impl DescribeReply {
    pub fn status(status: &str) -> Self {
        Self::with_outputs(status, &[])
    }

    pub fn with_outputs(status: &str, outputs: &[(&str, &str)]) -> Self {
        DescribeReply::Found(StackDescription {
            status: status.to_string(),
            outputs: outputs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect::<BTreeMap<_, _>>(),
        })
    }
}

pub struct FakeStackApi {
    describe: Mutex<VecDeque<DescribeReply>>,
    mutation_error: Option<(String, String)>,
    calls: Mutex<Vec<Call>>,
}

impl FakeStackApi {
    pub fn scripted(replies: Vec<DescribeReply>) -> Self {
        assert!(!replies.is_empty(), "at least one describe reply required");
        Self {
            describe: Mutex::new(replies.into()),
            mutation_error: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// CloudFormation has no stack by the requested name
    pub fn missing() -> Self {
        Self::scripted(vec![DescribeReply::Missing])
    }

    pub fn with_status(status: &str) -> Self {
        Self::scripted(vec![DescribeReply::status(status)])
    }

    /// Fail every create/update with the given service error
    pub fn failing_mutations(mut self, code: &str, message: &str) -> Self {
        self.mutation_error = Some((code.to_string(), message.to_string()));
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn mutations(&self) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|c| !matches!(c, Call::Describe(_)))
            .collect()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn next_describe(&self) -> DescribeReply {
        let mut replies = self.describe.lock().unwrap();
        if replies.len() > 1 {
            replies.pop_front().unwrap()
        } else {
            replies.front().cloned().unwrap()
        }
    }

    fn mutation_result(&self, operation: &'static str, stack_name: &str) -> Result<Option<String>> {
        match &self.mutation_error {
            Some((code, message)) => Err(StackError::from_parts(
                operation,
                stack_name,
                Some(code.as_str()),
                message.clone(),
            )),
            None => Ok(Some(format!(
                "arn:aws:cloudformation:us-east-1:123456789012:stack/{}/1",
                stack_name
            ))),
        }
    }
}

#[async_trait]
impl StackApi for FakeStackApi {
    async fn describe_stack(&self, stack_name: &str) -> Result<StackDescription> {
        self.record(Call::Describe(stack_name.to_string()));
        match self.next_describe() {
            DescribeReply::Found(description) => Ok(description),
            DescribeReply::Missing => Err(StackError::from_parts(
                "DescribeStacks",
                stack_name,
                Some("ValidationError"),
                format!("Stack with id {} does not exist", stack_name),
            )),
            DescribeReply::Fail { code, message } => Err(StackError::from_parts(
                "DescribeStacks",
                stack_name,
                Some(code.as_str()),
                message,
            )),
        }
    }

    async fn create_stack(&self, request: &StackRequest) -> Result<Option<String>> {
        self.record(Call::Create(request.clone()));
        self.mutation_result("CreateStack", &request.stack_name)
    }

    async fn update_stack(&self, request: &StackRequest) -> Result<Option<String>> {
        self.record(Call::Update(request.clone()));
        self.mutation_result("UpdateStack", &request.stack_name)
    }

    async fn delete_stack(&self, stack_name: &str) -> Result<()> {
        self.record(Call::Delete(stack_name.to_string()));
        Ok(())
    }
}

/// Default config pointing at `template_dir/dev-environment.yaml`, polling without delay
pub fn config_in(template_dir: &Path) -> DeployConfig {
    let mut config = DeployConfig::default();
    config.stack.template_path = template_dir.join("dev-environment.yaml");
    config.wait.poll_interval_secs = 0;
    config
}

/// Like `config_in`, and also writes the template
pub fn config_with_template(template_dir: &Path) -> DeployConfig {
    let config = config_in(template_dir);
    std::fs::write(&config.stack.template_path, TEMPLATE_BODY).expect("write template");
    config
}
