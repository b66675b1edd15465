//! CloudFormation-backed implementation of [`StackApi`]

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_cloudformation::types::{Capability as SdkCapability, Parameter};
use aws_sdk_cloudformation::Client as CfnClient;
use gpudev_config::StackConfig;
use tracing::{debug, info};

use crate::error::{Result, StackError};
use crate::params::StackRequest;
use crate::status::StackDescription;
use crate::StackApi;

/// Thin wrapper over the CloudFormation SDK client
#[derive(Clone)]
pub struct CloudFormationClient {
    client: CfnClient,
}

impl CloudFormationClient {
    /// Build a client for the configured region, profile and endpoint.
    ///
    /// Credentials come from the SDK's default provider chain and are resolved
    /// lazily on the first request.
    pub async fn from_config(config: &StackConfig) -> Self {
        let mut loader = aws_config::defaults(BehaviorVersion::latest())
            .region(aws_config::Region::new(config.region.clone()));

        if let Some(profile) = &config.profile {
            loader = loader.profile_name(profile);
        }
        if let Some(endpoint) = &config.endpoint_url {
            debug!(endpoint = %endpoint, "using custom CloudFormation endpoint");
            loader = loader.endpoint_url(endpoint);
        }

        let sdk_config = loader.load().await;
        Self::new(CfnClient::new(&sdk_config))
    }

    pub fn new(client: CfnClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl StackApi for CloudFormationClient {
    async fn describe_stack(&self, stack_name: &str) -> Result<StackDescription> {
        let output = self
            .client
            .describe_stacks()
            .stack_name(stack_name)
            .send()
            .await
            .map_err(|e| StackError::from_sdk("DescribeStacks", stack_name, e))?;

        let Some(stack) = output.stacks().first() else {
            return Err(StackError::NotFound {
                stack_name: stack_name.to_string(),
            });
        };

        let status = stack
            .stack_status()
            .map(|s| s.as_str().to_string())
            .unwrap_or_default();

        let mut outputs = std::collections::BTreeMap::new();
        for output in stack.outputs() {
            if let (Some(key), Some(value)) = (output.output_key(), output.output_value()) {
                outputs.insert(key.to_string(), value.to_string());
            }
        }

        Ok(StackDescription { status, outputs })
    }

    async fn create_stack(&self, request: &StackRequest) -> Result<Option<String>> {
        let output = self
            .client
            .create_stack()
            .stack_name(&request.stack_name)
            .template_body(&request.template_body)
            .set_parameters(Some(sdk_parameters(request)))
            .set_capabilities(Some(sdk_capabilities(request)))
            .send()
            .await
            .map_err(|e| StackError::from_sdk("CreateStack", &request.stack_name, e))?;

        let stack_id = output.stack_id().map(str::to_string);
        info!(stack_name = %request.stack_name, stack_id = ?stack_id, "stack creation initiated");
        Ok(stack_id)
    }

    async fn update_stack(&self, request: &StackRequest) -> Result<Option<String>> {
        let output = self
            .client
            .update_stack()
            .stack_name(&request.stack_name)
            .template_body(&request.template_body)
            .set_parameters(Some(sdk_parameters(request)))
            .set_capabilities(Some(sdk_capabilities(request)))
            .send()
            .await
            .map_err(|e| StackError::from_sdk("UpdateStack", &request.stack_name, e))?;

        let stack_id = output.stack_id().map(str::to_string);
        info!(stack_name = %request.stack_name, stack_id = ?stack_id, "stack update initiated");
        Ok(stack_id)
    }

    async fn delete_stack(&self, stack_name: &str) -> Result<()> {
        self.client
            .delete_stack()
            .stack_name(stack_name)
            .send()
            .await
            .map_err(|e| StackError::from_sdk("DeleteStack", stack_name, e))?;

        info!(stack_name, "stack deletion initiated");
        Ok(())
    }
}

fn sdk_parameters(request: &StackRequest) -> Vec<Parameter> {
    request
        .parameters
        .iter()
        .map(|p| {
            Parameter::builder()
                .parameter_key(&p.key)
                .parameter_value(&p.value)
                .build()
        })
        .collect()
}

fn sdk_capabilities(request: &StackRequest) -> Vec<SdkCapability> {
    request
        .capabilities
        .iter()
        .map(|c| SdkCapability::from(c.as_str()))
        .collect()
}
