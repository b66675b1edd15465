//! Stack parameters and request assembly

use std::net::IpAddr;

/// Capabilities acknowledged on every create and update
pub const IAM_CAPABILITIES: [Capability; 2] = [Capability::Iam, Capability::NamedIam];

/// IAM capability grants accepted by CloudFormation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    Iam,
    NamedIam,
}

impl Capability {
    pub fn as_str(&self) -> &'static str {
        match self {
            Capability::Iam => "CAPABILITY_IAM",
            Capability::NamedIam => "CAPABILITY_NAMED_IAM",
        }
    }
}

impl std::fmt::Display for Capability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The template parameters the dev environment stack takes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackParameters {
    pub my_ip: String,
    pub key_name: String,
    pub instance_type: String,
    pub volume_size: u32,
}

impl StackParameters {
    /// Key/value pairs in the order they are submitted.
    pub fn to_pairs(&self) -> Vec<StackParameter> {
        vec![
            StackParameter::new("MyIpAddress", &self.my_ip),
            StackParameter::new("KeyName", &self.key_name),
            StackParameter::new("InstanceType", &self.instance_type),
            StackParameter::new("VolumeSize", self.volume_size.to_string()),
        ]
    }
}

/// A single `ParameterKey` / `ParameterValue` pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackParameter {
    pub key: String,
    pub value: String,
}

impl StackParameter {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Everything a create or update call submits
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackRequest {
    pub stack_name: String,
    pub template_body: String,
    pub parameters: Vec<StackParameter>,
    pub capabilities: Vec<Capability>,
}

impl StackRequest {
    pub fn new(stack_name: &str, template_body: String, parameters: &StackParameters) -> Self {
        Self {
            stack_name: stack_name.to_string(),
            template_body,
            parameters: parameters.to_pairs(),
            capabilities: IAM_CAPABILITIES.to_vec(),
        }
    }
}

/// Validate a CIDR block such as `1.2.3.4/32` or `2001:db8::/48`.
///
/// Shaped for use as a clap `value_parser`.
pub fn parse_cidr(input: &str) -> Result<String, String> {
    let (addr, prefix) = input
        .split_once('/')
        .ok_or_else(|| format!("'{}' is not in CIDR notation (expected e.g. 1.2.3.4/32)", input))?;

    let addr: IpAddr = addr
        .parse()
        .map_err(|_| format!("'{}' is not a valid IP address", addr))?;
    let prefix: u8 = prefix
        .parse()
        .map_err(|_| format!("'{}' is not a valid prefix length", prefix))?;

    let max = if addr.is_ipv4() { 32 } else { 128 };
    if prefix > max {
        return Err(format!(
            "prefix length /{} exceeds {} for {}",
            prefix, max, addr
        ));
    }

    Ok(input.to_string())
}
