// gpudev-config - Configuration for the GPU dev environment CLI
//
// Supports configuration from multiple sources:
// 1. Environment variables (highest priority, GPUDEV_* prefix)
// 2. Config file path from --config or GPUDEV_CONFIG
// 3. Config file contents from GPUDEV_CONFIG_CONTENT
// 4. Default config file locations (./gpudev.toml, ./.gpudev.toml)
// 5. Built-in defaults (lowest priority)
//
// CLI flags are applied on top by the binary.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

mod env_overrides;
mod sources;
mod validation;

pub use env_overrides::{apply_env_overrides, EnvSource, ENV_PREFIX};

pub const DEFAULT_STACK_NAME: &str = "gpu-dev-env";
pub const DEFAULT_TEMPLATE_PATH: &str = "cloudformation/dev-environment.yaml";
pub const DEFAULT_REGION: &str = "us-east-1";

/// Main CLI configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeployConfig {
    #[serde(default)]
    pub stack: StackConfig,

    #[serde(default)]
    pub wait: WaitConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Which stack to manage and where
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StackConfig {
    pub name: String,
    pub template_path: PathBuf,
    pub region: String,

    /// Named profile from the shared AWS config files
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile: Option<String>,

    /// Override the CloudFormation endpoint (e.g. LocalStack)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint_url: Option<String>,
}

impl Default for StackConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_STACK_NAME.to_string(),
            template_path: PathBuf::from(DEFAULT_TEMPLATE_PATH),
            region: DEFAULT_REGION.to_string(),
            profile: None,
            endpoint_url: None,
        }
    }
}

/// Polling behaviour for `--wait`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WaitConfig {
    pub poll_interval_secs: u64,
    pub timeout_secs: u64,
}

impl WaitConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for WaitConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: 10,
            timeout_secs: 60 * 60,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            format: LogFormat::Text,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl std::fmt::Display for LogFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogFormat::Text => write!(f, "text"),
            LogFormat::Json => write!(f, "json"),
        }
    }
}

impl std::str::FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "text" | "pretty" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            _ => anyhow::bail!("Unsupported log format: {}. Supported: text, json", s),
        }
    }
}

impl DeployConfig {
    /// Load configuration from all sources with priority
    pub fn load() -> Result<Self> {
        sources::load_config()
    }

    /// Load configuration starting from an explicit file (CLI --config flag)
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self> {
        sources::load_from_file_path(path)
    }

    /// Parse a TOML document; missing sections fall back to defaults
    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        validation::validate_config(self)
    }
}
