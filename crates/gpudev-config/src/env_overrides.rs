use crate::{DeployConfig, LogFormat};
use anyhow::{anyhow, Context, Result};
use std::path::PathBuf;

pub const ENV_PREFIX: &str = "GPUDEV_";

/// Abstraction over environment-variable lookups so tests can supply their
/// own source of overrides.
pub trait EnvSource {
    /// Look up `key` with the `GPUDEV_` prefix applied
    fn get(&self, key: &str) -> Option<String>;
}

/// Apply environment-variable overrides (highest priority) to the config.
pub fn apply_env_overrides<E: EnvSource>(config: &mut DeployConfig, env: &E) -> Result<()> {
    // Stack selection
    if let Some(name) = get_env_string(env, "STACK_NAME") {
        config.stack.name = name;
    }
    if let Some(path) = get_env_string(env, "TEMPLATE_PATH") {
        config.stack.template_path = PathBuf::from(path);
    }
    if let Some(region) = get_env_string(env, "REGION") {
        config.stack.region = region;
    }
    if let Some(profile) = get_env_string(env, "PROFILE") {
        config.stack.profile = Some(profile);
    }
    if let Some(endpoint) = get_env_string(env, "ENDPOINT_URL") {
        config.stack.endpoint_url = Some(endpoint);
    }

    // Polling
    if let Some(val) = get_env_u64(env, "WAIT_POLL_INTERVAL_SECS")? {
        config.wait.poll_interval_secs = val;
    }
    if let Some(val) = get_env_u64(env, "WAIT_TIMEOUT_SECS")? {
        config.wait.timeout_secs = val;
    }

    // Logging
    if let Some(level) = get_env_string(env, "LOG_LEVEL") {
        config.logging.level = level;
    }
    if let Some(format) = get_env_string(env, "LOG_FORMAT") {
        config.logging.format = format
            .parse::<LogFormat>()
            .with_context(|| format!("Invalid {}LOG_FORMAT value", ENV_PREFIX))?;
    }

    Ok(())
}

fn get_env_string<E: EnvSource>(env: &E, key: &str) -> Option<String> {
    env.get(key).filter(|value| !value.trim().is_empty())
}

fn get_env_u64<E: EnvSource>(env: &E, key: &str) -> Result<Option<u64>> {
    match get_env_string(env, key) {
        Some(value) => value
            .trim()
            .parse::<u64>()
            .map(Some)
            .map_err(|e| anyhow!("Invalid {}{} value '{}': {}", ENV_PREFIX, key, value, e)),
        None => Ok(None),
    }
}
