// Configuration source loading.
//
// Priority order:
// 1. Environment variables (GPUDEV_* prefix)
// 2. Config file path from GPUDEV_CONFIG
// 3. Inline config content from GPUDEV_CONFIG_CONTENT
// 4. Default config files (./gpudev.toml, ./.gpudev.toml)
// 5. Built-in defaults

use crate::env_overrides::{apply_env_overrides, EnvSource, ENV_PREFIX};
use crate::DeployConfig;
use anyhow::{Context, Result};
use std::env;
use std::path::Path;

const DEFAULT_CONFIG_FILES: [&str; 2] = ["./gpudev.toml", "./.gpudev.toml"];

/// Load configuration from the environment and the first config file found.
pub fn load_config() -> Result<DeployConfig> {
    let mut config = load_from_file()?.unwrap_or_default();
    apply_env_overrides(&mut config, &StdEnvSource)?;
    config.validate()?;
    Ok(config)
}

/// Load configuration from a specific file path (for CLI --config flag).
/// Returns error if file doesn't exist or can't be parsed.
pub fn load_from_file_path(path: impl AsRef<Path>) -> Result<DeployConfig> {
    let mut config = read_file(path.as_ref())?;
    apply_env_overrides(&mut config, &StdEnvSource)?;
    config.validate()?;
    Ok(config)
}

fn load_from_file() -> Result<Option<DeployConfig>> {
    if let Ok(path) = env::var(format!("{}CONFIG", ENV_PREFIX)) {
        return read_file(Path::new(&path)).map(Some);
    }

    if let Ok(content) = env::var(format!("{}CONFIG_CONTENT", ENV_PREFIX)) {
        let config = DeployConfig::from_toml(&content)
            .context("Failed to parse inline config from GPUDEV_CONFIG_CONTENT")?;
        return Ok(Some(config));
    }

    for path in DEFAULT_CONFIG_FILES {
        let path = Path::new(path);
        if path.exists() {
            return read_file(path).map(Some);
        }
    }

    Ok(None)
}

fn read_file(path: &Path) -> Result<DeployConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    let config = DeployConfig::from_toml(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
    tracing::debug!(path = %path.display(), "loaded config file");
    Ok(config)
}

struct StdEnvSource;

impl EnvSource for StdEnvSource {
    fn get(&self, key: &str) -> Option<String> {
        env::var(format!("{}{}", ENV_PREFIX, key)).ok()
    }
}
