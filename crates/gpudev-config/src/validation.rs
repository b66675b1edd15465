// Configuration validation
//
// Validates that required fields are present and values are sensible

use crate::*;
use anyhow::{bail, Result};

/// CloudFormation's limit on stack name length
const MAX_STACK_NAME_LEN: usize = 128;

pub fn validate_config(config: &DeployConfig) -> Result<()> {
    validate_stack_config(&config.stack)?;
    validate_wait_config(&config.wait)?;
    validate_logging_config(&config.logging)?;
    Ok(())
}

fn validate_stack_config(config: &StackConfig) -> Result<()> {
    validate_stack_name(&config.name)?;

    if config.template_path.as_os_str().is_empty() {
        bail!("stack.template_path must not be empty");
    }

    if config.region.trim().is_empty() {
        bail!("stack.region must not be empty");
    }

    if let Some(endpoint) = &config.endpoint_url {
        if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
            bail!(
                "stack.endpoint_url must start with http:// or https://, got '{}'",
                endpoint
            );
        }
    }

    Ok(())
}

/// Stack names start with a letter and contain only letters, digits and hyphens.
fn validate_stack_name(name: &str) -> Result<()> {
    if name.is_empty() {
        bail!("stack.name must not be empty");
    }

    if name.len() > MAX_STACK_NAME_LEN {
        bail!(
            "stack.name must be at most {} characters",
            MAX_STACK_NAME_LEN
        );
    }

    if !name.starts_with(|c: char| c.is_ascii_alphabetic()) {
        bail!("stack.name '{}' must start with a letter", name);
    }

    if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
        bail!(
            "stack.name '{}' must contain only letters, numbers, and hyphens",
            name
        );
    }

    Ok(())
}

fn validate_wait_config(config: &WaitConfig) -> Result<()> {
    if config.poll_interval_secs == 0 {
        bail!("wait.poll_interval_secs must be greater than 0");
    }

    if config.timeout_secs == 0 {
        bail!("wait.timeout_secs must be greater than 0");
    }

    Ok(())
}

fn validate_logging_config(config: &LoggingConfig) -> Result<()> {
    if config.level.trim().is_empty() {
        bail!("logging.level must not be empty");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_stack_name() {
        assert!(validate_stack_name("gpu-dev-env").is_ok());
        assert!(validate_stack_name("Stack2").is_ok());

        assert!(validate_stack_name("").is_err());
        assert!(validate_stack_name("2fast").is_err());
        assert!(validate_stack_name("gpu_dev_env").is_err());
        assert!(validate_stack_name(&"a".repeat(129)).is_err());
    }

    #[test]
    fn test_validate_stack_config() {
        let valid = StackConfig::default();
        assert!(validate_stack_config(&valid).is_ok());

        let no_region = StackConfig {
            region: String::new(),
            ..StackConfig::default()
        };
        assert!(validate_stack_config(&no_region).is_err());

        let bad_endpoint = StackConfig {
            endpoint_url: Some("localhost:4566".to_string()),
            ..StackConfig::default()
        };
        assert!(validate_stack_config(&bad_endpoint).is_err());
    }

    #[test]
    fn test_validate_wait_config() {
        assert!(validate_wait_config(&WaitConfig::default()).is_ok());

        let zero_interval = WaitConfig {
            poll_interval_secs: 0,
            timeout_secs: 60,
        };
        assert!(validate_wait_config(&zero_interval).is_err());

        // Reported when waiting starts, not rejected here
        let long_interval = WaitConfig {
            poll_interval_secs: 120,
            timeout_secs: 60,
        };
        assert!(validate_wait_config(&long_interval).is_ok());
    }
}
