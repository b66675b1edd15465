use anyhow::{Context, Result};
use clap::Parser;
use gpudev::deploy::{self, DeployArgs, DeployError};
use gpudev_config::DeployConfig;
use gpudev_stack::CloudFormationClient;
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

/// Deploy, update, delete or inspect the GPU dev environment stack
#[derive(Parser)]
#[command(name = "gpudev")]
#[command(version)]
#[command(about = "Deploy/Update/Delete GPU Dev Environment", long_about = None)]
struct Cli {
    #[command(flatten)]
    deploy: DeployArgs,

    /// Path to configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Log level: trace, debug, info, warn, error
    #[arg(short = 'v', long, value_name = "LEVEL")]
    log_level: Option<String>,
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => DeployConfig::load_from_path(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => DeployConfig::load().context("Failed to load configuration")?,
    };

    // CLI overrides (highest priority)
    if let Some(level) = &cli.log_level {
        config.logging.level = level.clone();
    }

    gpudev::init_tracing(&config.logging);

    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to build tokio runtime")?
        .block_on(async_main(cli.deploy, config))
}

async fn async_main(args: DeployArgs, config: DeployConfig) -> Result<ExitCode> {
    let client = CloudFormationClient::from_config(&config.stack).await;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match deploy::run(&client, &config, &args, &mut out).await {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(e @ DeployError::TemplateNotFound { .. }) => {
            writeln!(out, "Error: {}", e)?;
            Ok(ExitCode::from(1))
        }
        Err(e) => Err(e.into()),
    }
}
