//! slipway is a CLI tool that deploys a compiled contract to an Ethereum
//! network and records where it landed.

mod cli;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use cli::Cli;
use slipway_deploy::{ContractArtifact, DeployError, Deployer};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize the logger. Diagnostics go to stderr so piped output stays
    // clean.
    tracing_subscriber::fmt()
        .with_max_level(cli.verbosity)
        .with_writer(std::io::stderr)
        .init();

    // If a config file is provided, load it and deploy
    let deployer = if let Some(config_path) = &cli.config {
        let config_path = PathBuf::from(config_path);
        let deployer = Deployer::load_from_file(&config_path)?;

        tracing::info!(
            config_path = %config_path.display(),
            network = %deployer.network,
            "Loading deployment from config file..."
        );

        deployer
    } else {
        // Otherwise, create a new deployment from CLI arguments
        let artifact = cli
            .artifact
            .context("--artifact is required when no config file is provided")?;

        let deployer = Deployer {
            network: cli.network,
            endpoint: cli.endpoint,
            artifact: PathBuf::from(artifact),
            record: PathBuf::from(cli.record),
            deployer_account: cli.deployer,
            confirmation_timeout_secs: cli.confirmation_timeout,
        };

        // Save the configuration to Slipway.toml before deploying
        deployer.save_config()?;
        deployer
    };

    let artifact = ContractArtifact::load_from_file(&deployer.artifact)?;
    let chain = deployer.connect()?;

    if let Err(err) = deployer.deploy(&chain, &artifact).await {
        if let DeployError::RecordPersist { address, .. } = &err {
            tracing::warn!(
                address = %address,
                "Contract is live on chain but the record was not saved; note the address before re-running"
            );
        }
        return Err(err.into());
    }

    Ok(())
}
