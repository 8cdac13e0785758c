use std::path::PathBuf;
use std::time::Duration;

use alloy_core::primitives::Address;
use alloy_core::primitives::utils::format_ether;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::artifact::ContractArtifact;
use crate::chain::{ChainClient, ChainError, PendingDeployment};
use crate::error::DeployError;
use crate::network::Network;
use crate::record::DeploymentRecord;
use crate::rpc::RpcClient;

/// The default name for the slipway configuration file.
pub const SLIPCONF_FILENAME: &str = "Slipway.toml";

/// Main deployer that drives a contract deployment from end to end.
///
/// This struct contains all the configuration needed to deploy a contract
/// and can be serialized to/from TOML format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deployer {
    /// The network to deploy to.
    pub network: Network,
    /// RPC endpoint override. Defaults to the network's well-known endpoint.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    /// Path to the compiled contract artifact.
    pub artifact: PathBuf,
    /// Path the deployment record is written to.
    pub record: PathBuf,
    /// Account to deploy from. Defaults to the endpoint's first unlocked
    /// account.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deployer_account: Option<Address>,
    /// Seconds to wait for the deployment transaction to be confirmed.
    pub confirmation_timeout_secs: u64,
}

impl Deployer {
    /// Save the configuration to a TOML file.
    pub fn save_to_file(&self, path: &PathBuf) -> Result<()> {
        let content =
            toml::to_string_pretty(self).context("Failed to serialize deployer config to TOML")?;
        std::fs::write(path, content)
            .context(format!("Failed to write config to {}", path.display()))?;
        tracing::info!(path = %path.display(), "Configuration saved");
        Ok(())
    }

    /// Load the configuration from a TOML file.
    pub fn load_from_file(path: &PathBuf) -> Result<Self> {
        if !path.exists() {
            return Err(anyhow::anyhow!(
                "Configuration file or directory not found: {}",
                path.display()
            ));
        }

        let config_path = if path.is_dir() {
            path.join(SLIPCONF_FILENAME)
        } else {
            path.to_path_buf()
        };

        let content = std::fs::read_to_string(config_path)
            .context(format!("Failed to read config from {}", path.display()))?;
        let config: Self =
            toml::from_str(&content).context("Failed to parse config file as TOML")?;
        tracing::info!(path = %path.display(), "Configuration loaded");
        Ok(config)
    }

    /// Save the configuration to the default location (Slipway.toml in the
    /// current directory).
    pub fn save_config(&self) -> Result<PathBuf> {
        let config_path = PathBuf::from(SLIPCONF_FILENAME);
        self.save_to_file(&config_path)?;
        Ok(config_path)
    }

    /// The RPC endpoint this deployer talks to.
    pub fn endpoint(&self) -> String {
        self.endpoint
            .clone()
            .unwrap_or_else(|| self.network.default_endpoint().to_string())
    }

    /// Build an HTTP chain client for the configured endpoint.
    pub fn connect(&self) -> Result<RpcClient, DeployError> {
        let client = RpcClient::new(self.endpoint())
            .map_err(|e| self.connection_error(e))?
            .confirmation_window(Duration::from_secs(self.confirmation_timeout_secs));
        Ok(client)
    }
}

impl Deployer {
    /// Run the full deployment pipeline against `chain`.
    ///
    /// Stages run strictly in order: verify the network, resolve the deploying
    /// account, check funding, submit the transaction, await its confirmation,
    /// verify the deployed code, persist the record. The first failing stage
    /// aborts the run and no stage is ever retried, so a failure report always
    /// points at exactly one stage.
    ///
    /// Nothing locks the record file. Concurrent runs writing the same record
    /// path race on the final write and must be serialized by the caller.
    pub async fn deploy<C: ChainClient>(
        &self,
        chain: &C,
        artifact: &ContractArtifact,
    ) -> Result<DeploymentRecord, DeployError> {
        tracing::info!(
            contract = %artifact.contract_name,
            network = %self.network,
            endpoint = %self.endpoint(),
            "Starting deployment..."
        );

        self.verify_network(chain).await?;
        let deployer_account = self.resolve_deployer_account(chain).await?;
        self.check_funding(chain, deployer_account).await?;

        let pending = self.submit(chain, deployer_account, artifact).await?;
        let address = self.await_confirmation(chain, pending).await?;
        self.verify_code(chain, address).await?;

        let record = DeploymentRecord::new(address, self.network, deployer_account);
        self.persist(&record)?;

        tracing::info!("✓ Deployment complete!");
        tracing::info!("");
        tracing::info!("=== Deployment Summary ===");
        tracing::info!("Contract:   {}", artifact.contract_name);
        tracing::info!("Address:    {}", record.address);
        tracing::info!("Network:    {} (chain ID {})", record.network, record.chain_id);
        tracing::info!("Deployer:   {}", record.deployer);
        tracing::info!("Timestamp:  {}", record.timestamp);
        tracing::info!("Record:     {}", self.record.display());
        tracing::info!("");
        tracing::info!(
            "Restart anything that reads {} to pick up the new address.",
            self.record.display()
        );

        Ok(record)
    }

    /// Wrap a chain-level failure with which endpoint we were talking to and
    /// what the operator can do about it.
    fn connection_error(&self, err: ChainError) -> DeployError {
        DeployError::Connection {
            network: self.network.label().to_string(),
            endpoint: self.endpoint(),
            message: err.to_string(),
        }
    }

    async fn verify_network<C: ChainClient>(&self, chain: &C) -> Result<(), DeployError> {
        let actual = chain
            .chain_id()
            .await
            .map_err(|e| self.connection_error(e))?;

        let expected = self.network.chain_id();
        if actual != expected {
            return Err(DeployError::NetworkMismatch { expected, actual });
        }

        tracing::info!(network = %self.network.label(), chain_id = actual, "Network verified");
        Ok(())
    }

    async fn resolve_deployer_account<C: ChainClient>(
        &self,
        chain: &C,
    ) -> Result<Address, DeployError> {
        let account = match self.deployer_account {
            Some(account) => account,
            None => chain
                .default_account()
                .await
                .map_err(|e| self.connection_error(e))?,
        };

        tracing::info!(address = %account, "Deploying with account");
        Ok(account)
    }

    async fn check_funding<C: ChainClient>(
        &self,
        chain: &C,
        account: Address,
    ) -> Result<(), DeployError> {
        let balance = chain
            .balance_of(account)
            .await
            .map_err(|e| self.connection_error(e))?;

        tracing::info!(balance_eth = %format_ether(balance), "Deployer account balance");

        if balance.is_zero() {
            return Err(DeployError::InsufficientFunds { address: account });
        }

        Ok(())
    }

    async fn submit<C: ChainClient>(
        &self,
        chain: &C,
        from: Address,
        artifact: &ContractArtifact,
    ) -> Result<PendingDeployment, DeployError> {
        tracing::info!("Submitting deployment transaction...");

        let pending = chain
            .submit_deployment(from, &artifact.bytecode)
            .await
            .map_err(|e| DeployError::Submission {
                message: e.to_string(),
            })?;

        tracing::info!(tx_hash = %pending.tx_hash, "Deployment transaction sent");
        Ok(pending)
    }

    async fn await_confirmation<C: ChainClient>(
        &self,
        chain: &C,
        pending: PendingDeployment,
    ) -> Result<Address, DeployError> {
        let tx_hash = pending.tx_hash;

        let address = chain.wait_for_inclusion(pending).await.map_err(|e| match e {
            ChainError::Timeout(elapsed_secs) => DeployError::ConfirmationTimeout {
                tx_hash,
                elapsed_secs,
            },
            other => DeployError::Submission {
                message: other.to_string(),
            },
        })?;

        tracing::info!(address = %address, "Deployment confirmed");
        Ok(address)
    }

    async fn verify_code<C: ChainClient>(
        &self,
        chain: &C,
        address: Address,
    ) -> Result<(), DeployError> {
        let code = chain
            .code_at(address)
            .await
            .map_err(|e| self.connection_error(e))?;

        if code.is_empty() {
            return Err(DeployError::EmptyCode { address });
        }

        tracing::info!(code_size = code.len(), "Contract code verified");
        Ok(())
    }

    fn persist(&self, record: &DeploymentRecord) -> Result<(), DeployError> {
        record
            .save_to_file(&self.record)
            .map_err(|source| DeployError::RecordPersist {
                address: record.address.clone(),
                path: self.record.clone(),
                source,
            })?;

        tracing::info!(path = %self.record.display(), "Deployment record saved");
        Ok(())
    }
}
