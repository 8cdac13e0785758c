//! Deployment records persisted for downstream consumers.

use std::io;
use std::path::{Path, PathBuf};

use alloy_core::primitives::Address;
use anyhow::{Context, Result};
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::network::Network;

/// The record written after a successful deployment.
///
/// Consumers (a frontend, other services) read this file to discover the
/// live contract address, so the field names and their order are a
/// compatibility contract. Addresses are checksummed strings; the timestamp
/// is RFC 3339 with millisecond precision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentRecord {
    /// Address of the deployed contract.
    pub address: String,
    /// Human-readable network name.
    pub network: String,
    /// Chain ID the contract was deployed to.
    pub chain_id: u64,
    /// Account the deployment was sent from.
    pub deployer: String,
    /// When the deployment completed.
    pub timestamp: String,
}

impl DeploymentRecord {
    /// Build a record for a deployment that just completed.
    pub fn new(address: Address, network: Network, deployer: Address) -> Self {
        Self {
            address: address.to_string(),
            network: network.label().to_string(),
            chain_id: network.chain_id(),
            deployer: deployer.to_string(),
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }

    /// Write the record to `path`, fully replacing any prior content.
    ///
    /// The record is written to a temporary sibling first and renamed into
    /// place, so a crash mid-write can never leave a truncated record behind.
    pub fn save_to_file(&self, path: &Path) -> io::Result<()> {
        let json = serde_json::to_string_pretty(self)?;

        let mut tmp_name = path.as_os_str().to_owned();
        tmp_name.push(".tmp");
        let tmp_path = PathBuf::from(tmp_name);

        std::fs::write(&tmp_path, json)?;
        std::fs::rename(&tmp_path, path)?;

        Ok(())
    }

    /// Load a record from a file.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            anyhow::bail!("Deployment record not found: {}", path.display());
        }

        let content = std::fs::read_to_string(path).context(format!(
            "Failed to read deployment record from {}",
            path.display()
        ))?;
        let record: Self =
            serde_json::from_str(&content).context("Failed to parse deployment record JSON")?;

        Ok(record)
    }
}
