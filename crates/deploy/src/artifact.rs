//! Compiled contract artifacts.

use std::path::Path;

use alloy_core::primitives::Bytes;
use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::Value;

/// A compiled contract artifact, in the JSON shape standard Solidity
/// toolchains emit.
///
/// Only the fields the deployer needs are modeled; the ABI rides along
/// untouched for consumers that read the artifact next to the record.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractArtifact {
    /// Name of the compiled contract.
    pub contract_name: String,
    /// Contract ABI. Opaque to the deployer.
    #[serde(default)]
    pub abi: Value,
    /// Creation bytecode as 0x-prefixed hex.
    pub bytecode: Bytes,
}

impl ContractArtifact {
    /// Load an artifact from a JSON file.
    ///
    /// Fails on a missing file, malformed JSON, or empty bytecode. An
    /// artifact without creation bytecode cannot deploy anything, so it is
    /// rejected here rather than after a transaction has been paid for.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            anyhow::bail!("Artifact file not found: {}", path.display());
        }

        let content = std::fs::read_to_string(path)
            .context(format!("Failed to read artifact from {}", path.display()))?;
        let artifact: Self =
            serde_json::from_str(&content).context("Failed to parse artifact JSON")?;

        if artifact.bytecode.is_empty() {
            anyhow::bail!(
                "Artifact {} has no creation bytecode; compile the contract first",
                artifact.contract_name
            );
        }

        Ok(artifact)
    }
}
