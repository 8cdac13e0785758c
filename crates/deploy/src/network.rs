//! Target networks the deployer knows how to reach.

use serde::{Deserialize, Serialize};

/// The set of supported target networks.
///
/// Each variant fixes the chain ID the endpoint must report; only the
/// endpoint URL itself may be overridden per run.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum Network {
    /// Local Hardhat development node.
    Hardhat,
    /// Local Ganache development node.
    Ganache,
    /// Sepolia public test network.
    Sepolia,
}

impl Network {
    /// The chain ID the connected endpoint must report for this network.
    pub fn chain_id(&self) -> u64 {
        match self {
            Network::Hardhat => 31337,
            Network::Ganache => 1337,
            Network::Sepolia => 11155111,
        }
    }

    /// The well-known RPC endpoint for this network.
    pub fn default_endpoint(&self) -> &'static str {
        match self {
            Network::Hardhat => "http://127.0.0.1:8545",
            Network::Ganache => "http://127.0.0.1:7545",
            Network::Sepolia => "https://ethereum-sepolia-rpc.publicnode.com",
        }
    }

    /// Human-readable name, as written into the deployment record.
    pub fn label(&self) -> &'static str {
        match self {
            Network::Hardhat => "Hardhat",
            Network::Ganache => "Ganache",
            Network::Sepolia => "Sepolia",
        }
    }
}
