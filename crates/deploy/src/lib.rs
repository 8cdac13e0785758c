//! slipway-deploy - Contract deployment library.
//!
//! This crate drives a compiled contract from artifact to recorded on-chain
//! address: verify the target network, check the deployer's funding, submit
//! the creation transaction, await its confirmation, verify the deployed
//! code, and persist a record for downstream consumers.

mod deployer;
pub use deployer::{Deployer, SLIPCONF_FILENAME};

mod artifact;
mod chain;
mod error;
mod network;
mod record;
mod rpc;

pub use artifact::ContractArtifact;
pub use chain::{ChainClient, ChainError, PendingDeployment};
pub use error::DeployError;
pub use network::Network;
pub use record::DeploymentRecord;
pub use rpc::RpcClient;
