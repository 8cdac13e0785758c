//! Chain client interface the deployment pipeline runs against.

use alloy_core::primitives::{Address, B256, Bytes, U256};
use async_trait::async_trait;
use thiserror::Error;

/// Errors surfaced by a [`ChainClient`] implementation.
#[derive(Debug, Error)]
pub enum ChainError {
    /// The endpoint could not be reached, rejected a request, or returned a
    /// malformed response. Carries the underlying message verbatim.
    #[error("{0}")]
    Transport(String),
    /// A wait operation exceeded the client's configured window.
    #[error("no confirmation after {0} seconds")]
    Timeout(u64),
}

/// Handle to a submitted contract-creation transaction.
///
/// Created by [`ChainClient::submit_deployment`] and consumed by value in
/// [`ChainClient::wait_for_inclusion`], so a handle cannot be waited on twice.
#[derive(Debug)]
pub struct PendingDeployment {
    /// Hash of the submitted transaction.
    pub tx_hash: B256,
}

/// Interface to the chain a contract is deployed to.
///
/// Implementations own the wire protocol; the pipeline only ever sees these
/// operations. See [`crate::RpcClient`] for the JSON-RPC implementation.
#[async_trait]
pub trait ChainClient: Send + Sync {
    /// Query the chain identifier reported by the connected endpoint.
    async fn chain_id(&self) -> Result<u64, ChainError>;

    /// Query the balance of `address` in the smallest currency unit.
    async fn balance_of(&self, address: Address) -> Result<U256, ChainError>;

    /// The endpoint's default unlocked account, used when no deploying
    /// account is configured.
    async fn default_account(&self) -> Result<Address, ChainError>;

    /// Submit a contract-creation transaction carrying `bytecode`, sent from
    /// `from`. Exactly one attempt; implementations must not retry.
    async fn submit_deployment(
        &self,
        from: Address,
        bytecode: &Bytes,
    ) -> Result<PendingDeployment, ChainError>;

    /// Suspend until `pending` is included and return the address of the
    /// created contract.
    async fn wait_for_inclusion(&self, pending: PendingDeployment) -> Result<Address, ChainError>;

    /// Fetch the bytecode currently stored at `address`.
    async fn code_at(&self, address: Address) -> Result<Bytes, ChainError>;
}
