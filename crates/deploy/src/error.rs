//! Pipeline error taxonomy.
//!
//! One variant per stage failure; no stage reinterprets another stage's
//! error. Every message carries enough context for an operator to diagnose
//! the failure without reading the source.

use std::io;
use std::path::PathBuf;

use alloy_core::primitives::{Address, B256};
use thiserror::Error;

/// Errors produced by the deployment pipeline.
#[derive(Debug, Error)]
pub enum DeployError {
    /// The endpoint could not be reached or a chain query failed.
    #[error(
        "Failed to reach the {network} node at {endpoint}: {message}. \
         Make sure the node is running and the endpoint is correct"
    )]
    Connection {
        network: String,
        endpoint: String,
        message: String,
    },

    /// The endpoint serves a different chain than the one configured.
    #[error("Network mismatch: expected chain ID {expected} but the endpoint reported {actual}")]
    NetworkMismatch { expected: u64, actual: u64 },

    /// The deploying account holds a zero balance.
    #[error("Deployer account {address} has a zero balance; fund it before deploying")]
    InsufficientFunds { address: Address },

    /// The node rejected the deployment transaction, or the wait mechanism
    /// failed after submission. Carries the underlying message verbatim.
    #[error("Deployment submission failed: {message}")]
    Submission { message: String },

    /// The transaction was not included within the confirmation window.
    #[error("Gave up waiting for transaction {tx_hash} to be included after {elapsed_secs}s")]
    ConfirmationTimeout { tx_hash: B256, elapsed_secs: u64 },

    /// The transaction confirmed but no bytecode exists at the resulting
    /// address.
    #[error("No contract code at {address}; the transaction confirmed but no bytecode was installed")]
    EmptyCode { address: Address },

    /// The deployment record could not be written. The contract named by
    /// `address` is already live on chain when this is returned.
    #[error(
        "Contract {address} is deployed, but writing its record to {} failed: {source}",
        path.display()
    )]
    RecordPersist {
        address: String,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}
