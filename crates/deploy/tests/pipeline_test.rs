//! Integration tests for slipway-deploy.
//!
//! These tests drive the full deployment pipeline against a scripted chain
//! client and real files on disk; no node or network access is required.
//! Run with: cargo test --test pipeline_test

use std::path::PathBuf;
use std::sync::Mutex;

use alloy_core::primitives::{Address, B256, Bytes, U256};
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde_json::Value;
use slipway_deploy::{
    ChainClient, ChainError, ContractArtifact, DeployError, Deployer, DeploymentRecord, Network,
    PendingDeployment,
};
use tempdir::TempDir;

/// A chain client scripted per operation, recording what the pipeline sent.
struct ScriptedChain {
    chain_id: u64,
    balance: U256,
    accounts: Vec<Address>,
    contract_address: Address,
    code: Bytes,
    submissions: Mutex<Vec<Bytes>>,
}

#[async_trait]
impl ChainClient for ScriptedChain {
    async fn chain_id(&self) -> std::result::Result<u64, ChainError> {
        Ok(self.chain_id)
    }

    async fn balance_of(&self, _address: Address) -> std::result::Result<U256, ChainError> {
        Ok(self.balance)
    }

    async fn default_account(&self) -> std::result::Result<Address, ChainError> {
        self.accounts
            .first()
            .copied()
            .ok_or_else(|| ChainError::Transport("no unlocked accounts".to_string()))
    }

    async fn submit_deployment(
        &self,
        _from: Address,
        bytecode: &Bytes,
    ) -> std::result::Result<PendingDeployment, ChainError> {
        self.submissions.lock().unwrap().push(bytecode.clone());
        Ok(PendingDeployment {
            tx_hash: B256::repeat_byte(0xab),
        })
    }

    async fn wait_for_inclusion(
        &self,
        _pending: PendingDeployment,
    ) -> std::result::Result<Address, ChainError> {
        Ok(self.contract_address)
    }

    async fn code_at(&self, _address: Address) -> std::result::Result<Bytes, ChainError> {
        Ok(self.code.clone())
    }
}

/// Test setup context owning the on-disk fixtures.
struct TestContext {
    dir: TempDir,
}

impl TestContext {
    fn new() -> Result<Self> {
        let dir = TempDir::new("slipway-it").context("Failed to create temp dir")?;

        let artifact = serde_json::json!({
            "contractName": "Greeter",
            "abi": [
                {"type": "constructor", "inputs": []},
                {"type": "function", "name": "greet", "inputs": [], "outputs": [{"type": "string"}]}
            ],
            "bytecode": "0x6080604052348015600e575f5ffd5b50607980601a5f395ff3fe"
        });
        std::fs::write(
            dir.path().join("Greeter.json"),
            serde_json::to_string_pretty(&artifact)?,
        )
        .context("Failed to write artifact fixture")?;

        Ok(Self { dir })
    }

    fn artifact_path(&self) -> PathBuf {
        self.dir.path().join("Greeter.json")
    }

    fn record_path(&self) -> PathBuf {
        self.dir.path().join("deployed-contract.json")
    }

    fn build_deployer(&self) -> Deployer {
        Deployer {
            network: Network::Ganache,
            endpoint: None,
            artifact: self.artifact_path(),
            record: self.record_path(),
            deployer_account: None,
            confirmation_timeout_secs: 120,
        }
    }
}

fn deploy_account() -> Address {
    "0x70997970C51812dc3A010C7d01b50e0d17dc79C8"
        .parse()
        .unwrap()
}

fn deployed_at() -> Address {
    "0x5FbDB2315678afecb367f032d93F642f64180aa3"
        .parse()
        .unwrap()
}

fn funded_chain() -> ScriptedChain {
    ScriptedChain {
        chain_id: 1337,
        balance: U256::from(5_000_000_000_000_000_000u64),
        accounts: vec![deploy_account()],
        contract_address: deployed_at(),
        code: Bytes::from_static(&[0x60, 0x80, 0x60, 0x40, 0x52]),
        submissions: Mutex::new(Vec::new()),
    }
}

/// Initialize tracing for tests (idempotent).
fn init_test_tracing() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_test_writer()
        .try_init()
        .ok();
}

#[tokio::test]
async fn test_end_to_end_deployment_writes_consumable_record() -> Result<()> {
    init_test_tracing();

    let ctx = TestContext::new()?;
    let deployer = ctx.build_deployer();
    let chain = funded_chain();

    let artifact = ContractArtifact::load_from_file(&deployer.artifact)?;
    assert_eq!(artifact.contract_name, "Greeter");

    let record = deployer
        .deploy(&chain, &artifact)
        .await
        .context("Deployment failed")?;

    // Exactly one transaction, carrying the artifact's creation bytecode.
    {
        let submissions = chain.submissions.lock().unwrap();
        assert_eq!(submissions.len(), 1);
        assert_eq!(submissions[0], artifact.bytecode);
    }

    // The file is what downstream consumers parse, so assert on the raw JSON.
    let raw = std::fs::read_to_string(ctx.record_path())?;
    let parsed: Value = serde_json::from_str(&raw)?;
    assert_eq!(parsed["address"], deployed_at().to_string());
    assert_eq!(parsed["network"], "Ganache");
    assert_eq!(parsed["chainId"], 1337);
    assert_eq!(parsed["deployer"], deploy_account().to_string());
    assert!(parsed["timestamp"].as_str().unwrap().contains('T'));

    assert_eq!(record.address, deployed_at().to_string());
    Ok(())
}

#[tokio::test]
async fn test_redeployment_replaces_the_record() -> Result<()> {
    init_test_tracing();

    let ctx = TestContext::new()?;
    let deployer = ctx.build_deployer();
    let artifact = ContractArtifact::load_from_file(&deployer.artifact)?;

    deployer
        .deploy(&funded_chain(), &artifact)
        .await
        .context("First deployment failed")?;

    let moved = ScriptedChain {
        contract_address: "0xe7f1725E7734CE288F8367e1Bb143E90bb3F0512"
            .parse()
            .unwrap(),
        ..funded_chain()
    };
    deployer
        .deploy(&moved, &artifact)
        .await
        .context("Second deployment failed")?;

    let raw = std::fs::read_to_string(ctx.record_path())?;
    assert!(raw.contains("0xe7f1725E7734CE288F8367e1Bb143E90bb3F0512"));
    assert!(!raw.contains(&deployed_at().to_string()));
    Ok(())
}

#[tokio::test]
async fn test_mismatched_endpoint_never_submits() -> Result<()> {
    init_test_tracing();

    let ctx = TestContext::new()?;
    let deployer = ctx.build_deployer();
    let artifact = ContractArtifact::load_from_file(&deployer.artifact)?;

    let chain = ScriptedChain {
        chain_id: 31337,
        ..funded_chain()
    };

    let err = deployer
        .deploy(&chain, &artifact)
        .await
        .expect_err("Deployment should have failed");

    match err {
        DeployError::NetworkMismatch { expected, actual } => {
            assert_eq!(expected, 1337);
            assert_eq!(actual, 31337);
        }
        other => panic!("Expected NetworkMismatch, got {other:?}"),
    }
    assert!(chain.submissions.lock().unwrap().is_empty());
    assert!(!ctx.record_path().exists());
    Ok(())
}

#[tokio::test]
async fn test_zero_balance_reports_insufficient_funds() -> Result<()> {
    init_test_tracing();

    let ctx = TestContext::new()?;
    let deployer = ctx.build_deployer();
    let artifact = ContractArtifact::load_from_file(&deployer.artifact)?;

    let chain = ScriptedChain {
        balance: U256::ZERO,
        ..funded_chain()
    };

    let err = deployer
        .deploy(&chain, &artifact)
        .await
        .expect_err("Deployment should have failed");

    assert!(matches!(err, DeployError::InsufficientFunds { .. }));
    assert!(err.to_string().contains(&deploy_account().to_string()));
    assert!(chain.submissions.lock().unwrap().is_empty());
    Ok(())
}

#[tokio::test]
async fn test_failed_verification_leaves_no_record() -> Result<()> {
    init_test_tracing();

    let ctx = TestContext::new()?;
    let deployer = ctx.build_deployer();
    let artifact = ContractArtifact::load_from_file(&deployer.artifact)?;

    let chain = ScriptedChain {
        code: Bytes::new(),
        ..funded_chain()
    };

    let err = deployer
        .deploy(&chain, &artifact)
        .await
        .expect_err("Deployment should have failed");

    assert!(matches!(err, DeployError::EmptyCode { .. }));
    assert!(!ctx.record_path().exists());
    Ok(())
}

#[tokio::test]
async fn test_config_file_replays_an_identical_run() -> Result<()> {
    init_test_tracing();

    let ctx = TestContext::new()?;
    let config_path = ctx.dir.path().join("Slipway.toml");

    let deployer = ctx.build_deployer();
    deployer
        .save_to_file(&config_path)
        .context("Failed to save config")?;

    let loaded = Deployer::load_from_file(&config_path).context("Failed to load config")?;
    assert_eq!(loaded, deployer);

    let artifact = ContractArtifact::load_from_file(&loaded.artifact)?;
    loaded
        .deploy(&funded_chain(), &artifact)
        .await
        .context("Deployment from loaded config failed")?;

    let record = DeploymentRecord::load_from_file(&ctx.record_path())
        .context("Record file was not written")?;
    assert_eq!(record.network, "Ganache");
    assert_eq!(record.chain_id, 1337);
    Ok(())
}

#[tokio::test]
async fn test_rejects_artifact_without_bytecode() -> Result<()> {
    init_test_tracing();

    let ctx = TestContext::new()?;
    let empty_path = ctx.dir.path().join("Empty.json");
    std::fs::write(
        &empty_path,
        r#"{"contractName": "Empty", "abi": [], "bytecode": "0x"}"#,
    )?;

    let err = ContractArtifact::load_from_file(&empty_path)
        .expect_err("Artifact load should have failed");
    assert!(err.to_string().contains("no creation bytecode"));
    Ok(())
}
