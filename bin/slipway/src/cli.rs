use alloy_core::primitives::Address;
use clap::Parser;
use slipway_deploy::Network;
use tracing::level_filters::LevelFilter;

/// The default target network (local Ganache).
const DEFAULT_NETWORK: Network = Network::Ganache;

#[derive(Parser)]
#[command(name = "slipway")]
#[command(
    author,
    version,
    about = "Deploy a compiled contract and record where it landed"
)]
pub struct Cli {
    /// The verbosity level.
    #[arg(short, long, env = "SLIPWAY_VERBOSITY", default_value_t = LevelFilter::INFO)]
    pub verbosity: LevelFilter,

    /// The network to deploy to.
    #[arg(short, long, env = "SLIPWAY_NETWORK", default_value_t = DEFAULT_NETWORK)]
    pub network: Network,

    /// The URL of the RPC endpoint to deploy through.
    ///
    /// If not provided, the network's well-known endpoint is used
    /// (e.g. http://127.0.0.1:7545 for ganache).
    #[arg(long, alias = "rpc", env = "SLIPWAY_ENDPOINT")]
    pub endpoint: Option<String>,

    /// Path to the compiled contract artifact (JSON with contractName, abi
    /// and bytecode fields).
    #[arg(short, long, env = "SLIPWAY_ARTIFACT")]
    pub artifact: Option<String>,

    /// Path the deployment record is written to.
    #[arg(
        long,
        alias = "out",
        env = "SLIPWAY_RECORD",
        default_value = "deployed-contract.json"
    )]
    pub record: String,

    /// The account to deploy from.
    ///
    /// If not provided, the endpoint's first unlocked account is used.
    #[arg(long, alias = "from", env = "SLIPWAY_DEPLOYER")]
    pub deployer: Option<Address>,

    /// Seconds to wait for the deployment transaction to be confirmed.
    #[arg(long, env = "SLIPWAY_CONFIRMATION_TIMEOUT", default_value_t = 120)]
    pub confirmation_timeout: u64,

    /// Path to an existing Slipway.toml configuration file to load.
    ///
    /// When provided, the deployment will use the configuration from this file
    /// instead of generating a new one from CLI arguments.
    #[arg(long, alias = "conf", env = "SLIPWAY_CONFIG")]
    pub config: Option<String>,
}
