use std::path::PathBuf;

use alloy_core::primitives::{Address, U256};
use clap::{Args, Parser, Subcommand};
use tracing::level_filters::LevelFilter;
use url::Url;
use vestvault_deploy::{
    network::{DEFAULT_POLL_INTERVAL_MS, DEFAULT_RECEIPT_TIMEOUT_SECS},
    network_name_from_url,
};

/// Well-known local development nodes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[strum(serialize_all = "kebab-case")]
pub enum NetworkPreset {
    /// anvil / hardhat / `truffle develop` default endpoint.
    Development,
    /// Ganache desktop default endpoint.
    Ganache,
    #[strum(default)]
    Custom(String),
}

impl NetworkPreset {
    pub fn to_rpc_url(&self) -> anyhow::Result<Url> {
        let url = match self {
            NetworkPreset::Development => "http://127.0.0.1:8545",
            NetworkPreset::Ganache => "http://127.0.0.1:7545",
            NetworkPreset::Custom(url) => url.as_str(),
        };

        Url::parse(url).map_err(|e| anyhow::anyhow!("Invalid network '{}': {}", url, e))
    }

    /// Name used for the output data directory and the deployment record.
    pub fn network_name(&self) -> anyhow::Result<String> {
        match self {
            NetworkPreset::Custom(_) => Ok(network_name_from_url(&self.to_rpc_url()?)),
            preset => Ok(preset.to_string()),
        }
    }
}

#[derive(Parser)]
#[command(name = "vestvault")]
#[command(
    author,
    version,
    about = "Deploy the Vesting and Vault contracts and interact with the vault"
)]
pub struct Cli {
    /// The verbosity level.
    #[arg(short, long, global = true, env = "VESTVAULT_VERBOSITY", default_value_t = LevelFilter::INFO)]
    pub verbosity: LevelFilter,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Deploy Vesting, then Vault, then grant the admin role to the deployer.
    Deploy(DeployArgs),
    /// Deposit an amount into the vault.
    Deposit(AmountArgs),
    /// Withdraw an amount from the vault.
    Withdraw(AmountArgs),
    /// Show the vault balance of an account.
    Balance(AccountArgs),
    /// Show the vesting schedule of an account.
    VestingSchedule(AccountArgs),
    /// Print shell completions.
    Completions {
        /// The shell to generate completions for.
        shell: clap_complete::Shell,
    },
}

/// Node connection options shared by every subcommand.
#[derive(Debug, Clone, Args)]
pub struct NetworkArgs {
    /// The target network: `development`, `ganache` or an RPC URL.
    #[arg(short, long, env = "VESTVAULT_NETWORK", default_value_t = NetworkPreset::Development)]
    pub network: NetworkPreset,

    /// Explicit JSON-RPC endpoint. Takes precedence over `--network`.
    #[arg(long, env = "VESTVAULT_RPC_URL")]
    pub rpc_url: Option<Url>,

    /// Send transactions from this unlocked account instead of the node's first account.
    #[arg(long, env = "VESTVAULT_FROM")]
    pub from: Option<Address>,

    /// Maximum number of seconds to wait for a transaction to be mined.
    #[arg(long, env = "VESTVAULT_RECEIPT_TIMEOUT", default_value_t = DEFAULT_RECEIPT_TIMEOUT_SECS)]
    pub receipt_timeout: u64,

    /// Milliseconds between two receipt lookups.
    #[arg(long, env = "VESTVAULT_POLL_INTERVAL", default_value_t = DEFAULT_POLL_INTERVAL_MS)]
    pub poll_interval: u64,
}

impl NetworkArgs {
    pub fn rpc_url(&self) -> anyhow::Result<Url> {
        match &self.rpc_url {
            Some(url) => Ok(url.clone()),
            None => self.network.to_rpc_url(),
        }
    }

    pub fn network_name(&self) -> anyhow::Result<String> {
        match &self.rpc_url {
            Some(url) => Ok(network_name_from_url(url)),
            None => self.network.network_name(),
        }
    }
}

#[derive(Debug, Clone, Args)]
pub struct DeployArgs {
    #[command(flatten)]
    pub network: NetworkArgs,

    /// Directory holding the compiled contract artifacts.
    ///
    /// Defaults to `build/contracts` (Truffle layout).
    #[arg(long, env = "VESTVAULT_ARTIFACTS")]
    pub artifacts: Option<PathBuf>,

    /// Contract name of the Vesting artifact.
    #[arg(long, env = "VESTVAULT_VESTING_CONTRACT")]
    pub vesting: Option<String>,

    /// Contract name of the Vault artifact.
    #[arg(long, env = "VESTVAULT_VAULT_CONTRACT")]
    pub vault: Option<String>,

    /// Gas limit for every transaction. The node estimates it when omitted.
    #[arg(long, env = "VESTVAULT_GAS_LIMIT")]
    pub gas_limit: Option<u64>,

    /// The path to the output data directory.
    ///
    /// If not provided, the data will be stored at: ./data-<network-name>
    #[arg(long, env = "VESTVAULT_OUTDATA")]
    pub outdata: Option<PathBuf>,

    /// Path to an existing Vestvault.toml configuration file to load.
    ///
    /// When provided, the deployment uses the configuration from this file
    /// instead of the other command line arguments.
    #[arg(long, alias = "conf", env = "VESTVAULT_CONFIG")]
    pub config: Option<PathBuf>,
}

/// Locates the vault to talk to.
#[derive(Debug, Clone, Args)]
pub struct VaultArgs {
    #[command(flatten)]
    pub network: NetworkArgs,

    /// Address of the Vault. Read from the deployment record when omitted.
    #[arg(long, env = "VESTVAULT_VAULT_ADDRESS")]
    pub address: Option<Address>,

    /// Output data directory holding the deployment record.
    ///
    /// If not provided: ./data-<network-name>
    #[arg(long, env = "VESTVAULT_OUTDATA")]
    pub outdata: Option<PathBuf>,
}

#[derive(Debug, Clone, Args)]
pub struct AmountArgs {
    /// The amount, in the token's smallest unit.
    pub amount: U256,

    #[command(flatten)]
    pub vault: VaultArgs,
}

#[derive(Debug, Clone, Args)]
pub struct AccountArgs {
    /// The account to query. Defaults to the sender account.
    #[arg(long)]
    pub account: Option<Address>,

    #[command(flatten)]
    pub vault: VaultArgs,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_network_presets() {
        let development: NetworkPreset = "development".parse().unwrap();
        assert_eq!(development, NetworkPreset::Development);
        assert_eq!(
            development.to_rpc_url().unwrap().as_str(),
            "http://127.0.0.1:8545/"
        );
        assert_eq!(development.network_name().unwrap(), "development");

        let ganache: NetworkPreset = "ganache".parse().unwrap();
        assert_eq!(ganache.to_rpc_url().unwrap().as_str(), "http://127.0.0.1:7545/");
    }

    #[test]
    fn test_custom_network() {
        let custom: NetworkPreset = "http://10.0.0.5:8545".parse().unwrap();
        assert_eq!(
            custom,
            NetworkPreset::Custom("http://10.0.0.5:8545".to_string())
        );
        assert_eq!(custom.network_name().unwrap(), "10.0.0.5-8545");

        let invalid: NetworkPreset = "not a url".parse().unwrap();
        assert!(invalid.to_rpc_url().is_err());
    }

    #[test]
    fn test_rpc_url_overrides_network() {
        let cli = Cli::try_parse_from([
            "vestvault",
            "deploy",
            "--network",
            "ganache",
            "--rpc-url",
            "http://node:9545",
            "--gas-limit",
            "6721975",
        ])
        .unwrap();

        let Command::Deploy(args) = cli.command else {
            panic!("expected deploy command");
        };
        assert_eq!(args.network.rpc_url().unwrap().as_str(), "http://node:9545/");
        assert_eq!(args.network.network_name().unwrap(), "node-9545");
        assert_eq!(args.gas_limit, Some(6_721_975));
        assert_eq!(args.network.receipt_timeout, DEFAULT_RECEIPT_TIMEOUT_SECS);
        assert_eq!(args.network.poll_interval, DEFAULT_POLL_INTERVAL_MS);
    }

    #[test]
    fn test_vault_commands() {
        let cli = Cli::try_parse_from([
            "vestvault",
            "deposit",
            "1000",
            "--from",
            "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266",
        ])
        .unwrap();

        let Command::Deposit(args) = cli.command else {
            panic!("expected deposit command");
        };
        assert_eq!(args.amount, U256::from(1000u64));
        assert!(args.vault.network.from.is_some());
        assert!(args.vault.address.is_none());

        let cli = Cli::try_parse_from(["vestvault", "-v", "debug", "vesting-schedule"]).unwrap();
        assert_eq!(cli.verbosity, LevelFilter::DEBUG);
        assert!(matches!(cli.command, Command::VestingSchedule(_)));
    }
}
