//! Builder module for creating a [`Deployer`] configuration.
//!
//! This module provides the [`DeployerBuilder`] struct which simplifies the creation
//! of a [`Deployer`] by handling network naming and output directory creation.

use std::path::PathBuf;

use alloy_core::primitives::Address;
use anyhow::{Context, Result};
use url::Url;

use crate::{
    ContractsConfig, Deployer, NetworkConfig,
    network::{DEFAULT_POLL_INTERVAL_MS, DEFAULT_RECEIPT_TIMEOUT_SECS},
};

/// Network name derived from the RPC endpoint: `<host>-<port>`.
pub fn network_name_from_url(url: &Url) -> String {
    match (url.host_str(), url.port_or_known_default()) {
        (Some(host), Some(port)) => format!("{}-{}", host, port),
        (Some(host), None) => host.to_string(),
        _ => "custom".to_string(),
    }
}

/// Output data directory used when none is given: `./data-<network-name>`.
pub fn default_outdata(network_name: &str) -> PathBuf {
    PathBuf::from(format!("data-{}", network_name))
}

/// Builder for creating a [`Deployer`] configuration.
///
/// This builder handles:
/// - Network name derivation (from the RPC host if not provided)
/// - Output data directory creation
///
/// # Example
///
/// ```no_run
/// use vestvault_deploy::DeployerBuilder;
///
/// # fn example() -> anyhow::Result<()> {
/// let deployer = DeployerBuilder::new("http://127.0.0.1:7545".parse()?)
///     .network_name("ganache")
///     .artifacts_dir("build/contracts")
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct DeployerBuilder {
    /// The node JSON-RPC URL (required).
    rpc_url: Url,
    /// The network name (optional, derived from the URL if not provided).
    network_name: Option<String>,
    /// The output data path (optional, `./data-<network-name>` if not provided).
    outdata: Option<PathBuf>,
    /// Directory holding the contract artifacts.
    artifacts_dir: Option<PathBuf>,
    /// Contract name of the Vesting contract.
    vesting_contract: Option<String>,
    /// Contract name of the Vault contract.
    vault_contract: Option<String>,
    /// Sender account override.
    from: Option<Address>,
    /// Explicit gas limit.
    gas_limit: Option<u64>,
    /// Maximum time to wait for a receipt.
    receipt_timeout_secs: u64,
    /// Interval between two receipt lookups.
    poll_interval_ms: u64,
}

impl DeployerBuilder {
    /// Create a new [`DeployerBuilder`] with the required RPC URL.
    pub fn new(rpc_url: Url) -> Self {
        Self {
            rpc_url,
            network_name: None,
            outdata: None,
            artifacts_dir: None,
            vesting_contract: None,
            vault_contract: None,
            from: None,
            gas_limit: None,
            receipt_timeout_secs: DEFAULT_RECEIPT_TIMEOUT_SECS,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
        }
    }

    /// Set the network name.
    ///
    /// If not set, the host of the RPC URL is used.
    pub fn network_name(mut self, name: impl Into<String>) -> Self {
        self.network_name = Some(name.into());
        self
    }

    /// Set the output data directory.
    ///
    /// If not set, defaults to `./data-<network-name>`.
    pub fn outdata(mut self, path: impl Into<PathBuf>) -> Self {
        self.outdata = Some(path.into());
        self
    }

    /// Set the directory holding the contract artifacts.
    pub fn artifacts_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.artifacts_dir = Some(path.into());
        self
    }

    /// Set the contract name of the Vesting contract.
    pub fn vesting_contract(mut self, name: impl Into<String>) -> Self {
        self.vesting_contract = Some(name.into());
        self
    }

    /// Set the contract name of the Vault contract.
    pub fn vault_contract(mut self, name: impl Into<String>) -> Self {
        self.vault_contract = Some(name.into());
        self
    }

    /// Deploy from `from` instead of the first node account.
    pub fn from(mut self, from: Address) -> Self {
        self.from = Some(from);
        self
    }

    /// Use an explicit gas limit for every transaction.
    pub fn gas_limit(mut self, gas_limit: u64) -> Self {
        self.gas_limit = Some(gas_limit);
        self
    }

    /// Set the maximum time to wait for a transaction receipt.
    pub fn receipt_timeout_secs(mut self, secs: u64) -> Self {
        self.receipt_timeout_secs = secs;
        self
    }

    /// Set the interval between two receipt lookups.
    pub fn poll_interval_ms(mut self, ms: u64) -> Self {
        self.poll_interval_ms = ms;
        self
    }

    /// Build the [`Deployer`] configuration.
    ///
    /// This method:
    /// 1. Derives a network name if not provided
    /// 2. Creates the output data directory if it doesn't exist
    pub fn build(self) -> Result<Deployer> {
        let network_name = self
            .network_name
            .unwrap_or_else(|| network_name_from_url(&self.rpc_url));

        let outdata_path = self
            .outdata
            .unwrap_or_else(|| default_outdata(&network_name));

        // Create the output data directory if it doesn't exist
        if !outdata_path.try_exists().context(format!(
            "Failed to check if output data directory exists at path {}. Ensure you provided valid permissions to the directory.",
            outdata_path.display()
        ))? {
            std::fs::create_dir_all(&outdata_path)
                .context("Failed to create output data directory")?;
        }

        let outdata_path = outdata_path
            .canonicalize()
            .context("Failed to canonicalize output data directory path")?;

        let defaults = ContractsConfig::default();

        tracing::info!(
            network_name,
            rpc_url = %self.rpc_url,
            outdata_path = %outdata_path.display(),
            "Building deployer configuration..."
        );

        Ok(Deployer {
            outdata: outdata_path,
            from: self.from,
            gas_limit: self.gas_limit,
            network: NetworkConfig {
                name: network_name,
                rpc_url: self.rpc_url,
                receipt_timeout_secs: self.receipt_timeout_secs,
                poll_interval_ms: self.poll_interval_ms,
            },
            contracts: ContractsConfig {
                artifacts_dir: self.artifacts_dir.unwrap_or(defaults.artifacts_dir),
                vesting: self.vesting_contract.unwrap_or(defaults.vesting),
                vault: self.vault_contract.unwrap_or(defaults.vault),
            },
        })
    }
}
