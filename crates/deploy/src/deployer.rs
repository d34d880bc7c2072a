use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use alloy_core::primitives::Address;
use anyhow::{Context, Result};
use figment::{
    Figment,
    providers::{Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::{
    artifact::ContractArtifact,
    network::{
        ChainNetwork, DEFAULT_POLL_INTERVAL_MS, DEFAULT_RECEIPT_TIMEOUT_SECS, RpcNetwork,
    },
    record::{DeploymentRecord, RECORD_FILENAME},
    traits::{DeploymentResult, RunPipeline, StandardPipeline},
};

/// The default name for the vestvault configuration file.
pub const CONFIG_FILENAME: &str = "Vestvault.toml";

/// Default RPC endpoint of a local development node.
pub const DEFAULT_RPC_URL: &str = "http://127.0.0.1:8545";

/// Default directory holding the contract artifacts (Truffle layout).
pub const DEFAULT_ARTIFACTS_DIR: &str = "build/contracts";

/// Default output data directory.
pub const DEFAULT_OUTDATA: &str = "data-vestvault";

/// Connection settings of the target node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// Name of the network, used in logs and in the deployment record.
    pub name: String,
    /// JSON-RPC endpoint of the node.
    pub rpc_url: Url,
    /// Maximum time to wait for a transaction receipt.
    pub receipt_timeout_secs: u64,
    /// Interval between two receipt lookups.
    pub poll_interval_ms: u64,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            name: "development".to_string(),
            rpc_url: Url::parse(DEFAULT_RPC_URL).expect("default RPC URL is valid"),
            receipt_timeout_secs: DEFAULT_RECEIPT_TIMEOUT_SECS,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
        }
    }
}

impl NetworkConfig {
    /// Build the JSON-RPC client for this network.
    pub fn connect(&self) -> Result<RpcNetwork> {
        Ok(RpcNetwork::new(self.rpc_url.clone())?
            .with_receipt_timeout(Duration::from_secs(self.receipt_timeout_secs))
            .with_poll_interval(Duration::from_millis(self.poll_interval_ms)))
    }
}

/// Location of the contract artifacts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractsConfig {
    /// Directory holding `<name>.json` artifacts.
    pub artifacts_dir: PathBuf,
    /// Contract name of the Vesting contract.
    pub vesting: String,
    /// Contract name of the Vault contract.
    pub vault: String,
}

impl Default for ContractsConfig {
    fn default() -> Self {
        Self {
            artifacts_dir: PathBuf::from(DEFAULT_ARTIFACTS_DIR),
            vesting: "Vesting".to_string(),
            vault: "Vault".to_string(),
        }
    }
}

impl ContractsConfig {
    /// Load both artifacts and assemble the standard pipeline.
    pub fn load_pipeline(&self) -> Result<StandardPipeline> {
        let vesting = ContractArtifact::load(&self.artifacts_dir, &self.vesting)
            .context("Failed to load Vesting artifact")?;
        let vault = ContractArtifact::load(&self.artifacts_dir, &self.vault)
            .context("Failed to load Vault artifact")?;

        Ok(StandardPipeline::standard(vesting, vault))
    }
}

/// Main deployer that orchestrates the Vesting/Vault deployment.
///
/// This struct contains all the configuration needed to run a deployment
/// and can be serialized to/from TOML format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deployer {
    /// Path to the output data directory.
    pub outdata: PathBuf,
    /// Account to deploy from. Defaults to the first account of the node.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<Address>,
    /// Explicit gas limit for every transaction.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gas_limit: Option<u64>,

    /// Configuration of the target node.
    pub network: NetworkConfig,
    /// Configuration of the contract artifacts.
    pub contracts: ContractsConfig,
}

impl Default for Deployer {
    fn default() -> Self {
        Self {
            outdata: PathBuf::from(DEFAULT_OUTDATA),
            from: None,
            gas_limit: None,
            network: NetworkConfig::default(),
            contracts: ContractsConfig::default(),
        }
    }
}

impl Deployer {
    /// Save the configuration to a TOML file.
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let content =
            toml::to_string_pretty(self).context("Failed to serialize deployer config to TOML")?;
        std::fs::write(path, content)
            .context(format!("Failed to write config to {}", path.display()))?;
        tracing::info!(path = %path.display(), "Configuration saved");
        Ok(())
    }

    /// Load the configuration from a TOML file.
    ///
    /// Keys missing from the file fall back to their defaults.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(anyhow::anyhow!(
                "Configuration file or directory not found: {}",
                path.display()
            ));
        }

        let config_path = if path.is_dir() {
            path.join(CONFIG_FILENAME)
        } else {
            path.to_path_buf()
        };

        let config: Self = Figment::from(Serialized::defaults(Self::default()))
            .merge(Toml::file(&config_path))
            .extract()
            .context(format!("Failed to load config from {}", config_path.display()))?;

        tracing::info!(path = %config_path.display(), "Configuration loaded");
        Ok(config)
    }

    /// Save the deployer's configuration to the default location (Vestvault.toml in outdata).
    pub fn save_config(&self) -> Result<PathBuf> {
        std::fs::create_dir_all(&self.outdata).context(format!(
            "Failed to create output directory {}",
            self.outdata.display()
        ))?;
        let config_path = self.outdata.join(CONFIG_FILENAME);
        self.save_to_file(&config_path)?;
        Ok(config_path)
    }

    /// Path of the deployment record written by [`Deployer::deploy`].
    pub fn record_path(&self) -> PathBuf {
        self.outdata.join(RECORD_FILENAME)
    }

    /// Accounts used for the run: `from` when set, otherwise the node's accounts.
    pub async fn resolve_accounts<N: ChainNetwork>(&self, network: &N) -> Result<Vec<Address>> {
        if let Some(from) = self.from {
            tracing::debug!(from = %from, "Using configured sender account");
            return Ok(vec![from]);
        }

        let accounts = network
            .accounts()
            .await
            .context("Failed to list node accounts")?;

        if accounts.is_empty() {
            anyhow::bail!(
                "Node at {} exposes no accounts; pass --from with an unlocked account",
                self.network.rpc_url
            );
        }

        tracing::debug!(count = accounts.len(), first = %accounts[0], "Node accounts loaded");
        Ok(accounts)
    }
}

impl Deployer {
    /// Deploy against the configured node, printing the summary on stdout.
    pub async fn deploy(&self) -> Result<DeploymentResult> {
        let network = self.network.connect()?;

        tracing::info!(
            network = %self.network.name,
            rpc_url = %network.url(),
            "Starting deployment process..."
        );

        self.deploy_with(&network, &mut std::io::stdout()).await
    }

    /// Run the deployment against `network`, writing the summary to `out`.
    ///
    /// Nothing is written to `out` and no record is saved unless every step
    /// succeeded.
    pub async fn deploy_with<N: ChainNetwork, W: Write>(
        &self,
        network: &N,
        out: &mut W,
    ) -> Result<DeploymentResult> {
        // Artifacts are loaded before any remote call.
        let pipeline = self.contracts.load_pipeline()?;

        let accounts = self.resolve_accounts(network).await?;

        let chain_id = network
            .chain_id()
            .await
            .context(format!("Failed to reach node at {}", self.network.rpc_url))?;
        tracing::info!(chain_id, "Connected to node");

        let result = pipeline
            .run_pipeline(network, &accounts, self.gas_limit)
            .await?;

        write_summary(out, &result).context("Failed to print deployment summary")?;

        // The contracts are on-chain at this point: a failing record write is only reported.
        let record = DeploymentRecord::new(&self.network.name, chain_id, &result);
        if let Err(e) = std::fs::create_dir_all(&self.outdata)
            .context("Failed to create output directory")
            .and_then(|_| record.save_to_file(&self.record_path()))
        {
            tracing::warn!(error = ?e, "Failed to save deployment record");
        }

        Ok(result)
    }
}

/// Print the confirmation lines of a successful run.
pub fn write_summary<W: Write>(out: &mut W, result: &DeploymentResult) -> std::io::Result<()> {
    writeln!(out, "Contracts deployed successfully!")?;
    writeln!(out, "Vesting Contract Address: {}", result.vesting.address)?;
    writeln!(out, "Vault Contract Address: {}", result.vault.address)?;
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_core::primitives::address;
    use tempdir::TempDir;

    #[test]
    fn test_config_round_trip() {
        let temp_dir = TempDir::new("vestvault-config").unwrap();

        let deployer = Deployer {
            outdata: temp_dir.path().to_path_buf(),
            from: Some(address!("f39Fd6e51aad88F6F4ce6aB8827279cffFb92266")),
            gas_limit: Some(6_721_975),
            network: NetworkConfig {
                name: "ganache".to_string(),
                rpc_url: Url::parse("http://127.0.0.1:7545").unwrap(),
                ..Default::default()
            },
            contracts: ContractsConfig::default(),
        };

        let path = deployer.save_config().unwrap();
        assert_eq!(path, temp_dir.path().join(CONFIG_FILENAME));

        let loaded = Deployer::load_from_file(&path).unwrap();
        assert_eq!(deployer, loaded);

        // Loading from the directory picks up the config file inside it.
        let loaded = Deployer::load_from_file(temp_dir.path()).unwrap();
        assert_eq!(deployer, loaded);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let temp_dir = TempDir::new("vestvault-config").unwrap();
        let path = temp_dir.path().join(CONFIG_FILENAME);
        std::fs::write(
            &path,
            r#"
            [network]
            rpc_url = "http://10.0.0.5:8545"
            "#,
        )
        .unwrap();

        let loaded = Deployer::load_from_file(&path).unwrap();
        assert_eq!(loaded.network.rpc_url.as_str(), "http://10.0.0.5:8545/");
        assert_eq!(loaded.network.name, "development");
        assert_eq!(loaded.contracts, ContractsConfig::default());
        assert_eq!(loaded.from, None);
    }

    #[test]
    fn test_load_missing_config() {
        let err = Deployer::load_from_file(Path::new("/nonexistent/Vestvault.toml")).unwrap_err();
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn test_load_pipeline_requires_artifacts() {
        let temp_dir = TempDir::new("vestvault-artifacts").unwrap();
        let contracts = ContractsConfig {
            artifacts_dir: temp_dir.path().to_path_buf(),
            ..Default::default()
        };

        let err = contracts.load_pipeline().unwrap_err();
        assert!(err.to_string().contains("Vesting"));
    }
}
