use std::path::Path;

use alloy_core::primitives::Address;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::{roles::RoleId, traits::DeploymentResult};

/// File name of the deployment record inside the output data directory.
pub const RECORD_FILENAME: &str = "deployment.json";

/// Addresses produced by a successful deployment run.
///
/// This file is saved to `{outdata}/deployment.json` once every step has succeeded.
/// It is never used to resume a run: a new run always deploys fresh contracts
/// and overwrites the record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentRecord {
    /// Name of the network the contracts were deployed to
    pub network: String,
    /// Chain id reported by the node
    pub chain_id: u64,
    /// Address of the Vesting contract
    pub vesting: Address,
    /// Address of the Vault contract
    pub vault: Address,
    /// Account holding the admin role on the Vault
    pub admin: Address,
    /// Identifier of the granted admin role
    pub admin_role: RoleId,
    /// Unix timestamp when this deployment was recorded
    pub deployed_at: i64,
    /// Vestvault version that created this deployment
    pub vestvault_version: String,
}

impl DeploymentRecord {
    /// Create a record for `result`.
    ///
    /// The timestamp is set to the current time, and the vestvault_version is
    /// set from the CARGO_PKG_VERSION environment variable.
    pub fn new(network: impl Into<String>, chain_id: u64, result: &DeploymentResult) -> Self {
        Self {
            network: network.into(),
            chain_id,
            vesting: result.vesting.address,
            vault: result.vault.address,
            admin: result.admin_role.grant.account,
            admin_role: result.admin_role.grant.role,
            deployed_at: chrono::Utc::now().timestamp(),
            vestvault_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    /// Save this record to a file.
    ///
    /// The file is written as formatted JSON for human readability.
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let json =
            serde_json::to_string_pretty(self).context("Failed to serialize deployment record")?;

        std::fs::write(path, json).context(format!(
            "Failed to write deployment record to {}",
            path.display()
        ))?;

        tracing::info!(path = %path.display(), "Deployment record saved");
        Ok(())
    }

    /// Load a record from a file.
    ///
    /// Returns an error if the file doesn't exist, is malformed, or cannot be read.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            anyhow::bail!(
                "Deployment record does not exist: {} (run `vestvault deploy` first)",
                path.display()
            );
        }

        let content = std::fs::read_to_string(path).context(format!(
            "Failed to read deployment record from {}",
            path.display()
        ))?;

        let record: Self =
            serde_json::from_str(&content).context("Failed to parse deployment record JSON")?;

        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        network::DeployedContract,
        roles::RoleGrant,
        steps::GrantedRole,
    };
    use alloy_core::primitives::{B256, address};
    use tempdir::TempDir;

    fn sample_result() -> DeploymentResult {
        DeploymentResult {
            vesting: DeployedContract {
                name: "Vesting".to_string(),
                address: address!("5FbDB2315678afecb367f032d93F642f64180aa3"),
                tx_hash: B256::repeat_byte(1),
                block_number: Some(1),
            },
            vault: DeployedContract {
                name: "Vault".to_string(),
                address: address!("e7f1725E7734CE288F8367e1Bb143E90bb3F0512"),
                tx_hash: B256::repeat_byte(2),
                block_number: Some(2),
            },
            admin_role: GrantedRole {
                grant: RoleGrant::admin(address!("f39Fd6e51aad88F6F4ce6aB8827279cffFb92266")),
                tx_hash: B256::repeat_byte(3),
            },
        }
    }

    #[test]
    fn test_record_from_result() {
        let record = DeploymentRecord::new("development", 31337, &sample_result());

        assert_eq!(record.network, "development");
        assert_eq!(record.chain_id, 31337);
        assert_eq!(record.vesting, address!("5FbDB2315678afecb367f032d93F642f64180aa3"));
        assert_eq!(record.vault, address!("e7f1725E7734CE288F8367e1Bb143E90bb3F0512"));
        assert_eq!(record.admin, address!("f39Fd6e51aad88F6F4ce6aB8827279cffFb92266"));
        assert_eq!(record.admin_role, RoleId::admin());
        assert!(record.deployed_at > 0);
        assert_eq!(record.vestvault_version, env!("CARGO_PKG_VERSION"));
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new("vestvault-record").unwrap();
        let path = temp_dir.path().join(RECORD_FILENAME);

        let record = DeploymentRecord::new("ganache", 1337, &sample_result());
        record.save_to_file(&path).unwrap();

        let loaded = DeploymentRecord::load_from_file(&path).unwrap();
        assert_eq!(record, loaded);
    }

    #[test]
    fn test_load_missing_record() {
        let temp_dir = TempDir::new("vestvault-record").unwrap();
        let err = DeploymentRecord::load_from_file(&temp_dir.path().join(RECORD_FILENAME))
            .unwrap_err();
        assert!(err.to_string().contains("vestvault deploy"));
    }

    #[test]
    fn test_load_malformed_record() {
        let temp_dir = TempDir::new("vestvault-record").unwrap();
        let path = temp_dir.path().join(RECORD_FILENAME);
        std::fs::write(&path, "{ not json").unwrap();

        assert!(DeploymentRecord::load_from_file(&path).is_err());
    }
}
