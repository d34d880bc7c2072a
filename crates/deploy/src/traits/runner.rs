//! Pipeline execution engine.

use alloy_core::primitives::Address;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use super::context::{RolesContext, VaultContext, VestingContext};
use super::deployer::{End, Pipeline};
use super::service::DeploymentStep;
use crate::network::{ChainNetwork, DeployedContract, TxSettings};
use crate::steps::{AdminRoleGrant, GrantedRole, VaultDeployment, VestingDeployment};

/// Result of a complete pipeline run.
///
/// This struct provides named access to every step output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentResult {
    pub vesting: DeployedContract,
    pub vault: DeployedContract,
    pub admin_role: GrantedRole,
}

/// Trait for running a pipeline and collecting step outputs.
pub trait RunPipeline {
    /// Run all steps in order against `network`.
    ///
    /// Transactions are sent from `accounts[0]`. An empty account list fails
    /// before any remote call is issued.
    fn run_pipeline<N: ChainNetwork>(
        self,
        network: &N,
        accounts: &[Address],
        gas_limit: Option<u64>,
    ) -> impl std::future::Future<Output = Result<DeploymentResult>> + Send;
}

// Implementation for VestingDeployment -> VaultDeployment -> AdminRoleGrant
impl RunPipeline
    for Pipeline<VestingDeployment, Pipeline<VaultDeployment, Pipeline<AdminRoleGrant, End>>>
{
    async fn run_pipeline<N: ChainNetwork>(
        self,
        network: &N,
        accounts: &[Address],
        gas_limit: Option<u64>,
    ) -> Result<DeploymentResult> {
        let deployer = accounts
            .first()
            .copied()
            .context("The network exposes no accounts to deploy from")?;
        let tx = TxSettings::new(deployer).with_gas_limit(gas_limit);

        // Stage 1: Deploy Vesting
        tracing::info!(
            step = VestingDeployment::STEP_NAME,
            from = %deployer,
            "Deploying Vesting contract..."
        );
        let vesting_ctx = VestingContext {
            network,
            tx: &tx,
        };
        let vesting = self.step.run(vesting_ctx).await?;

        // Stage 2: Deploy Vault against the confirmed Vesting address
        tracing::info!(step = VaultDeployment::STEP_NAME, "Deploying Vault contract...");
        let vault_ctx = VaultContext {
            network,
            tx: &tx,
            vesting: &vesting,
        };
        let vault = self.next.step.run(vault_ctx).await?;

        // Stage 3: Role setup
        tracing::info!(step = AdminRoleGrant::STEP_NAME, "Setting up roles...");
        let roles_ctx = RolesContext {
            network,
            tx: &tx,
            vault: &vault,
            accounts,
        };
        let admin_role = self.next.next.step.run(roles_ctx).await?;

        Ok(DeploymentResult {
            vesting,
            vault,
            admin_role,
        })
    }
}
