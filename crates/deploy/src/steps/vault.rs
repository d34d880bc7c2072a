//! Vault contract deployment.

use anyhow::{Context, Result};

use crate::{
    artifact::{ContractArtifact, DeploymentTarget},
    network::{self, ChainNetwork, DeployedContract},
    traits::{DeploymentStep, VaultContext, VaultStage},
};

/// Deploys the Vault contract, passing the Vesting address to its constructor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VaultDeployment {
    pub artifact: ContractArtifact,
}

impl VaultDeployment {
    pub fn new(artifact: ContractArtifact) -> Self {
        Self { artifact }
    }
}

impl DeploymentStep for VaultDeployment {
    type Stage = VaultStage;
    type Output = DeployedContract;
    type Context<'a, N>
        = VaultContext<'a, N>
    where
        N: ChainNetwork + 'a;

    const STEP_NAME: &'static str = "vault";

    async fn run<'a, N>(self, ctx: Self::Context<'a, N>) -> Result<Self::Output>
    where
        Self: 'a,
        N: ChainNetwork + 'a,
    {
        let target = DeploymentTarget::new(self.artifact, vec![ctx.vesting.address]);

        let vault = network::deploy_contract(ctx.network, ctx.tx, &target)
            .await
            .with_context(|| format!("Failed to deploy {}", target.name()))?;

        tracing::info!(
            step = Self::STEP_NAME,
            contract = %vault.name,
            address = %vault.address,
            vesting = %ctx.vesting.address,
            tx_hash = %vault.tx_hash,
            "Vault contract deployed"
        );

        Ok(vault)
    }
}
