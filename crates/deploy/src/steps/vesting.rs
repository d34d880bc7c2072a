//! Vesting contract deployment.

use anyhow::{Context, Result};

use crate::{
    artifact::{ContractArtifact, DeploymentTarget},
    network::{self, ChainNetwork, DeployedContract},
    traits::{DeploymentStep, VestingContext, VestingStage},
};

/// Deploys the Vesting contract. Its constructor takes no arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VestingDeployment {
    pub artifact: ContractArtifact,
}

impl VestingDeployment {
    pub fn new(artifact: ContractArtifact) -> Self {
        Self { artifact }
    }
}

impl DeploymentStep for VestingDeployment {
    type Stage = VestingStage;
    type Output = DeployedContract;
    type Context<'a, N>
        = VestingContext<'a, N>
    where
        N: ChainNetwork + 'a;

    const STEP_NAME: &'static str = "vesting";

    async fn run<'a, N>(self, ctx: Self::Context<'a, N>) -> Result<Self::Output>
    where
        Self: 'a,
        N: ChainNetwork + 'a,
    {
        let target = DeploymentTarget::new(self.artifact, vec![]);

        let vesting = network::deploy_contract(ctx.network, ctx.tx, &target)
            .await
            .with_context(|| format!("Failed to deploy {}", target.name()))?;

        tracing::info!(
            step = Self::STEP_NAME,
            contract = %vesting.name,
            address = %vesting.address,
            tx_hash = %vesting.tx_hash,
            "Vesting contract deployed"
        );

        Ok(vesting)
    }
}
