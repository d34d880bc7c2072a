//! Admin role setup on the deployed Vault.

use alloy_core::primitives::B256;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::{
    network::{self, ChainNetwork},
    roles::RoleGrant,
    traits::{DeploymentStep, RolesContext, RolesStage},
};

/// Grants `ADMIN_ROLE` on the Vault to the first available account.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AdminRoleGrant;

/// A role grant applied on-chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrantedRole {
    pub grant: RoleGrant,
    pub tx_hash: B256,
}

impl DeploymentStep for AdminRoleGrant {
    type Stage = RolesStage;
    type Output = GrantedRole;
    type Context<'a, N>
        = RolesContext<'a, N>
    where
        N: ChainNetwork + 'a;

    const STEP_NAME: &'static str = "admin-role";

    async fn run<'a, N>(self, ctx: Self::Context<'a, N>) -> Result<Self::Output>
    where
        Self: 'a,
        N: ChainNetwork + 'a,
    {
        let account = ctx
            .accounts
            .first()
            .copied()
            .context("No account available to receive the admin role")?;

        let grant = RoleGrant::admin(account);

        tracing::info!(
            step = Self::STEP_NAME,
            role = %grant.role,
            account = %grant.account,
            vault = %ctx.vault.address,
            "Granting admin role"
        );

        let receipt = network::transact(
            ctx.network,
            ctx.tx,
            ctx.vault.address,
            grant.calldata(),
            "grantRole",
        )
        .await
        .with_context(|| format!("Failed to grant admin role on {}", ctx.vault.name))?;

        Ok(GrantedRole {
            grant,
            tx_hash: receipt.transaction_hash,
        })
    }
}
