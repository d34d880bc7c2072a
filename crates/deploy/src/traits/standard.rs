//! Standard pipeline type alias.

use crate::artifact::ContractArtifact;
use crate::steps::{AdminRoleGrant, VaultDeployment, VestingDeployment};

use super::deployer::{End, Pipeline};

/// Standard Vesting/Vault pipeline:
/// 1. Deploy Vesting
/// 2. Deploy Vault(vesting address)
/// 3. Grant `ADMIN_ROLE` on the Vault to the deployer account
pub type StandardPipeline =
    Pipeline<VestingDeployment, Pipeline<VaultDeployment, Pipeline<AdminRoleGrant, End>>>;

impl StandardPipeline {
    /// Create the standard pipeline from the two contract artifacts.
    pub fn standard(vesting: ContractArtifact, vault: ContractArtifact) -> Self {
        Pipeline::new(VestingDeployment::new(vesting))
            .then(VaultDeployment::new(vault))
            .then(AdminRoleGrant)
    }
}
