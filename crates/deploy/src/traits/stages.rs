//! Deployment stage markers for type-state pattern.
//!
//! The deployment order is fixed: Vesting -> Vault -> Roles.
//! Each stage provides the output required by the subsequent one.

/// Marker for the Vesting contract deployment stage.
#[derive(Debug, Clone, Copy, Default)]
pub struct VestingStage;

/// Marker for the Vault contract deployment stage.
#[derive(Debug, Clone, Copy, Default)]
pub struct VaultStage;

/// Marker for the post-deployment role setup stage.
#[derive(Debug, Clone, Copy, Default)]
pub struct RolesStage;

/// Sealed trait for deployment stages.
mod sealed {
    pub trait Sealed {}
    impl Sealed for super::VestingStage {}
    impl Sealed for super::VaultStage {}
    impl Sealed for super::RolesStage {}
}

/// Marker trait for valid deployment stages.
pub trait DeploymentStage: sealed::Sealed + Default + Clone + Send + Sync + 'static {}

impl DeploymentStage for VestingStage {}
impl DeploymentStage for VaultStage {}
impl DeploymentStage for RolesStage {}

/// Trait encoding valid stage transitions.
///
/// This is implemented only for valid transitions:
/// - VestingStage -> VaultStage
/// - VaultStage -> RolesStage
pub trait NextStage: DeploymentStage {
    type Next: DeploymentStage;
}

impl NextStage for VestingStage {
    type Next = VaultStage;
}

impl NextStage for VaultStage {
    type Next = RolesStage;
}

// RolesStage has no NextStage impl - it's terminal
