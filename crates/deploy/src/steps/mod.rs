//! Deployment steps of the Vesting/Vault pipeline.

mod admin_role;
mod vault;
mod vesting;

pub use admin_role::{AdminRoleGrant, GrantedRole};
pub use vault::VaultDeployment;
pub use vesting::VestingDeployment;
