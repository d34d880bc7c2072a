//! Deployment context passed between stages.

use alloy_core::primitives::Address;

use crate::network::{DeployedContract, TxSettings};

/// Context available at the Vesting stage (minimal).
pub struct VestingContext<'a, N> {
    pub network: &'a N,
    pub tx: &'a TxSettings,
}

/// Context after the Vesting contract is deployed.
pub struct VaultContext<'a, N> {
    pub network: &'a N,
    pub tx: &'a TxSettings,
    pub vesting: &'a DeployedContract,
}

/// Context after both contracts are deployed.
pub struct RolesContext<'a, N> {
    pub network: &'a N,
    pub tx: &'a TxSettings,
    pub vault: &'a DeployedContract,
    /// Accounts available for the run, in node order.
    pub accounts: &'a [Address],
}
