//! Access-control role identifiers and grants.

use alloy_core::primitives::{Address, B256, Bytes, keccak256};
use derive_more::{Deref, Display, From};
use serde::{Deserialize, Serialize};

use crate::abi::{self, Token};

/// Label of the vault administrator role.
pub const ADMIN_ROLE: &str = "ADMIN_ROLE";

/// Signature of the `AccessControl` grant entry point.
const GRANT_ROLE_SIGNATURE: &str = "grantRole(bytes32,address)";

/// A 32-byte role identifier, the keccak256 of a human-readable label.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Deref, Display, From,
)]
#[serde(transparent)]
pub struct RoleId(B256);

impl RoleId {
    /// Derive a role identifier from its UTF-8 label.
    pub fn from_label(label: &str) -> Self {
        Self(keccak256(label.as_bytes()))
    }

    /// The identifier of [`ADMIN_ROLE`].
    pub fn admin() -> Self {
        Self::from_label(ADMIN_ROLE)
    }
}

/// An authorization to apply on a deployed contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleGrant {
    pub role: RoleId,
    pub account: Address,
}

impl RoleGrant {
    /// Grant [`ADMIN_ROLE`] to `account`.
    pub fn admin(account: Address) -> Self {
        Self {
            role: RoleId::admin(),
            account,
        }
    }

    /// Calldata for `grantRole(role, account)`.
    pub fn calldata(&self) -> Bytes {
        abi::encode_call(
            GRANT_ROLE_SIGNATURE,
            &[Token::FixedBytes(*self.role), Token::Address(self.account)],
        )
    }
}
