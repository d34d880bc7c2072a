//! Client for a deployed Vault contract.
//!
//! Only encodes the calls and decodes their return values; vault accounting
//! and vesting rules live in the contract itself.

use alloy_core::primitives::{Address, U256};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::{
    abi::{self, Token},
    network::{self, ChainNetwork, TxReceipt, TxSettings},
};

const DEPOSIT_SIGNATURE: &str = "deposit(uint256)";
const WITHDRAW_SIGNATURE: &str = "withdraw(uint256)";
const GET_BALANCE_SIGNATURE: &str = "getBalance(address)";
const GET_VESTING_SCHEDULE_SIGNATURE: &str = "getVestingSchedule(address)";

/// Vesting schedule of an account as reported by the Vault.
///
/// Values are kept as raw `uint256` words.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VestingSchedule {
    pub start_time: U256,
    pub cliff: U256,
    pub duration: U256,
    pub interval: U256,
}

impl VestingSchedule {
    /// Decode the `(uint256,uint256,uint256,uint256)` return value.
    pub fn decode(data: &[u8]) -> Result<Self> {
        Ok(Self {
            start_time: abi::decode_uint(data, 0).context("Invalid startTime")?,
            cliff: abi::decode_uint(data, 1).context("Invalid cliff")?,
            duration: abi::decode_uint(data, 2).context("Invalid duration")?,
            interval: abi::decode_uint(data, 3).context("Invalid interval")?,
        })
    }
}

/// Handle on a deployed Vault.
pub struct VaultClient<'a, N> {
    network: &'a N,
    address: Address,
    tx: TxSettings,
}

impl<'a, N: ChainNetwork> VaultClient<'a, N> {
    pub fn new(network: &'a N, address: Address, tx: TxSettings) -> Self {
        Self {
            network,
            address,
            tx,
        }
    }

    /// Deposit `amount` into the vault from the sender account.
    pub async fn deposit(&self, amount: U256) -> Result<TxReceipt> {
        let data = abi::encode_call(DEPOSIT_SIGNATURE, &[Token::Uint(amount)]);
        let receipt =
            network::transact(self.network, &self.tx, self.address, data, "deposit").await?;

        tracing::info!(
            vault = %self.address,
            from = %self.tx.from,
            amount = %amount,
            tx_hash = %receipt.transaction_hash,
            "Deposit confirmed"
        );
        Ok(receipt)
    }

    /// Withdraw `amount` from the vault to the sender account.
    pub async fn withdraw(&self, amount: U256) -> Result<TxReceipt> {
        let data = abi::encode_call(WITHDRAW_SIGNATURE, &[Token::Uint(amount)]);
        let receipt =
            network::transact(self.network, &self.tx, self.address, data, "withdraw").await?;

        tracing::info!(
            vault = %self.address,
            from = %self.tx.from,
            amount = %amount,
            tx_hash = %receipt.transaction_hash,
            "Withdrawal confirmed"
        );
        Ok(receipt)
    }

    /// Vault balance of `account`.
    pub async fn balance(&self, account: Address) -> Result<U256> {
        let data = abi::encode_call(GET_BALANCE_SIGNATURE, &[Token::Address(account)]);
        let output = self
            .network
            .call(self.address, data)
            .await
            .context("getBalance call failed")?;
        abi::decode_uint(&output, 0).context("Failed to decode getBalance result")
    }

    /// Vesting schedule of `account`.
    pub async fn vesting_schedule(&self, account: Address) -> Result<VestingSchedule> {
        let data = abi::encode_call(GET_VESTING_SCHEDULE_SIGNATURE, &[Token::Address(account)]);
        let output = self
            .network
            .call(self.address, data)
            .await
            .context("getVestingSchedule call failed")?;
        VestingSchedule::decode(&output).context("Failed to decode getVestingSchedule result")
    }
}
