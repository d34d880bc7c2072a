//! Execution network access.
//!
//! [`ChainNetwork`] is the seam between the deployment pipeline and the node it
//! talks to. [`RpcNetwork`] implements it over Ethereum JSON-RPC, sending
//! transactions from node-managed (unlocked) accounts.

use std::future::Future;
use std::time::Duration;

use alloy_core::primitives::{Address, B256, Bytes};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::artifact::DeploymentTarget;
use crate::rpc;

/// Default maximum time to wait for a transaction to be mined.
pub const DEFAULT_RECEIPT_TIMEOUT_SECS: u64 = 120;

/// Default interval between two receipt lookups.
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 500;

/// A transaction to submit through `eth_sendTransaction`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TxRequest {
    pub from: Address,
    /// `None` for contract creation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<Address>,
    pub data: Bytes,
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "rpc::serialize_opt_quantity"
    )]
    pub gas: Option<u64>,
}

/// Sender parameters shared by every transaction of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TxSettings {
    pub from: Address,
    /// Explicit gas limit. When unset the node estimates it.
    pub gas_limit: Option<u64>,
}

impl TxSettings {
    pub fn new(from: Address) -> Self {
        Self {
            from,
            gas_limit: None,
        }
    }

    pub fn with_gas_limit(mut self, gas_limit: Option<u64>) -> Self {
        self.gas_limit = gas_limit;
        self
    }

    fn create(&self, data: Bytes) -> TxRequest {
        TxRequest {
            from: self.from,
            to: None,
            data,
            gas: self.gas_limit,
        }
    }

    fn call(&self, to: Address, data: Bytes) -> TxRequest {
        TxRequest {
            from: self.from,
            to: Some(to),
            data,
            gas: self.gas_limit,
        }
    }
}

/// Receipt of a mined transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TxReceipt {
    pub transaction_hash: B256,
    #[serde(default)]
    pub contract_address: Option<Address>,
    #[serde(
        default,
        deserialize_with = "rpc::deserialize_opt_u64_from_hex",
        serialize_with = "rpc::serialize_opt_quantity"
    )]
    pub block_number: Option<u64>,
    /// `0x1` on success, `0x0` on revert. Absent on pre-Byzantium nodes.
    #[serde(
        default,
        deserialize_with = "rpc::deserialize_opt_u64_from_hex",
        serialize_with = "rpc::serialize_opt_quantity"
    )]
    pub status: Option<u64>,
}

impl TxReceipt {
    pub fn succeeded(&self) -> bool {
        self.status != Some(0)
    }

    /// Fail if the transaction reverted.
    pub fn ensure_success(&self, what: &str) -> Result<()> {
        if !self.succeeded() {
            anyhow::bail!(
                "{} reverted (tx {}, block {:?})",
                what,
                self.transaction_hash,
                self.block_number
            );
        }
        Ok(())
    }
}

/// Handle on a contract deployed during this run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeployedContract {
    pub name: String,
    pub address: Address,
    pub tx_hash: B256,
    pub block_number: Option<u64>,
}

/// A network execution environment able to run transactions.
pub trait ChainNetwork: Send + Sync {
    /// The chain id reported by the node.
    fn chain_id(&self) -> impl Future<Output = Result<u64>> + Send;

    /// Accounts managed by the node, in node order.
    fn accounts(&self) -> impl Future<Output = Result<Vec<Address>>> + Send;

    /// Submit a transaction and return its hash.
    fn send_transaction(&self, tx: TxRequest) -> impl Future<Output = Result<B256>> + Send;

    /// Wait until the transaction is mined and return its receipt.
    fn wait_for_receipt(&self, tx_hash: B256) -> impl Future<Output = Result<TxReceipt>> + Send;

    /// Execute a read-only call against the latest state.
    fn call(&self, to: Address, data: Bytes) -> impl Future<Output = Result<Bytes>> + Send;
}

/// Deploy `target` and wait for its mined receipt.
///
/// Returns only once the node reports a successful receipt carrying the new
/// contract address.
pub async fn deploy_contract<N: ChainNetwork>(
    network: &N,
    tx: &TxSettings,
    target: &DeploymentTarget,
) -> Result<DeployedContract> {
    tracing::debug!(
        contract = %target.name(),
        from = %tx.from,
        constructor_args = ?target.constructor_args,
        "Sending contract creation transaction"
    );

    let tx_hash = network
        .send_transaction(tx.create(target.creation_code()))
        .await
        .with_context(|| format!("Failed to send {} creation transaction", target.name()))?;

    let receipt = network
        .wait_for_receipt(tx_hash)
        .await
        .with_context(|| format!("Failed to confirm {} deployment", target.name()))?;

    receipt.ensure_success(&format!("Deployment of {}", target.name()))?;

    let address = receipt.contract_address.with_context(|| {
        format!(
            "Receipt of {} creation (tx {}) has no contract address",
            target.name(),
            tx_hash
        )
    })?;

    Ok(DeployedContract {
        name: target.name().to_string(),
        address,
        tx_hash,
        block_number: receipt.block_number,
    })
}

/// Send a state-changing call to `to` and wait for a successful receipt.
pub async fn transact<N: ChainNetwork>(
    network: &N,
    tx: &TxSettings,
    to: Address,
    data: Bytes,
    what: &str,
) -> Result<TxReceipt> {
    let tx_hash = network
        .send_transaction(tx.call(to, data))
        .await
        .with_context(|| format!("Failed to send {} transaction", what))?;

    let receipt = network
        .wait_for_receipt(tx_hash)
        .await
        .with_context(|| format!("Failed to confirm {} transaction", what))?;

    receipt.ensure_success(what)?;
    Ok(receipt)
}

/// [`ChainNetwork`] over an Ethereum JSON-RPC HTTP endpoint.
#[derive(Debug, Clone)]
pub struct RpcNetwork {
    client: reqwest::Client,
    url: Url,
    receipt_timeout: Duration,
    poll_interval: Duration,
}

impl RpcNetwork {
    pub fn new(url: Url) -> Result<Self> {
        Ok(Self {
            client: rpc::create_client()?,
            url,
            receipt_timeout: Duration::from_secs(DEFAULT_RECEIPT_TIMEOUT_SECS),
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
        })
    }

    pub fn with_receipt_timeout(mut self, timeout: Duration) -> Self {
        self.receipt_timeout = timeout;
        self
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn url(&self) -> &Url {
        &self.url
    }
}

impl ChainNetwork for RpcNetwork {
    async fn chain_id(&self) -> Result<u64> {
        let chain_id: String =
            rpc::json_rpc_call(&self.client, self.url.as_str(), "eth_chainId", vec![]).await?;
        rpc::parse_quantity(&chain_id)
    }

    async fn accounts(&self) -> Result<Vec<Address>> {
        rpc::json_rpc_call(&self.client, self.url.as_str(), "eth_accounts", vec![]).await
    }

    async fn send_transaction(&self, tx: TxRequest) -> Result<B256> {
        let params = vec![serde_json::to_value(&tx).context("Failed to serialize transaction")?];
        rpc::json_rpc_call(
            &self.client,
            self.url.as_str(),
            "eth_sendTransaction",
            params,
        )
        .await
    }

    async fn wait_for_receipt(&self, tx_hash: B256) -> Result<TxReceipt> {
        let name = format!("receipt of {}", tx_hash);

        rpc::poll_until(&name, self.receipt_timeout, self.poll_interval, || async {
            rpc::json_rpc_call::<Option<TxReceipt>>(
                &self.client,
                self.url.as_str(),
                "eth_getTransactionReceipt",
                vec![serde_json::json!(tx_hash)],
            )
            .await
        })
        .await
    }

    async fn call(&self, to: Address, data: Bytes) -> Result<Bytes> {
        rpc::json_rpc_call(
            &self.client,
            self.url.as_str(),
            "eth_call",
            vec![
                serde_json::json!({ "to": to, "data": data }),
                serde_json::json!("latest"),
            ],
        )
        .await
    }
}
