//! Shared RPC utilities for interacting with Ethereum JSON-RPC endpoints.

use std::time::{Duration, Instant};

use anyhow::Context;
use serde::{Deserialize, Serializer, de::DeserializeOwned};
use serde_json::Value;

/// Default timeout for a single RPC request.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Create an HTTP client configured for JSON-RPC requests.
pub fn create_client() -> Result<reqwest::Client, anyhow::Error> {
    reqwest::Client::builder()
        .timeout(DEFAULT_TIMEOUT)
        .build()
        .context("Failed to create HTTP client")
}

/// Make a JSON-RPC call and deserialize the result.
///
/// # Arguments
/// * `client` - The HTTP client to use
/// * `url` - The RPC endpoint URL
/// * `method` - The RPC method name
/// * `params` - The method parameters
///
/// # Returns
/// The deserialized result, or an error if the request failed or returned an error response.
pub async fn json_rpc_call<T: DeserializeOwned>(
    client: &reqwest::Client,
    url: &str,
    method: &str,
    params: Vec<Value>,
) -> Result<T, anyhow::Error> {
    let response = client
        .post(url)
        .json(&serde_json::json!({
            "jsonrpc": "2.0",
            "method": method,
            "params": params,
            "id": 1
        }))
        .send()
        .await
        .with_context(|| format!("Failed to send {} request", method))?;

    let result: Value = response
        .json()
        .await
        .with_context(|| format!("Failed to parse {} response", method))?;

    if let Some(error) = result.get("error") {
        anyhow::bail!(
            "RPC error from {}: {}",
            method,
            error
                .get("message")
                .and_then(|m| m.as_str())
                .unwrap_or("unknown")
        );
    }

    let result_value = result
        .get("result")
        .context("No result in response")?
        .clone();

    serde_json::from_value(result_value)
        .with_context(|| format!("Failed to deserialize {} result", method))
}

/// Poll `check_fn` until it yields a value.
///
/// `Ok(None)` means "not there yet" and schedules another attempt after
/// `poll_interval`. An `Err` from `check_fn` aborts the wait immediately.
///
/// # Arguments
/// * `name` - Name of the awaited item (for error messages)
/// * `timeout` - Maximum time to wait
/// * `poll_interval` - Delay between two attempts
/// * `check_fn` - Function returning `Ok(Some(_))` once the item is available
pub async fn poll_until<T, F, Fut>(
    name: &str,
    timeout: Duration,
    poll_interval: Duration,
    check_fn: F,
) -> Result<T, anyhow::Error>
where
    F: Fn() -> Fut,
    Fut: std::future::Future<Output = Result<Option<T>, anyhow::Error>>,
{
    let start = Instant::now();

    loop {
        if let Some(value) = check_fn().await? {
            return Ok(value);
        }

        if start.elapsed() > timeout {
            anyhow::bail!(
                "Timeout waiting for {} after {} seconds",
                name,
                timeout.as_secs()
            );
        }

        tracing::trace!(item = %name, "Not available yet, polling again...");
        tokio::time::sleep(poll_interval).await;
    }
}

/// Parse a hex quantity (with 0x prefix) as returned by the node.
pub fn parse_quantity(s: &str) -> Result<u64, anyhow::Error> {
    let digits = s
        .strip_prefix("0x")
        .with_context(|| format!("Quantity is not 0x-prefixed: '{}'", s))?;
    u64::from_str_radix(digits, 16).with_context(|| format!("Invalid hex quantity: '{}'", s))
}

/// Deserialize an optional u64 from a hex string (with 0x prefix).
pub fn deserialize_opt_u64_from_hex<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: Option<String> = Deserialize::deserialize(deserializer)?;
    s.map(|s| u64::from_str_radix(s.trim_start_matches("0x"), 16))
        .transpose()
        .map_err(serde::de::Error::custom)
}

/// Serialize an optional u64 as a hex quantity.
pub fn serialize_opt_quantity<S>(value: &Option<u64>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match value {
        Some(v) => serializer.serialize_str(&format!("0x{:x}", v)),
        None => serializer.serialize_none(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_quantity() {
        assert_eq!(parse_quantity("0x0").unwrap(), 0);
        assert_eq!(parse_quantity("0x539").unwrap(), 1337);
        assert_eq!(parse_quantity("0x7a69").unwrap(), 31337);
        assert!(parse_quantity("539").is_err());
        assert!(parse_quantity("0xzz").is_err());
    }

    #[tokio::test]
    async fn test_poll_until_returns_first_value() {
        let attempts = std::sync::atomic::AtomicUsize::new(0);

        let value = poll_until(
            "counter",
            Duration::from_secs(5),
            Duration::from_millis(1),
            || {
                let n = attempts.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
                async move { Ok(if n >= 2 { Some(n) } else { None }) }
            },
        )
        .await
        .unwrap();

        assert_eq!(value, 2);
    }

    #[tokio::test]
    async fn test_poll_until_propagates_errors() {
        let result: Result<(), _> = poll_until(
            "broken",
            Duration::from_secs(5),
            Duration::from_millis(1),
            || async { anyhow::bail!("node went away") },
        )
        .await;

        assert!(result.unwrap_err().to_string().contains("node went away"));
    }

    #[tokio::test]
    async fn test_poll_until_times_out() {
        let result: Result<(), _> = poll_until(
            "never",
            Duration::from_millis(5),
            Duration::from_millis(1),
            || async { Ok(None) },
        )
        .await;

        assert!(result.unwrap_err().to_string().contains("Timeout waiting for never"));
    }
}
