//! Contract build artifacts.
//!
//! Both Truffle (`"bytecode": "0x..."`) and Foundry
//! (`"bytecode": { "object": "0x..." }`) JSON artifacts are accepted.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use alloy_core::primitives::{Address, Bytes};
use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::Value;

use crate::abi::{self, Token};

/// Compiled contract: name, ABI and creation bytecode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractArtifact {
    /// Name of the contract.
    pub contract_name: String,
    /// The contract ABI, kept opaque.
    pub abi: Value,
    /// Creation bytecode.
    pub bytecode: Bytes,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawBytecode {
    Hex(String),
    Object { object: String },
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawArtifact {
    contract_name: Option<String>,
    #[serde(default)]
    abi: Value,
    bytecode: RawBytecode,
}

/// Locations probed for the artifact of `contract_name`, in order:
/// `<dir>/<Name>.json` (Truffle) then `<dir>/<Name>.sol/<Name>.json` (Foundry).
pub fn artifact_candidates(dir: &Path, contract_name: &str) -> [PathBuf; 2] {
    let file = format!("{}.json", contract_name);
    [
        dir.join(&file),
        dir.join(format!("{}.sol", contract_name)).join(&file),
    ]
}

/// Path of the artifact for `contract_name` inside `dir`.
pub fn artifact_path(dir: &Path, contract_name: &str) -> Result<PathBuf> {
    let [truffle, foundry] = artifact_candidates(dir, contract_name);

    [&truffle, &foundry]
        .into_iter()
        .find(|path| path.is_file())
        .cloned()
        .with_context(|| {
            format!(
                "No artifact for {} (looked for {} and {})",
                contract_name,
                truffle.display(),
                foundry.display()
            )
        })
}

impl ContractArtifact {
    /// Parse an artifact from its JSON content.
    ///
    /// `fallback_name` is used when the artifact does not carry a `contractName`.
    pub fn from_json(content: &str, fallback_name: &str) -> Result<Self> {
        let raw: RawArtifact =
            serde_json::from_str(content).context("Failed to parse contract artifact JSON")?;

        let contract_name = raw
            .contract_name
            .unwrap_or_else(|| fallback_name.to_string());

        let bytecode_hex = match raw.bytecode {
            RawBytecode::Hex(hex) => hex,
            RawBytecode::Object { object } => object,
        };

        if bytecode_hex.contains("__") {
            anyhow::bail!(
                "Bytecode of {} contains unlinked library placeholders",
                contract_name
            );
        }

        let bytecode = Bytes::from_str(&bytecode_hex)
            .with_context(|| format!("Invalid bytecode hex in artifact of {}", contract_name))?;

        if bytecode.is_empty() {
            anyhow::bail!(
                "Artifact of {} has no bytecode (abstract contract or interface?)",
                contract_name
            );
        }

        Ok(Self {
            contract_name,
            abi: raw.abi,
            bytecode,
        })
    }

    /// Load the artifact of `contract_name` from the artifacts directory.
    pub fn load(dir: &Path, contract_name: &str) -> Result<Self> {
        let path = artifact_path(dir, contract_name)?;
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read artifact {}", path.display()))?;

        let artifact = Self::from_json(&content, contract_name)
            .with_context(|| format!("Invalid artifact {}", path.display()))?;

        tracing::debug!(
            contract = %artifact.contract_name,
            path = %path.display(),
            bytecode_len = artifact.bytecode.len(),
            "Artifact loaded"
        );

        Ok(artifact)
    }
}

/// A contract to deploy together with its constructor arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentTarget {
    pub artifact: ContractArtifact,
    pub constructor_args: Vec<Address>,
}

impl DeploymentTarget {
    pub fn new(artifact: ContractArtifact, constructor_args: Vec<Address>) -> Self {
        Self {
            artifact,
            constructor_args,
        }
    }

    pub fn name(&self) -> &str {
        &self.artifact.contract_name
    }

    /// Creation bytecode followed by the ABI-encoded constructor arguments.
    pub fn creation_code(&self) -> Bytes {
        let args: Vec<Token> = self
            .constructor_args
            .iter()
            .copied()
            .map(Token::Address)
            .collect();
        abi::encode_constructor(&self.artifact.bytecode, &args)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_core::primitives::address;
    use tempdir::TempDir;

    #[test]
    fn test_parse_truffle_artifact() {
        let json = r#"{
            "contractName": "Vesting",
            "abi": [{"type": "constructor", "inputs": []}],
            "bytecode": "0x6080604052"
        }"#;

        let artifact = ContractArtifact::from_json(json, "ignored").unwrap();
        assert_eq!(artifact.contract_name, "Vesting");
        assert_eq!(artifact.bytecode.as_ref(), &[0x60, 0x80, 0x60, 0x40, 0x52]);
        assert!(artifact.abi.is_array());
    }

    #[test]
    fn test_parse_foundry_artifact() {
        let json = r#"{
            "abi": [],
            "bytecode": { "object": "0x6080", "linkReferences": {} }
        }"#;

        let artifact = ContractArtifact::from_json(json, "Vault").unwrap();
        assert_eq!(artifact.contract_name, "Vault");
        assert_eq!(artifact.bytecode.as_ref(), &[0x60, 0x80]);
    }

    #[test]
    fn test_empty_bytecode_is_rejected() {
        let json = r#"{ "contractName": "IVault", "abi": [], "bytecode": "0x" }"#;
        let err = ContractArtifact::from_json(json, "IVault").unwrap_err();
        assert!(err.to_string().contains("has no bytecode"));
    }

    #[test]
    fn test_unlinked_bytecode_is_rejected() {
        let json = r#"{ "abi": [], "bytecode": "0x6080__$abcdef$__6080" }"#;
        let err = ContractArtifact::from_json(json, "Vault").unwrap_err();
        assert!(err.to_string().contains("unlinked library"));
    }

    #[test]
    fn test_load_missing_artifact() {
        let dir = TempDir::new("vestvault-artifacts").unwrap();
        let err = ContractArtifact::load(dir.path(), "Vesting").unwrap_err();
        assert!(err.to_string().contains("Vesting.json"));
    }

    #[test]
    fn test_load_from_directory() {
        let dir = TempDir::new("vestvault-artifacts").unwrap();
        std::fs::write(
            dir.path().join("Vault.json"),
            r#"{ "contractName": "Vault", "abi": [], "bytecode": "0x60016002" }"#,
        )
        .unwrap();

        let artifact = ContractArtifact::load(dir.path(), "Vault").unwrap();
        assert_eq!(artifact.contract_name, "Vault");
    }

    #[test]
    fn test_load_from_foundry_out_directory() {
        let dir = TempDir::new("vestvault-artifacts").unwrap();
        let contract_dir = dir.path().join("Vesting.sol");
        std::fs::create_dir_all(&contract_dir).unwrap();
        std::fs::write(
            contract_dir.join("Vesting.json"),
            r#"{ "abi": [], "bytecode": { "object": "0x6080", "linkReferences": {} } }"#,
        )
        .unwrap();

        assert_eq!(
            artifact_path(dir.path(), "Vesting").unwrap(),
            contract_dir.join("Vesting.json")
        );

        let artifact = ContractArtifact::load(dir.path(), "Vesting").unwrap();
        assert_eq!(artifact.contract_name, "Vesting");
        assert_eq!(artifact.bytecode.as_ref(), &[0x60, 0x80]);
    }

    #[test]
    fn test_truffle_layout_takes_precedence() {
        let dir = TempDir::new("vestvault-artifacts").unwrap();
        std::fs::create_dir_all(dir.path().join("Vault.sol")).unwrap();
        std::fs::write(dir.path().join("Vault.sol").join("Vault.json"), "{}").unwrap();
        std::fs::write(dir.path().join("Vault.json"), "{}").unwrap();

        assert_eq!(
            artifact_path(dir.path(), "Vault").unwrap(),
            dir.path().join("Vault.json")
        );
    }

    #[test]
    fn test_creation_code_appends_constructor_args() {
        let artifact = ContractArtifact {
            contract_name: "Vault".to_string(),
            abi: Value::Null,
            bytecode: Bytes::from_static(&[0x60, 0x02]),
        };
        let vesting = address!("5FbDB2315678afecb367f032d93F642f64180aa3");
        let target = DeploymentTarget::new(artifact, vec![vesting]);

        let code = target.creation_code();
        assert_eq!(&code[..2], &[0x60, 0x02]);
        assert_eq!(abi::decode_address(&code[2..], 0).unwrap(), vesting);
    }
}
