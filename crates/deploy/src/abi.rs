//! Minimal Solidity ABI encoding for the calls issued by this crate.
//!
//! Only static head words are supported (`address`, `uint256`, `bytes32`), which
//! covers constructors, role grants and the vault entry points.

use alloy_core::primitives::{Address, B256, Bytes, U256, keccak256};
use anyhow::Context;

/// Size of an ABI word in bytes.
pub const WORD_SIZE: usize = 32;

/// A statically-sized ABI value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token {
    Address(Address),
    Uint(U256),
    FixedBytes(B256),
}

impl Token {
    /// Encode this value as a single left-padded 32-byte word.
    pub fn to_word(&self) -> B256 {
        match self {
            Token::Address(address) => address.into_word(),
            Token::Uint(value) => B256::from(value.to_be_bytes::<WORD_SIZE>()),
            Token::FixedBytes(bytes) => *bytes,
        }
    }
}

/// Compute the 4-byte selector of a canonical function signature,
/// e.g. `grantRole(bytes32,address)`.
pub fn selector(signature: &str) -> [u8; 4] {
    let hash = keccak256(signature.as_bytes());
    [hash[0], hash[1], hash[2], hash[3]]
}

/// ABI-encode a list of static tokens (no selector).
pub fn encode(tokens: &[Token]) -> Vec<u8> {
    tokens
        .iter()
        .flat_map(|token| token.to_word().0)
        .collect()
}

/// ABI-encode a function call: selector followed by the encoded arguments.
pub fn encode_call(signature: &str, tokens: &[Token]) -> Bytes {
    let mut data = Vec::with_capacity(4 + tokens.len() * WORD_SIZE);
    data.extend_from_slice(&selector(signature));
    data.extend_from_slice(&encode(tokens));
    Bytes::from(data)
}

/// Build contract creation code: the creation bytecode followed by the
/// encoded constructor arguments.
pub fn encode_constructor(bytecode: &[u8], args: &[Token]) -> Bytes {
    let mut data = bytecode.to_vec();
    data.extend_from_slice(&encode(args));
    Bytes::from(data)
}

/// Read the word at `index` of ABI-encoded return data.
pub fn word_at(data: &[u8], index: usize) -> anyhow::Result<B256> {
    let start = index * WORD_SIZE;
    let word = data.get(start..start + WORD_SIZE).with_context(|| {
        format!(
            "Return data too short: need word {} but got {} bytes",
            index,
            data.len()
        )
    })?;
    Ok(B256::from_slice(word))
}

/// Decode the `uint256` at word `index` of ABI-encoded return data.
pub fn decode_uint(data: &[u8], index: usize) -> anyhow::Result<U256> {
    Ok(U256::from_be_bytes(word_at(data, index)?.0))
}

/// Decode the `address` at word `index` of ABI-encoded data.
pub fn decode_address(data: &[u8], index: usize) -> anyhow::Result<Address> {
    let word = word_at(data, index)?;
    if word[..12].iter().any(|b| *b != 0) {
        anyhow::bail!("Word {} is not a left-padded address: {}", index, word);
    }
    Ok(Address::from_word(word))
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_core::primitives::address;

    #[test]
    fn test_selectors() {
        assert_eq!(hex::encode(selector("grantRole(bytes32,address)")), "2f2ff15d");
        assert_eq!(hex::encode(selector("deposit(uint256)")), "b6b55f25");
        assert_eq!(hex::encode(selector("withdraw(uint256)")), "2e1a7d4d");
        assert_eq!(hex::encode(selector("getBalance(address)")), "f8b2cb4f");
    }

    #[test]
    fn test_encode_call_layout() {
        let account = address!("70997970C51812dc3A010C7d01b50e0d17dc79C8");
        let calldata = encode_call(
            "deposit(uint256)",
            &[Token::Uint(U256::from(1_000_000_000_000_000_000u128))],
        );
        assert_eq!(calldata.len(), 4 + WORD_SIZE);
        assert_eq!(
            hex::encode(&calldata[4..]),
            "0000000000000000000000000000000000000000000000000de0b6b3a7640000"
        );

        let calldata = encode_call("getBalance(address)", &[Token::Address(account)]);
        assert_eq!(
            hex::encode(&calldata[4..]),
            "00000000000000000000000070997970c51812dc3a010c7d01b50e0d17dc79c8"
        );
    }

    #[test]
    fn test_encode_constructor_appends_args() {
        let vesting = address!("5FbDB2315678afecb367f032d93F642f64180aa3");
        let code = encode_constructor(&[0x60, 0x80, 0x60, 0x40], &[Token::Address(vesting)]);

        assert_eq!(&code[..4], &[0x60, 0x80, 0x60, 0x40]);
        assert_eq!(code.len(), 4 + WORD_SIZE);
        assert_eq!(decode_address(&code[4..], 0).unwrap(), vesting);
    }

    #[test]
    fn test_encode_constructor_without_args_is_bytecode() {
        let code = encode_constructor(&[0xde, 0xad], &[]);
        assert_eq!(code.as_ref(), &[0xde, 0xad]);
    }

    #[test]
    fn test_decode_short_data_fails() {
        let data = [0u8; 40];
        assert!(decode_uint(&data, 0).is_ok());
        assert!(decode_uint(&data, 1).is_err());
    }

    #[test]
    fn test_decode_address_rejects_dirty_padding() {
        let mut word = [0u8; WORD_SIZE];
        word[0] = 1;
        assert!(decode_address(&word, 0).is_err());
    }
}
