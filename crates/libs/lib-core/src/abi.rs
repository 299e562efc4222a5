//! Minimal Solidity ABI support for argument-less view calls returning `string`.

use sha3::{Digest, Keccak256};
use thiserror::Error;

const WORD: usize = 32;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AbiError {
    #[error("return data is not hex: {0}")]
    InvalidHex(String),

    #[error("empty return data (no contract at this address on the current network?)")]
    Empty,

    #[error("return data too short for {0}")]
    OutOfBounds(&'static str),

    #[error("returned string is not valid UTF-8")]
    InvalidUtf8,
}

/// First four bytes of the keccak-256 hash of `signature`, e.g. `greeting()`.
pub fn selector(signature: &str) -> [u8; 4] {
    let hash = Keccak256::digest(signature.as_bytes());
    let mut selector = [0u8; 4];
    selector.copy_from_slice(&hash[..4]);
    selector
}

/// `0x`-prefixed calldata for a function that takes no arguments.
pub fn encode_call(signature: &str) -> String {
    format!("0x{}", hex::encode(selector(signature)))
}

/// Decode a single dynamic `string` return value.
pub fn decode_string(return_data: &str) -> Result<String, AbiError> {
    let digits = return_data
        .strip_prefix("0x")
        .unwrap_or(return_data);
    let bytes = hex::decode(digits).map_err(|e| AbiError::InvalidHex(e.to_string()))?;

    if bytes.is_empty() {
        return Err(AbiError::Empty);
    }

    let offset = read_word(&bytes, 0, "string offset")?;
    let length = read_word(&bytes, offset, "string length")?;

    let start = offset
        .checked_add(WORD)
        .ok_or(AbiError::OutOfBounds("string data"))?;
    let end = start
        .checked_add(length)
        .ok_or(AbiError::OutOfBounds("string data"))?;
    let payload = bytes
        .get(start..end)
        .ok_or(AbiError::OutOfBounds("string data"))?;

    String::from_utf8(payload.to_vec()).map_err(|_| AbiError::InvalidUtf8)
}

/// Big-endian word at `at`, which must fit in `usize`.
fn read_word(bytes: &[u8], at: usize, what: &'static str) -> Result<usize, AbiError> {
    let end = at.checked_add(WORD).ok_or(AbiError::OutOfBounds(what))?;
    let word = bytes.get(at..end).ok_or(AbiError::OutOfBounds(what))?;

    let (high, low) = word.split_at(WORD - 8);
    if high.iter().any(|b| *b != 0) {
        return Err(AbiError::OutOfBounds(what));
    }

    let mut buf = [0u8; 8];
    buf.copy_from_slice(low);
    usize::try_from(u64::from_be_bytes(buf)).map_err(|_| AbiError::OutOfBounds(what))
}
