//! Core value types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Numeric chain id, decoded from the provider's hex form.
pub type ChainId = u64;

/// An account address, lowercase-normalized on construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Address(String);

impl Address {
    pub fn new(raw: impl AsRef<str>) -> Self {
        Self(raw.as_ref().trim().to_ascii_lowercase())
    }

    /// First element of a provider account list, if any.
    pub fn first_of(accounts: &[String]) -> Option<Self> {
        accounts.first().map(Address::new)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `0x1234...abcd` display form.
    pub fn short(&self) -> String {
        shared::utils::truncate_address(&self.0)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Address {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
