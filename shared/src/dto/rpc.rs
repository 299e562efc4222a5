//! `eth_call` parameters and the EIP-1193 provider error object.

use serde::{Deserialize, Serialize};
use std::fmt;

/// User rejected the request.
pub const USER_REJECTED_REQUEST: i64 = 4001;
/// The requested method or account has not been authorized by the user.
pub const UNAUTHORIZED: i64 = 4100;
/// The provider does not know the requested chain; it has to be added first.
pub const UNRECOGNIZED_CHAIN: i64 = 4902;
/// A request of the same kind is already waiting for the user.
pub const REQUEST_ALREADY_PENDING: i64 = -32002;

/// Read-only call object for `eth_call`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallRequest {
    /// Contract address.
    pub to: String,
    /// `0x`-prefixed ABI-encoded calldata.
    pub data: String,
}

/// Error object a provider rejects a request with.
///
/// Providers are loose about the shape, so everything except `message` is optional
/// on the way in; a missing code becomes `0`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderRpcError {
    #[serde(default)]
    pub code: i64,
    #[serde(default)]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl ProviderRpcError {
    pub fn new(code: i64, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            data: None,
        }
    }

    /// The user declined the prompt.
    pub fn is_user_rejection(&self) -> bool {
        self.code == USER_REJECTED_REQUEST
    }

    /// The chain must be added with `wallet_addEthereumChain` before switching to it.
    pub fn is_unrecognized_chain(&self) -> bool {
        self.code == UNRECOGNIZED_CHAIN
    }
}

impl fmt::Display for ProviderRpcError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.message.is_empty() {
            write!(f, "provider error {}", self.code)
        } else {
            write!(f, "{}", self.message)
        }
    }
}

impl std::error::Error for ProviderRpcError {}
