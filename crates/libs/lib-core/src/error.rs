//! # Centralized Error Handling
//!
//! [`WalletError`] is the single error type returned by every dApp operation.
//! Failures are caught at the operation boundary, recorded in the
//! [`ErrorChannel`](crate::error_channel::ErrorChannel) as an [`OperationError`],
//! and returned to the caller. None of them is fatal: the session always comes
//! back to an interactive, retryable state.
//!
//! ## Error Categories
//!
//! 1. **Environment**
//!    - [`ProviderUnavailable`](WalletError::ProviderUnavailable) - no injected provider
//! 2. **User / provider refusals**
//!    - [`ConnectRejected`](WalletError::ConnectRejected)
//!    - [`ChainSwitchRejected`](WalletError::ChainSwitchRejected)
//!    - [`NoAccountsReturned`](WalletError::NoAccountsReturned)
//! 3. **Contract reads**
//!    - [`ReadFailed`](WalletError::ReadFailed) - call or decoding failure
//!    - [`NotReady`](WalletError::NotReady) - read requested while not connected to the target chain
//!
//! ## Usage Example
//!
//! ```rust
//! use lib_core::error::{OperationKind, WalletError};
//!
//! let err = WalletError::ChainSwitchRejected("User rejected the request.".to_string());
//! let recorded = err.to_operation_error(OperationKind::SwitchChain);
//! assert_eq!(recorded.message, "User rejected the request.");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Convenience type alias for `Result<T, WalletError>`.
pub type Result<T> = std::result::Result<T, WalletError>;

/// Every way a dApp operation can fail.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WalletError {
    /// No injected wallet provider was detected.
    #[error("No wallet provider available")]
    ProviderUnavailable,

    /// The provider authorized the request but returned an empty account list.
    #[error("Provider returned no accounts")]
    NoAccountsReturned,

    /// The user declined the connection prompt or the provider refused it.
    #[error("Connection rejected: {0}")]
    ConnectRejected(String),

    /// The user declined the network switch or the provider refused it.
    #[error("Network switch rejected: {0}")]
    ChainSwitchRejected(String),

    /// The contract call or the decoding of its result failed.
    #[error("Failed to read greeting: {0}")]
    ReadFailed(String),

    /// A read was requested while no account is connected to the target chain.
    #[error("Not connected to the target network")]
    NotReady,
}

impl WalletError {
    /// Message shown to the user.
    pub fn user_message(&self) -> String {
        match self {
            WalletError::ProviderUnavailable => {
                "No injected wallet provider found. Install or enable a browser wallet to continue."
                    .to_string()
            }
            WalletError::NoAccountsReturned => {
                "The wallet did not return any account. Unlock it and try again.".to_string()
            }
            WalletError::ConnectRejected(msg) | WalletError::ChainSwitchRejected(msg) => msg.clone(),
            WalletError::ReadFailed(_) | WalletError::NotReady => self.to_string(),
        }
    }

    /// Record form of this error, attributed to `source`.
    pub fn to_operation_error(&self, source: OperationKind) -> OperationError {
        OperationError {
            source,
            message: self.user_message(),
        }
    }
}

/// The operations that own a slot lifecycle in the error channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OperationKind {
    Connect,
    SwitchChain,
    Read,
}

impl OperationKind {
    pub const ALL: [OperationKind; 3] = [
        OperationKind::Connect,
        OperationKind::SwitchChain,
        OperationKind::Read,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            OperationKind::Connect => "connect",
            OperationKind::SwitchChain => "switchChain",
            OperationKind::Read => "read",
        }
    }

    pub(crate) fn index(&self) -> usize {
        match self {
            OperationKind::Connect => 0,
            OperationKind::SwitchChain => 1,
            OperationKind::Read => 2,
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The last failure, as surfaced to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationError {
    pub source: OperationKind,
    pub message: String,
}

/// Invalid build-time configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Configuration error: {0}")]
pub struct ConfigError(pub String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejections_surface_provider_message() {
        let err = WalletError::ConnectRejected("User rejected the request.".to_string());
        assert_eq!(err.user_message(), "User rejected the request.");
        assert_eq!(err.to_string(), "Connection rejected: User rejected the request.");
    }

    #[test]
    fn test_read_failure_message() {
        let err = WalletError::ReadFailed("execution reverted".to_string());
        let recorded = err.to_operation_error(OperationKind::Read);
        assert_eq!(recorded.source, OperationKind::Read);
        assert_eq!(recorded.message, "Failed to read greeting: execution reverted");
    }

    #[test]
    fn test_operation_kind_names() {
        let names: Vec<&str> = OperationKind::ALL.iter().map(|k| k.name()).collect();
        assert_eq!(names, vec!["connect", "switchChain", "read"]);
        assert_eq!(OperationKind::SwitchChain.to_string(), "switchChain");
        for (i, kind) in OperationKind::ALL.iter().enumerate() {
            assert_eq!(kind.index(), i);
        }
    }
}
