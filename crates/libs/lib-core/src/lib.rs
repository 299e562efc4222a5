//! # Core Library
//!
//! Wallet connection and chain-gated contract reads for the greeter dApp,
//! independent of any UI framework.
//!
//! - [`connection`] / [`chain`] own the account and the chain id
//! - [`readiness`] derives "connected to the target network" from both
//! - [`reader`] reads the contract on every readiness window
//! - [`error_channel`] keeps the last failure for display
//! - [`session`] wires all of the above behind one handle
//!
//! The browser provider and the task spawner are injected through the
//! [`provider::ProviderGateway`] and [`runtime::TaskSpawner`] traits.

pub mod abi;
pub mod chain;
pub mod config;
pub mod connection;
pub mod contract;
pub mod error;
pub mod error_channel;
pub mod notify;
pub mod provider;
pub mod readiness;
pub mod reader;
pub mod runtime;
pub mod session;
pub mod types;

#[cfg(test)]
mod mock;

// Re-export commonly used types
pub use config::{DappConfig, NetworkConfig};
pub use error::{OperationError, OperationKind, Result, WalletError};
pub use provider::{EventHandler, EventKind, ProviderEvent, ProviderGateway, Subscription};
pub use reader::ReadResult;
pub use runtime::TaskSpawner;
pub use session::{DappSession, SessionSnapshot};
pub use types::{Address, ChainId};
