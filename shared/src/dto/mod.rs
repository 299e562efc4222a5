//! # Provider Data Transfer Objects
//!
//! Parameters and error payloads of the EIP-1193 methods the dApp calls:
//!
//! | Method | Params |
//! |---|---|
//! | `eth_requestAccounts` / `eth_accounts` / `eth_chainId` | none |
//! | `wallet_switchEthereumChain` | [`chain::SwitchEthereumChainParameter`] |
//! | `wallet_addEthereumChain` | [`chain::AddEthereumChainParameter`] |
//! | `eth_call` | [`rpc::CallRequest`], block tag |
//!
//! Any of them may reject with a [`rpc::ProviderRpcError`].

pub mod chain;
pub mod rpc;

pub use chain::*;
pub use rpc::*;
