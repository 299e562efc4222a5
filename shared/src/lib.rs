//! # Shared Wire Types
//!
//! Types exchanged between the dApp core (`lib-core`) and the browser frontend
//! (`wallet-web`), and the JSON shapes both sides send to an injected EIP-1193
//! wallet provider.
//!
//! ## Structure
//!
//! - **[`dto`]**: provider request/response shapes
//!   - **[`dto::chain`]**: EIP-3085 / EIP-3326 network descriptors
//!   - **[`dto::rpc`]**: `eth_call` request and the EIP-1193 error object
//! - **[`utils`]**: address display and hex-quantity helpers
//!
//! ## Wire Format
//!
//! Wallet providers speak camelCase JSON, so every DTO here uses
//! `#[serde(rename_all = "camelCase")]`:
//!
//! ```rust
//! use shared::dto::chain::SwitchEthereumChainParameter;
//!
//! let param = SwitchEthereumChainParameter { chain_id: "0x5aff".to_string() };
//! assert_eq!(serde_json::to_string(&param).unwrap(), r#"{"chainId":"0x5aff"}"#);
//! ```

pub mod dto;
pub mod utils;

pub use dto::*;
pub use utils::*;
