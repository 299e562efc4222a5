//! # dApp Configuration
//!
//! Contract address and target network, fixed at build time. Defaults point at
//! the greeter contract on Oasis Sapphire Testnet; each value can be overridden
//! through a build-time environment variable:
//!
//! | Variable | Field |
//! |---|---|
//! | `DAPP_CONTRACT_ADDRESS` | [`DappConfig::contract_address`] |
//! | `DAPP_CHAIN_ID` | [`NetworkConfig::chain_id`] (decimal) |
//! | `DAPP_CHAIN_NAME` | [`NetworkConfig::chain_name`] |
//! | `DAPP_RPC_URL` | [`NetworkConfig::rpc_url`] |
//! | `DAPP_EXPLORER_URL` | [`NetworkConfig::explorer_url`] |
//!
//! ```rust,no_run
//! use lib_core::config::DappConfig;
//!
//! let config = DappConfig::from_build_env().expect("invalid build configuration");
//! let descriptor = config.network.descriptor();
//! assert_eq!(descriptor.chain_id, "0x5aff");
//! ```
//!
//! The configuration is passed explicitly to the session; there is no global instance.

use crate::error::ConfigError;
use shared::dto::chain::{AddEthereumChainParameter, NativeCurrency};
use shared::utils::to_hex_quantity;

pub const DEFAULT_CONTRACT_ADDRESS: &str = "0x6eED2f58ed21a651CCc42Af123E243FaBad920E0";
pub const SAPPHIRE_TESTNET_CHAIN_ID: u64 = 23295;

/// Target network, as described to the wallet when it has to add it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NetworkConfig {
    pub chain_id: u64,
    pub chain_name: String,
    pub currency_name: String,
    pub currency_symbol: String,
    pub currency_decimals: u8,
    pub rpc_url: String,
    pub explorer_url: String,
}

impl NetworkConfig {
    pub fn sapphire_testnet() -> Self {
        Self {
            chain_id: SAPPHIRE_TESTNET_CHAIN_ID,
            chain_name: "Oasis Sapphire Testnet".to_string(),
            currency_name: "SROSE".to_string(),
            currency_symbol: "SROSE".to_string(),
            currency_decimals: 18,
            rpc_url: "https://testnet.sapphire.oasis.dev".to_string(),
            explorer_url: "https://testnet.explorer.sapphire.oasis.dev/".to_string(),
        }
    }

    /// EIP-3085 descriptor. The hex chain id is derived from [`Self::chain_id`].
    pub fn descriptor(&self) -> AddEthereumChainParameter {
        AddEthereumChainParameter {
            chain_id: to_hex_quantity(self.chain_id),
            chain_name: self.chain_name.clone(),
            native_currency: NativeCurrency {
                name: self.currency_name.clone(),
                symbol: self.currency_symbol.clone(),
                decimals: self.currency_decimals,
            },
            rpc_urls: vec![self.rpc_url.clone()],
            block_explorer_urls: vec![self.explorer_url.clone()],
        }
    }
}

/// Everything the session needs to know about its deployment.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DappConfig {
    /// Greeter contract address (checksummed or lowercase)
    pub contract_address: String,
    pub network: NetworkConfig,
}

impl Default for DappConfig {
    fn default() -> Self {
        Self {
            contract_address: DEFAULT_CONTRACT_ADDRESS.to_string(),
            network: NetworkConfig::sapphire_testnet(),
        }
    }
}

impl DappConfig {
    /// Defaults overlaid with the `DAPP_*` variables present at compile time, then validated.
    pub fn from_build_env() -> Result<Self, ConfigError> {
        let config = Self::from_overrides(|key| match key {
            "DAPP_CONTRACT_ADDRESS" => option_env!("DAPP_CONTRACT_ADDRESS"),
            "DAPP_CHAIN_ID" => option_env!("DAPP_CHAIN_ID"),
            "DAPP_CHAIN_NAME" => option_env!("DAPP_CHAIN_NAME"),
            "DAPP_RPC_URL" => option_env!("DAPP_RPC_URL"),
            "DAPP_EXPLORER_URL" => option_env!("DAPP_EXPLORER_URL"),
            _ => None,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Defaults overlaid with whatever `lookup` returns for each `DAPP_*` key.
    pub fn from_overrides<'a, F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<&'a str>,
    {
        let mut config = Self::default();

        if let Some(address) = lookup("DAPP_CONTRACT_ADDRESS") {
            config.contract_address = address.trim().to_string();
        }
        if let Some(chain_id) = lookup("DAPP_CHAIN_ID") {
            config.network.chain_id = chain_id
                .trim()
                .parse()
                .map_err(|e| ConfigError(format!("DAPP_CHAIN_ID must be a decimal number: {}", e)))?;
        }
        if let Some(name) = lookup("DAPP_CHAIN_NAME") {
            config.network.chain_name = name.trim().to_string();
        }
        if let Some(url) = lookup("DAPP_RPC_URL") {
            config.network.rpc_url = url.trim().to_string();
        }
        if let Some(url) = lookup("DAPP_EXPLORER_URL") {
            config.network.explorer_url = url.trim().to_string();
        }

        Ok(config)
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let digits = self
            .contract_address
            .strip_prefix("0x")
            .ok_or_else(|| ConfigError("contract address must start with 0x".to_string()))?;
        if digits.len() != 40 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ConfigError(format!(
                "contract address must be 20 bytes of hex, got {}",
                self.contract_address
            )));
        }

        if self.network.chain_id == 0 {
            return Err(ConfigError("chain id must be non-zero".to_string()));
        }
        if self.network.chain_name.is_empty() {
            return Err(ConfigError("chain name must not be empty".to_string()));
        }
        if self.network.currency_decimals > 36 {
            return Err(ConfigError("native currency decimals must be at most 36".to_string()));
        }

        for (label, url) in [("RPC", &self.network.rpc_url), ("explorer", &self.network.explorer_url)] {
            if !(url.starts_with("https://") || url.starts_with("http://")) {
                return Err(ConfigError(format!("{} URL must be http(s): {}", label, url)));
            }
        }

        Ok(())
    }

    pub fn target_chain_id(&self) -> u64 {
        self.network.chain_id
    }
}
