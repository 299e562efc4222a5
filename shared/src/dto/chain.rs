//! Network descriptors for `wallet_addEthereumChain` (EIP-3085) and
//! `wallet_switchEthereumChain` (EIP-3326).

use serde::{Deserialize, Serialize};

/// Native currency block of an EIP-3085 descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NativeCurrency {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
}

/// Full network descriptor handed to the provider when the target chain has to be added.
///
/// `chain_id` is the `0x`-prefixed hexadecimal chain id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddEthereumChainParameter {
    pub chain_id: String,
    pub chain_name: String,
    pub native_currency: NativeCurrency,
    pub rpc_urls: Vec<String>,
    pub block_explorer_urls: Vec<String>,
}

impl AddEthereumChainParameter {
    /// The switch-only form of this descriptor.
    pub fn switch_parameter(&self) -> SwitchEthereumChainParameter {
        SwitchEthereumChainParameter {
            chain_id: self.chain_id.clone(),
        }
    }
}

/// Parameter of `wallet_switchEthereumChain`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwitchEthereumChainParameter {
    pub chain_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sapphire() -> AddEthereumChainParameter {
        AddEthereumChainParameter {
            chain_id: "0x5aff".to_string(),
            chain_name: "Oasis Sapphire Testnet".to_string(),
            native_currency: NativeCurrency {
                name: "SROSE".to_string(),
                symbol: "SROSE".to_string(),
                decimals: 18,
            },
            rpc_urls: vec!["https://testnet.sapphire.oasis.dev".to_string()],
            block_explorer_urls: vec!["https://testnet.explorer.sapphire.oasis.dev/".to_string()],
        }
    }

    #[test]
    fn test_descriptor_uses_provider_field_names() {
        let value = serde_json::to_value(sapphire()).unwrap();
        assert_eq!(
            value,
            json!({
                "chainId": "0x5aff",
                "chainName": "Oasis Sapphire Testnet",
                "nativeCurrency": { "name": "SROSE", "symbol": "SROSE", "decimals": 18 },
                "rpcUrls": ["https://testnet.sapphire.oasis.dev"],
                "blockExplorerUrls": ["https://testnet.explorer.sapphire.oasis.dev/"],
            })
        );
    }

    #[test]
    fn test_switch_parameter_keeps_chain_id() {
        let switch = sapphire().switch_parameter();
        assert_eq!(switch.chain_id, "0x5aff");
        assert_eq!(serde_json::to_value(&switch).unwrap(), json!({ "chainId": "0x5aff" }));
    }
}
