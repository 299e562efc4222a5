//! # Contract Boundary
//!
//! The greeter contract exposes a single view function, `greeting() -> string`.
//! [`ProviderContract`] reaches it through the injected provider with `eth_call`;
//! no write methods are modeled.

use crate::abi::{self, AbiError};
use crate::provider::ProviderGateway;
use async_trait::async_trait;
use shared::dto::rpc::{CallRequest, ProviderRpcError};
use std::rc::Rc;
use thiserror::Error;

/// Solidity signature of the only function the dApp calls.
pub const GREETING_SIGNATURE: &str = "greeting()";

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ContractCallError {
    #[error("{0}")]
    Provider(#[from] ProviderRpcError),

    #[error("{0}")]
    Decode(#[from] AbiError),
}

#[async_trait(?Send)]
pub trait GreetingContract {
    async fn greeting(&self) -> Result<String, ContractCallError>;
}

/// `greeting()` over `eth_call` at a fixed address.
pub struct ProviderContract {
    provider: Rc<dyn ProviderGateway>,
    address: String,
    calldata: String,
}

impl ProviderContract {
    pub fn new(provider: Rc<dyn ProviderGateway>, address: &str) -> Self {
        Self {
            provider,
            address: address.to_ascii_lowercase(),
            calldata: abi::encode_call(GREETING_SIGNATURE),
        }
    }

    pub fn address(&self) -> &str {
        &self.address
    }
}

#[async_trait(?Send)]
impl GreetingContract for ProviderContract {
    async fn greeting(&self) -> Result<String, ContractCallError> {
        let call = CallRequest {
            to: self.address.clone(),
            data: self.calldata.clone(),
        };
        let raw = self.provider.request_call(&call).await?;
        Ok(abi::decode_string(&raw)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockProvider;

    const HELLO: &str = concat!(
        "0x",
        "0000000000000000000000000000000000000000000000000000000000000020",
        "0000000000000000000000000000000000000000000000000000000000000005",
        "68656c6c6f000000000000000000000000000000000000000000000000000000",
    );

    #[tokio::test]
    async fn test_greeting_over_eth_call() {
        let provider = MockProvider::new();
        provider.set_call_result(Ok(HELLO.to_string()));
        let contract = ProviderContract::new(
            provider.clone(),
            "0x6eED2f58ed21a651CCc42Af123E243FaBad920E0",
        );

        assert_eq!(contract.greeting().await.unwrap(), "hello");

        let calls = provider.eth_calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].to, "0x6eed2f58ed21a651ccc42af123e243fabad920e0");
        assert_eq!(calls[0].data, "0xef690cc0");
    }

    #[tokio::test]
    async fn test_provider_error_passes_message_through() {
        let provider = MockProvider::new();
        provider.set_call_result(Err(ProviderRpcError::new(-32603, "execution reverted")));
        let contract = ProviderContract::new(provider, crate::config::DEFAULT_CONTRACT_ADDRESS);

        let err = contract.greeting().await.unwrap_err();
        assert_eq!(err.to_string(), "execution reverted");
    }

    #[tokio::test]
    async fn test_empty_return_data_is_a_decode_error() {
        let provider = MockProvider::new();
        provider.set_call_result(Ok("0x".to_string()));
        let contract = ProviderContract::new(provider, crate::config::DEFAULT_CONTRACT_ADDRESS);

        assert_eq!(
            contract.greeting().await,
            Err(ContractCallError::Decode(AbiError::Empty))
        );
    }
}
