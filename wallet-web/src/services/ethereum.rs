//! Injected Wallet Integration via wasm-bindgen
//!
//! JavaScript interop for the EIP-1193 provider at `window.ethereum`
//! (MetaMask, Rabby, Coinbase Wallet and other injected wallets).
//! [`BrowserProvider`] adapts it to the core's [`ProviderGateway`].

use async_trait::async_trait;
use js_sys::{Array, Function, Reflect};
use lib_core::provider::{EventHandler, EventKind, ProviderEvent, ProviderGateway, Subscription};
use lib_core::runtime::TaskSpawner;
use futures::future::LocalBoxFuture;
use serde::de::DeserializeOwned;
use serde::Serialize;
use shared::dto::chain::AddEthereumChainParameter;
use shared::dto::rpc::{CallRequest, ProviderRpcError};
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

/// JSON-RPC "internal error", used when the wallet throws something that is not an RPC error.
const INTERNAL_ERROR: i64 = -32603;

// ============================================================================
// window.ethereum (JavaScript Interop)
// ============================================================================

#[wasm_bindgen(inline_js = "
export function hasEthereum() {
    return typeof window !== 'undefined' && !!window.ethereum;
}

export async function ethereumRequest(method, params) {
    if (!window.ethereum) {
        throw { code: 4900, message: 'No injected wallet provider' };
    }
    return await window.ethereum.request({ method, params });
}

export function ethereumOn(event, handler) {
    if (window.ethereum && typeof window.ethereum.on === 'function') {
        window.ethereum.on(event, handler);
    }
}

export function ethereumRemoveListener(event, handler) {
    if (window.ethereum && typeof window.ethereum.removeListener === 'function') {
        window.ethereum.removeListener(event, handler);
    }
}
")]
extern "C" {
    /// Whether an injected provider exists
    fn hasEthereum() -> bool;

    /// `window.ethereum.request({ method, params })`
    #[wasm_bindgen(catch)]
    async fn ethereumRequest(method: &str, params: JsValue) -> Result<JsValue, JsValue>;

    fn ethereumOn(event: &str, handler: &Function);

    fn ethereumRemoveListener(event: &str, handler: &Function);
}

/// Turn whatever the wallet threw into an EIP-1193 error.
fn rpc_error(err: JsValue) -> ProviderRpcError {
    let code = Reflect::get(&err, &JsValue::from_str("code"))
        .ok()
        .and_then(|v| v.as_f64())
        .map(|code| code as i64)
        .unwrap_or(INTERNAL_ERROR);

    let message = Reflect::get(&err, &JsValue::from_str("message"))
        .ok()
        .and_then(|v| v.as_string())
        .or_else(|| err.as_string())
        .unwrap_or_else(|| format!("Provider error: {:?}", err));

    let data = Reflect::get(&err, &JsValue::from_str("data"))
        .ok()
        .filter(|v| !v.is_undefined() && !v.is_null())
        .and_then(|v| serde_wasm_bindgen::from_value(v).ok());

    ProviderRpcError {
        code,
        message,
        data,
    }
}

fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, ProviderRpcError> {
    serde_wasm_bindgen::to_value(value)
        .map_err(|e| ProviderRpcError::new(INTERNAL_ERROR, format!("Failed to encode params: {}", e)))
}

async fn request_raw(method: &str, params: JsValue) -> Result<JsValue, ProviderRpcError> {
    log::debug!("[ethereum] {}", method);
    ethereumRequest(method, params).await.map_err(|e| {
        let err = rpc_error(e);
        log::debug!("[ethereum] {} failed: {} ({})", method, err, err.code);
        err
    })
}

async fn request<T: DeserializeOwned>(method: &str, params: JsValue) -> Result<T, ProviderRpcError> {
    let value = request_raw(method, params).await?;
    serde_wasm_bindgen::from_value(value).map_err(|e| {
        ProviderRpcError::new(INTERNAL_ERROR, format!("Unexpected {} response: {}", method, e))
    })
}

fn decode_event(kind: EventKind, payload: JsValue) -> Option<ProviderEvent> {
    match kind {
        EventKind::AccountsChanged => serde_wasm_bindgen::from_value::<Vec<String>>(payload)
            .ok()
            .map(ProviderEvent::AccountsChanged),
        EventKind::ChainChanged => payload.as_string().map(ProviderEvent::ChainChanged),
    }
}

// ============================================================================
// ProviderGateway adapter
// ============================================================================

/// [`ProviderGateway`] over `window.ethereum`.
pub struct BrowserProvider;

impl BrowserProvider {
    /// Gateway that looks up `window.ethereum` on every use.
    pub fn gateway() -> Rc<dyn ProviderGateway> {
        if hasEthereum() {
            log::info!("Injected wallet provider detected");
        } else {
            log::warn!("No injected wallet provider (window.ethereum) yet");
        }
        Rc::new(BrowserProvider)
    }
}

#[async_trait(?Send)]
impl ProviderGateway for BrowserProvider {
    async fn request_accounts(&self) -> Result<Vec<String>, ProviderRpcError> {
        request("eth_requestAccounts", Array::new().into()).await
    }

    async fn request_already_authorized_accounts(&self) -> Result<Vec<String>, ProviderRpcError> {
        request("eth_accounts", Array::new().into()).await
    }

    async fn request_current_chain_id(&self) -> Result<String, ProviderRpcError> {
        request("eth_chainId", Array::new().into()).await
    }

    async fn request_add_or_switch_chain(
        &self,
        descriptor: &AddEthereumChainParameter,
    ) -> Result<(), ProviderRpcError> {
        // Switching first avoids re-adding a network the wallet already knows.
        let switch = to_js(&[descriptor.switch_parameter()])?;
        match request_raw("wallet_switchEthereumChain", switch).await {
            Ok(_) => Ok(()),
            Err(e) if e.is_unrecognized_chain() => {
                log::info!("Chain {} unknown to the wallet; adding it", descriptor.chain_id);
                request_raw("wallet_addEthereumChain", to_js(&[descriptor])?).await?;
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    async fn request_call(&self, call: &CallRequest) -> Result<String, ProviderRpcError> {
        let params = Array::new();
        params.push(&to_js(call)?);
        params.push(&JsValue::from_str("latest"));
        request("eth_call", params.into()).await
    }

    fn is_available(&self) -> bool {
        hasEthereum()
    }

    fn subscribe(&self, kind: EventKind, handler: EventHandler) -> Subscription {
        let callback = Closure::<dyn FnMut(JsValue)>::new(move |payload: JsValue| {
            match decode_event(kind, payload) {
                Some(event) => handler(event),
                None => log::warn!("[ethereum] Ignoring malformed {} payload", kind.as_str()),
            }
        });
        ethereumOn(kind.as_str(), callback.as_ref().unchecked_ref());

        Subscription::new(kind, move || {
            ethereumRemoveListener(kind.as_str(), callback.as_ref().unchecked_ref());
            drop(callback);
        })
    }
}

/// Runs readiness-triggered reads on the Leptos local executor.
pub struct LeptosSpawner;

impl TaskSpawner for LeptosSpawner {
    fn spawn(&self, task: LocalBoxFuture<'static, ()>) {
        leptos::task::spawn_local(task);
    }
}
