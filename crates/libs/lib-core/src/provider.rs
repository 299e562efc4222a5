//! # Provider Gateway
//!
//! The seam between the dApp core and an injected EIP-1193 wallet provider.
//! The browser frontend implements [`ProviderGateway`] over `window.ethereum`;
//! tests implement it with a scripted fake. Controllers receive the gateway by
//! injection and never touch the environment directly.
//!
//! ```text
//! ConnectionController ──┐                       ┌── eth_requestAccounts / eth_accounts
//! ChainController ───────┼── ProviderGateway ────┼── eth_chainId / wallet_*EthereumChain
//! ProviderContract ──────┘                       ├── eth_call
//!                                                └── on("accountsChanged" | "chainChanged")
//! ```
//!
//! Everything runs on one thread (the UI thread), so the trait is `?Send`.

use async_trait::async_trait;
use shared::dto::chain::AddEthereumChainParameter;
use shared::dto::rpc::{CallRequest, ProviderRpcError};
use std::fmt;
use std::rc::Rc;

/// Provider notifications the core listens to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    AccountsChanged,
    ChainChanged,
}

impl EventKind {
    /// EIP-1193 event name.
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::AccountsChanged => "accountsChanged",
            EventKind::ChainChanged => "chainChanged",
        }
    }
}

/// Payload of a provider notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderEvent {
    /// Currently exposed accounts, most relevant first. Empty means disconnected or locked.
    AccountsChanged(Vec<String>),
    /// New chain id as reported, `0x`-prefixed hex.
    ChainChanged(String),
}

impl ProviderEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            ProviderEvent::AccountsChanged(_) => EventKind::AccountsChanged,
            ProviderEvent::ChainChanged(_) => EventKind::ChainChanged,
        }
    }
}

pub type EventHandler = Rc<dyn Fn(ProviderEvent)>;

/// Scoped listener registration. Dropping it (or calling [`unsubscribe`](Self::unsubscribe))
/// removes the listener from the provider, exactly once.
#[must_use = "dropping a Subscription removes the listener immediately"]
pub struct Subscription {
    kind: EventKind,
    release: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    pub fn new(kind: EventKind, release: impl FnOnce() + 'static) -> Self {
        Self {
            kind,
            release: Some(Box::new(release)),
        }
    }

    pub fn kind(&self) -> EventKind {
        self.kind
    }

    pub fn unsubscribe(mut self) {
        self.release_now();
    }

    fn release_now(&mut self) {
        if let Some(release) = self.release.take() {
            tracing::debug!(event = self.kind.as_str(), "Provider listener released");
            release();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release_now();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("kind", &self.kind)
            .field("active", &self.release.is_some())
            .finish()
    }
}

/// Request/event primitives of an injected wallet provider.
#[async_trait(?Send)]
pub trait ProviderGateway {
    /// `eth_requestAccounts` - prompts the user, may reject.
    async fn request_accounts(&self) -> Result<Vec<String>, ProviderRpcError>;

    /// `eth_accounts` - already authorized accounts, never prompts.
    async fn request_already_authorized_accounts(&self) -> Result<Vec<String>, ProviderRpcError>;

    /// `eth_chainId` - current chain as hex, never prompts.
    async fn request_current_chain_id(&self) -> Result<String, ProviderRpcError>;

    /// Switch to the described chain, adding it first if the provider does not know it.
    /// Prompts the user, may reject.
    async fn request_add_or_switch_chain(
        &self,
        descriptor: &AddEthereumChainParameter,
    ) -> Result<(), ProviderRpcError>;

    /// `eth_call` against the latest block; returns the hex return data.
    async fn request_call(&self, call: &CallRequest) -> Result<String, ProviderRpcError>;

    /// Register `handler` for `kind`. The listener lives as long as the returned handle.
    fn subscribe(&self, kind: EventKind, handler: EventHandler) -> Subscription;

    /// Whether the wallet is reachable right now. Re-checked on every action, so a
    /// wallet injected after page load is picked up without a reload.
    fn is_available(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_subscription_releases_once() {
        let released = Rc::new(Cell::new(0));
        let counter = Rc::clone(&released);
        let sub = Subscription::new(EventKind::ChainChanged, move || counter.set(counter.get() + 1));
        assert_eq!(sub.kind(), EventKind::ChainChanged);
        sub.unsubscribe();
        assert_eq!(released.get(), 1);
    }

    #[test]
    fn test_subscription_releases_on_drop() {
        let released = Rc::new(Cell::new(0));
        let counter = Rc::clone(&released);
        {
            let _sub = Subscription::new(EventKind::AccountsChanged, move || {
                counter.set(counter.get() + 1)
            });
        }
        assert_eq!(released.get(), 1);
    }

    #[test]
    fn test_event_names() {
        assert_eq!(EventKind::AccountsChanged.as_str(), "accountsChanged");
        assert_eq!(ProviderEvent::ChainChanged("0x1".into()).kind(), EventKind::ChainChanged);
    }
}
