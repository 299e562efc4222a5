//! # Chain Controller
//!
//! Owns the provider's current chain id and drives the add/switch handshake
//! towards the configured target network.

use crate::config::NetworkConfig;
use crate::error::{OperationKind, Result, WalletError};
use crate::error_channel::ErrorChannel;
use crate::notify::StateNotifier;
use crate::provider::{EventHandler, EventKind, ProviderEvent, ProviderGateway, Subscription};
use crate::types::ChainId;
use shared::dto::chain::AddEthereumChainParameter;
use shared::utils::parse_hex_quantity;
use std::cell::RefCell;
use std::rc::Rc;
use tracing::{debug, instrument, warn};

/// Decode a provider chain id (`"0x5aff"` → `23295`).
pub fn decode_chain_id(hex: &str) -> Option<ChainId> {
    parse_hex_quantity(hex)
}

#[derive(Debug, Default)]
struct ChainState {
    chain_id: Option<ChainId>,
    pending_switches: usize,
    /// Bumped on every `chainChanged`; probes answered across a bump are dropped.
    revision: u64,
}

pub struct ChainController {
    provider: Option<Rc<dyn ProviderGateway>>,
    target: ChainId,
    descriptor: AddEthereumChainParameter,
    errors: Rc<ErrorChannel>,
    notifier: Rc<StateNotifier>,
    state: RefCell<ChainState>,
    subscription: RefCell<Option<Subscription>>,
}

impl ChainController {
    pub fn new(
        provider: Option<Rc<dyn ProviderGateway>>,
        network: &NetworkConfig,
        errors: Rc<ErrorChannel>,
        notifier: Rc<StateNotifier>,
    ) -> Rc<Self> {
        Rc::new(Self {
            provider,
            target: network.chain_id,
            descriptor: network.descriptor(),
            errors,
            notifier,
            state: RefCell::new(ChainState::default()),
            subscription: RefCell::new(None),
        })
    }

    pub fn chain_id(&self) -> Option<ChainId> {
        self.state.borrow().chain_id
    }

    pub fn target(&self) -> ChainId {
        self.target
    }

    pub fn is_on_target(&self) -> bool {
        self.chain_id() == Some(self.target)
    }

    /// True while a switch request is waiting on the provider.
    pub fn is_switching(&self) -> bool {
        self.state.borrow().pending_switches > 0
    }

    pub fn is_observing(&self) -> bool {
        self.subscription.borrow().is_some()
    }

    fn gateway(&self) -> Option<Rc<dyn ProviderGateway>> {
        self.provider.clone().filter(|provider| provider.is_available())
    }

    /// Ask the provider to switch to (and if needed add) the target network, then
    /// read back the chain it ended up on.
    #[instrument(skip(self), fields(target = self.target))]
    pub async fn switch_to_target_chain(&self) -> Result<ChainId> {
        let attempt = self.errors.begin(OperationKind::SwitchChain);

        let Some(provider) = self.gateway() else {
            let err = WalletError::ProviderUnavailable;
            self.errors.fail(attempt, &err);
            return Err(err);
        };

        self.mutate(|state| state.pending_switches += 1);
        let result = self.request_switch(provider.as_ref()).await;
        self.mutate(|state| {
            state.pending_switches -= 1;
            if let Ok((chain_id, since)) = &result {
                if state.revision == *since {
                    state.chain_id = Some(*chain_id);
                }
            }
        });
        let result = result.map(|(chain_id, _)| chain_id);

        match &result {
            Ok(chain_id) => {
                debug!(chain_id, "Network switch accepted");
                self.errors.succeed(attempt);
            }
            Err(err) => {
                warn!(error = %err, "Network switch failed");
                self.errors.fail(attempt, err);
            }
        }

        result
    }

    /// Returns the read-back chain id and the revision it was requested at.
    async fn request_switch(&self, provider: &dyn ProviderGateway) -> Result<(ChainId, u64)> {
        provider
            .request_add_or_switch_chain(&self.descriptor)
            .await
            .map_err(|e| WalletError::ChainSwitchRejected(e.to_string()))?;

        let since = self.revision();
        let hex = provider
            .request_current_chain_id()
            .await
            .map_err(|e| WalletError::ChainSwitchRejected(e.to_string()))?;

        let chain_id = decode_chain_id(&hex).ok_or_else(|| {
            WalletError::ChainSwitchRejected(format!("provider reported an invalid chain id: {}", hex))
        })?;
        Ok((chain_id, since))
    }

    /// Subscribe to `chainChanged`. Idempotent; returns whether a listener is held.
    pub fn observe_chain_changes(self: &Rc<Self>) -> bool {
        let Some(provider) = self.gateway() else {
            return false;
        };
        if self.is_observing() {
            return true;
        }

        let weak = Rc::downgrade(self);
        let handler: EventHandler = Rc::new(move |event| {
            if let (Some(this), ProviderEvent::ChainChanged(hex)) = (weak.upgrade(), event) {
                this.state.borrow_mut().revision += 1;
                this.apply_chain(&hex);
            }
        });

        let subscription = provider.subscribe(EventKind::ChainChanged, handler);
        *self.subscription.borrow_mut() = Some(subscription);
        true
    }

    /// Release the `chainChanged` listener, if held.
    pub fn stop_observing(&self) {
        let subscription = self.subscription.borrow_mut().take();
        if let Some(subscription) = subscription {
            subscription.unsubscribe();
        }
    }

    /// Read the current chain id without prompting. Failures are logged and ignored.
    ///
    /// The answer is discarded if a `chainChanged` arrived while it was pending.
    pub async fn bootstrap_current_chain(&self) {
        let Some(provider) = self.gateway() else {
            return;
        };

        let since = self.revision();
        match provider.request_current_chain_id().await {
            Ok(_) if self.revision() != since => debug!("Chain id probe overtaken by chainChanged"),
            Ok(hex) => self.apply_chain(&hex),
            Err(e) => debug!(error = %e, "Chain id probe failed; ignoring"),
        }
    }

    fn revision(&self) -> u64 {
        self.state.borrow().revision
    }

    fn apply_chain(&self, hex: &str) {
        let Some(chain_id) = decode_chain_id(hex) else {
            warn!(reported = hex, "Ignoring undecodable chain id");
            return;
        };
        if self.chain_id() == Some(chain_id) {
            return;
        }
        debug!(chain_id, on_target = chain_id == self.target, "Chain changed");
        self.mutate(|state| state.chain_id = Some(chain_id));
    }

    fn mutate(&self, apply: impl FnOnce(&mut ChainState)) {
        apply(&mut self.state.borrow_mut());
        self.notifier.notify();
    }
}
