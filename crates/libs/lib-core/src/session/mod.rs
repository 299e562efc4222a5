//! # dApp Session
//!
//! Wires the controllers together around one [`StateNotifier`]:
//!
//! ```text
//!   provider events / user actions
//!              │
//!   ConnectionController   ChainController      (own Account / ChainId)
//!              └─────┬─────────┘
//!               StateNotifier ──▶ ReadinessGate + TransitionDetector
//!                    │                    │ BecameReady / BecameNotReady
//!                    │            ContractReadCoordinator
//!                    ▼
//!          subscribers (UI), ErrorChannel on every failure
//! ```
//!
//! The readiness listener is registered before any subscriber, so subscribers
//! always observe a read coordinator that has already reacted to the change they
//! are being told about.
//!
//! ## Usage
//!
//! ```rust,ignore
//! let session = DappSession::new(DappConfig::from_build_env()?, provider, spawner);
//! session.subscribe(|snapshot| render(snapshot));
//! session.start().await;
//! session.connect().await?;
//! ```

use crate::chain::ChainController;
use crate::config::DappConfig;
use crate::connection::ConnectionController;
use crate::contract::{GreetingContract, ProviderContract};
use crate::error::{OperationError, Result};
use crate::error_channel::ErrorChannel;
use crate::notify::{ListenerId, StateNotifier};
use crate::provider::ProviderGateway;
use crate::readiness::{ReadinessGate, TransitionDetector};
use crate::reader::{ContractReadCoordinator, ReadResult};
use crate::runtime::TaskSpawner;
use crate::types::{Address, ChainId};
use serde::Serialize;
use std::rc::Rc;
use tracing::{debug, info, instrument};

/// Everything the UI renders, read in one go.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub has_provider: bool,
    pub account: Option<Address>,
    pub connecting: bool,
    pub chain_id: Option<ChainId>,
    pub target_chain_id: ChainId,
    pub on_target_chain: bool,
    pub switching: bool,
    pub ready: bool,
    pub greeting: Option<ReadResult>,
    pub loading: bool,
    pub error: Option<OperationError>,
}

struct SessionInner {
    config: DappConfig,
    notifier: Rc<StateNotifier>,
    errors: Rc<ErrorChannel>,
    connection: Rc<ConnectionController>,
    chain: Rc<ChainController>,
    reader: Rc<ContractReadCoordinator>,
    gate: ReadinessGate,
    detector: TransitionDetector,
}

impl SessionInner {
    fn is_ready(&self) -> bool {
        self.gate
            .evaluate(self.connection.account().as_ref(), self.chain.chain_id())
    }

    fn evaluate_readiness(&self) {
        if let Some(transition) = self.detector.observe(self.is_ready()) {
            debug!(?transition, "Readiness changed");
            self.reader.on_transition(transition);
        }
    }

    fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            has_provider: self.connection.has_provider(),
            account: self.connection.account(),
            connecting: self.connection.is_connecting(),
            chain_id: self.chain.chain_id(),
            target_chain_id: self.gate.target(),
            on_target_chain: self.chain.is_on_target(),
            switching: self.chain.is_switching(),
            ready: self.is_ready(),
            greeting: self.reader.result(),
            loading: self.reader.is_loading(),
            error: self.errors.current(),
        }
    }
}

/// Handle to one wallet session. Cheap to clone; clones share state.
#[derive(Clone)]
pub struct DappSession {
    inner: Rc<SessionInner>,
}

impl DappSession {
    /// Session reading the greeter through the provider's `eth_call`.
    pub fn new(
        config: DappConfig,
        provider: Option<Rc<dyn ProviderGateway>>,
        spawner: Rc<dyn TaskSpawner>,
    ) -> Self {
        let contract = provider.clone().map(|provider| {
            Rc::new(ProviderContract::new(provider, &config.contract_address)) as Rc<dyn GreetingContract>
        });
        Self::with_contract(config, provider, contract, spawner)
    }

    pub fn with_contract(
        config: DappConfig,
        provider: Option<Rc<dyn ProviderGateway>>,
        contract: Option<Rc<dyn GreetingContract>>,
        spawner: Rc<dyn TaskSpawner>,
    ) -> Self {
        let notifier = StateNotifier::new();
        let errors = ErrorChannel::new(Rc::clone(&notifier));
        let connection = ConnectionController::new(
            provider.clone(),
            Rc::clone(&errors),
            Rc::clone(&notifier),
        );
        let chain = ChainController::new(
            provider,
            &config.network,
            Rc::clone(&errors),
            Rc::clone(&notifier),
        );
        let reader = ContractReadCoordinator::new(
            contract,
            spawner,
            Rc::clone(&errors),
            Rc::clone(&notifier),
        );

        let inner = Rc::new(SessionInner {
            gate: ReadinessGate::new(config.target_chain_id()),
            detector: TransitionDetector::new(),
            config,
            notifier,
            errors,
            connection,
            chain,
            reader,
        });

        let weak = Rc::downgrade(&inner);
        inner.notifier.listen(Rc::new(move || {
            if let Some(inner) = weak.upgrade() {
                inner.evaluate_readiness();
            }
        }));

        Self { inner }
    }

    /// Subscribe to provider events, then silently probe for an existing
    /// authorization and the current chain.
    #[instrument(skip(self))]
    pub async fn start(&self) {
        let inner = &self.inner;
        if !inner.connection.has_provider() {
            info!("No injected wallet provider; session is idle");
            return;
        }

        self.attach_listeners();
        inner.connection.bootstrap_existing_connection().await;
        inner.chain.bootstrap_current_chain().await;

        info!(
            account = ?inner.connection.account().as_ref().map(Address::as_str),
            chain_id = ?inner.chain.chain_id(),
            ready = inner.is_ready(),
            "Session started"
        );
    }

    /// Request account authorization, then re-read the current chain.
    ///
    /// Listeners are attached here too, for a wallet that appeared after `start`.
    pub async fn connect(&self) -> Result<Address> {
        self.attach_listeners();
        let address = self.inner.connection.connect().await?;
        self.inner.chain.bootstrap_current_chain().await;
        Ok(address)
    }

    pub async fn switch_to_target_chain(&self) -> Result<ChainId> {
        self.inner.chain.switch_to_target_chain().await
    }

    /// Manual re-read of the greeting. `Ok(None)` means the response went stale.
    pub async fn refresh(&self) -> Result<Option<ReadResult>> {
        self.inner.reader.read().await
    }

    fn attach_listeners(&self) {
        self.inner.connection.observe_account_changes();
        self.inner.chain.observe_chain_changes();
    }

    /// Release the provider event listeners.
    pub fn teardown(&self) {
        self.inner.connection.stop_observing();
        self.inner.chain.stop_observing();
        debug!("Session torn down");
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.inner.snapshot()
    }

    pub fn is_ready(&self) -> bool {
        self.inner.is_ready()
    }

    /// Call `listener` with a fresh snapshot after every state change.
    pub fn subscribe(&self, listener: impl Fn(&SessionSnapshot) + 'static) -> ListenerId {
        let weak = Rc::downgrade(&self.inner);
        self.inner.notifier.listen(Rc::new(move || {
            if let Some(inner) = weak.upgrade() {
                listener(&inner.snapshot());
            }
        }))
    }

    pub fn unsubscribe(&self, id: ListenerId) {
        self.inner.notifier.unlisten(id);
    }

    pub fn config(&self) -> &DappConfig {
        &self.inner.config
    }

    pub fn connection(&self) -> &Rc<ConnectionController> {
        &self.inner.connection
    }

    pub fn chain(&self) -> &Rc<ChainController> {
        &self.inner.chain
    }

    pub fn reader(&self) -> &Rc<ContractReadCoordinator> {
        &self.inner.reader
    }

    pub fn errors(&self) -> &Rc<ErrorChannel> {
        &self.inner.errors
    }
}
