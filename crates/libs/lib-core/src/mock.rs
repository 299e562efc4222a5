//! Scripted fakes for the provider, the contract and the task spawner.

use crate::abi::AbiError;
use crate::contract::{ContractCallError, GreetingContract};
use crate::provider::{EventHandler, EventKind, ProviderEvent, ProviderGateway, Subscription};
use crate::runtime::TaskSpawner;
use async_trait::async_trait;
use futures::channel::oneshot;
use futures::future::LocalBoxFuture;
use shared::dto::chain::AddEthereumChainParameter;
use shared::dto::rpc::{CallRequest, ProviderRpcError, USER_REJECTED_REQUEST};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

type Listeners = Rc<RefCell<Vec<(u64, EventKind, EventHandler)>>>;

pub(crate) fn rejection(message: &str) -> ProviderRpcError {
    ProviderRpcError::new(USER_REJECTED_REQUEST, message)
}

/// Provider whose responses are set by the test.
///
/// A successful chain switch moves the fake onto the requested chain, as a real
/// wallet does; it does not emit `chainChanged` on its own.
pub(crate) struct MockProvider {
    accounts: RefCell<Result<Vec<String>, ProviderRpcError>>,
    authorized: RefCell<Result<Vec<String>, ProviderRpcError>>,
    chain_id: RefCell<Result<String, ProviderRpcError>>,
    switch_result: RefCell<Result<(), ProviderRpcError>>,
    call_result: RefCell<Result<String, ProviderRpcError>>,
    available: Cell<bool>,
    connect_gate: RefCell<Option<oneshot::Receiver<()>>>,
    authorized_gate: RefCell<Option<oneshot::Receiver<()>>>,
    chain_gate: RefCell<Option<oneshot::Receiver<()>>>,
    requests: RefCell<Vec<&'static str>>,
    eth_calls: RefCell<Vec<CallRequest>>,
    switched_to: RefCell<Vec<AddEthereumChainParameter>>,
    listeners: Listeners,
    next_listener: Cell<u64>,
}

impl MockProvider {
    pub(crate) fn new() -> Rc<Self> {
        Rc::new(Self {
            accounts: RefCell::new(Ok(Vec::new())),
            authorized: RefCell::new(Ok(Vec::new())),
            chain_id: RefCell::new(Ok("0x1".to_string())),
            switch_result: RefCell::new(Ok(())),
            call_result: RefCell::new(Ok(String::new())),
            available: Cell::new(true),
            connect_gate: RefCell::new(None),
            authorized_gate: RefCell::new(None),
            chain_gate: RefCell::new(None),
            requests: RefCell::new(Vec::new()),
            eth_calls: RefCell::new(Vec::new()),
            switched_to: RefCell::new(Vec::new()),
            listeners: Rc::new(RefCell::new(Vec::new())),
            next_listener: Cell::new(0),
        })
    }

    pub(crate) fn set_accounts(&self, result: Result<Vec<&str>, ProviderRpcError>) {
        *self.accounts.borrow_mut() = result.map(owned);
    }

    pub(crate) fn set_authorized(&self, result: Result<Vec<&str>, ProviderRpcError>) {
        *self.authorized.borrow_mut() = result.map(owned);
    }

    pub(crate) fn set_chain_id(&self, result: Result<&str, ProviderRpcError>) {
        *self.chain_id.borrow_mut() = result.map(str::to_string);
    }

    pub(crate) fn set_switch_result(&self, result: Result<(), ProviderRpcError>) {
        *self.switch_result.borrow_mut() = result;
    }

    /// Simulate the wallet being absent (`false`) or injected later (`true`).
    pub(crate) fn set_available(&self, available: bool) {
        self.available.set(available);
    }

    pub(crate) fn set_call_result(&self, result: Result<String, ProviderRpcError>) {
        *self.call_result.borrow_mut() = result;
    }

    /// Park the next `eth_requestAccounts` until the returned sender fires (or is dropped).
    pub(crate) fn hold_next_connect(&self) -> oneshot::Sender<()> {
        hold(&self.connect_gate)
    }

    /// Park the next `eth_accounts`. The answer is taken when the request arrives.
    pub(crate) fn hold_next_authorized(&self) -> oneshot::Sender<()> {
        hold(&self.authorized_gate)
    }

    /// Park the next `eth_chainId`. The answer is taken when the request arrives.
    pub(crate) fn hold_next_chain_id(&self) -> oneshot::Sender<()> {
        hold(&self.chain_gate)
    }

    pub(crate) fn emit(&self, event: ProviderEvent) {
        let kind = event.kind();
        let handlers: Vec<EventHandler> = self
            .listeners
            .borrow()
            .iter()
            .filter(|(_, k, _)| *k == kind)
            .map(|(_, _, handler)| Rc::clone(handler))
            .collect();
        for handler in handlers {
            handler(event.clone());
        }
    }

    pub(crate) fn emit_accounts(&self, accounts: &[&str]) {
        self.emit(ProviderEvent::AccountsChanged(
            accounts.iter().map(|a| a.to_string()).collect(),
        ));
    }

    pub(crate) fn emit_chain(&self, chain_id: &str) {
        self.emit(ProviderEvent::ChainChanged(chain_id.to_string()));
    }

    pub(crate) fn listener_count(&self, kind: EventKind) -> usize {
        self.listeners
            .borrow()
            .iter()
            .filter(|(_, k, _)| *k == kind)
            .count()
    }

    pub(crate) fn requests(&self) -> Vec<&'static str> {
        self.requests.borrow().clone()
    }

    pub(crate) fn eth_calls(&self) -> Vec<CallRequest> {
        self.eth_calls.borrow().clone()
    }

    pub(crate) fn switched_to(&self) -> Vec<AddEthereumChainParameter> {
        self.switched_to.borrow().clone()
    }

    fn record(&self, method: &'static str) {
        self.requests.borrow_mut().push(method);
    }
}

fn hold(gate: &RefCell<Option<oneshot::Receiver<()>>>) -> oneshot::Sender<()> {
    let (tx, rx) = oneshot::channel();
    *gate.borrow_mut() = Some(rx);
    tx
}

async fn pass(gate: &RefCell<Option<oneshot::Receiver<()>>>) {
    let gate = gate.borrow_mut().take();
    if let Some(gate) = gate {
        let _ = gate.await;
    }
}

fn owned(accounts: Vec<&str>) -> Vec<String> {
    accounts.into_iter().map(str::to_string).collect()
}

#[async_trait(?Send)]
impl ProviderGateway for MockProvider {
    async fn request_accounts(&self) -> Result<Vec<String>, ProviderRpcError> {
        self.record("eth_requestAccounts");
        pass(&self.connect_gate).await;
        self.accounts.borrow().clone()
    }

    async fn request_already_authorized_accounts(&self) -> Result<Vec<String>, ProviderRpcError> {
        self.record("eth_accounts");
        let answer = self.authorized.borrow().clone();
        pass(&self.authorized_gate).await;
        answer
    }

    async fn request_current_chain_id(&self) -> Result<String, ProviderRpcError> {
        self.record("eth_chainId");
        let answer = self.chain_id.borrow().clone();
        pass(&self.chain_gate).await;
        answer
    }

    async fn request_add_or_switch_chain(
        &self,
        descriptor: &AddEthereumChainParameter,
    ) -> Result<(), ProviderRpcError> {
        self.record("wallet_addEthereumChain");
        self.switched_to.borrow_mut().push(descriptor.clone());
        let result = self.switch_result.borrow().clone();
        if result.is_ok() {
            *self.chain_id.borrow_mut() = Ok(descriptor.chain_id.clone());
        }
        result
    }

    async fn request_call(&self, call: &CallRequest) -> Result<String, ProviderRpcError> {
        self.record("eth_call");
        self.eth_calls.borrow_mut().push(call.clone());
        self.call_result.borrow().clone()
    }

    fn subscribe(&self, kind: EventKind, handler: EventHandler) -> Subscription {
        let id = self.next_listener.get();
        self.next_listener.set(id + 1);
        self.listeners.borrow_mut().push((id, kind, handler));

        let listeners = Rc::clone(&self.listeners);
        Subscription::new(kind, move || {
            listeners.borrow_mut().retain(|(existing, _, _)| *existing != id);
        })
    }

    fn is_available(&self) -> bool {
        self.available.get()
    }
}

/// Contract whose calls stay pending until the test resolves them, in any order.
#[derive(Default)]
pub(crate) struct MockContract {
    pending: RefCell<Vec<Option<oneshot::Sender<Result<String, ContractCallError>>>>>,
}

impl MockContract {
    pub(crate) fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    /// Number of calls issued so far.
    pub(crate) fn calls(&self) -> usize {
        self.pending.borrow().len()
    }

    /// Complete the `index`-th issued call (0-based).
    pub(crate) fn resolve(&self, index: usize, result: Result<&str, ContractCallError>) {
        let sender = self
            .pending
            .borrow_mut()
            .get_mut(index)
            .and_then(Option::take)
            .unwrap_or_else(|| panic!("no pending call #{index}"));
        let _ = sender.send(result.map(str::to_string));
    }
}

#[async_trait(?Send)]
impl GreetingContract for MockContract {
    async fn greeting(&self) -> Result<String, ContractCallError> {
        let (tx, rx) = oneshot::channel();
        self.pending.borrow_mut().push(Some(tx));
        rx.await
            .unwrap_or(Err(ContractCallError::Decode(AbiError::Empty)))
    }
}

/// Spawns onto the current tokio `LocalSet`.
pub(crate) struct LocalSpawner;

impl LocalSpawner {
    pub(crate) fn new() -> Rc<Self> {
        Rc::new(Self)
    }
}

impl TaskSpawner for LocalSpawner {
    fn spawn(&self, task: LocalBoxFuture<'static, ()>) {
        tokio::task::spawn_local(task);
    }
}

/// Let spawned local tasks run until they block again.
pub(crate) async fn settle() {
    for _ in 0..32 {
        tokio::task::yield_now().await;
    }
}
