//! # Contract Read Coordinator
//!
//! Fetches `greeting()` whenever the session becomes ready, and on demand.
//!
//! ## Readiness windows
//!
//! Every not-ready → ready transition opens a new *window* (a counter starting at 1).
//! Each read is tagged with the window it was issued in. When the call completes its
//! value is committed only if the session is still ready and the window has not moved
//! on; otherwise the outcome is dropped without touching [`ReadResult`], the loading
//! flag of the current window or the error channel.
//!
//! ```text
//! ready ───┐ window 1 ┌─── not ready ───┐ window 2 ┌───
//!          │ read A ──┼──────────────────┼──▶ A dropped
//!          │          │                  │ read B ──▶ B committed (fetched_at = 2)
//! ```
//!
//! Provider calls cannot be cancelled. A call that never settles keeps `loading`
//! set until the window ends.

use crate::contract::GreetingContract;
use crate::error::{OperationKind, Result, WalletError};
use crate::error_channel::{Attempt, ErrorChannel};
use crate::notify::StateNotifier;
use crate::readiness::ReadinessTransition;
use crate::runtime::TaskSpawner;
use serde::Serialize;
use std::cell::RefCell;
use std::rc::Rc;
use tracing::{debug, warn};

/// Last committed greeting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadResult {
    pub value: String,
    /// Readiness window the value was fetched in.
    pub fetched_at: u64,
}

struct ReadTicket {
    call: u64,
    window: u64,
    attempt: Attempt,
    contract: Rc<dyn GreetingContract>,
}

#[derive(Debug, Default)]
struct ReadState {
    ready: bool,
    window: u64,
    next_call: u64,
    loading_call: Option<u64>,
    result: Option<ReadResult>,
}

pub struct ContractReadCoordinator {
    contract: Option<Rc<dyn GreetingContract>>,
    spawner: Rc<dyn TaskSpawner>,
    errors: Rc<ErrorChannel>,
    notifier: Rc<StateNotifier>,
    state: RefCell<ReadState>,
}

impl ContractReadCoordinator {
    pub fn new(
        contract: Option<Rc<dyn GreetingContract>>,
        spawner: Rc<dyn TaskSpawner>,
        errors: Rc<ErrorChannel>,
        notifier: Rc<StateNotifier>,
    ) -> Rc<Self> {
        Rc::new(Self {
            contract,
            spawner,
            errors,
            notifier,
            state: RefCell::new(ReadState::default()),
        })
    }

    pub fn result(&self) -> Option<ReadResult> {
        self.state.borrow().result.clone()
    }

    /// True while the newest read of the current window is outstanding.
    pub fn is_loading(&self) -> bool {
        self.state.borrow().loading_call.is_some()
    }

    /// Current window id; `0` until the session first becomes ready.
    pub fn current_window(&self) -> u64 {
        self.state.borrow().window
    }

    pub fn is_ready(&self) -> bool {
        self.state.borrow().ready
    }

    /// React to a readiness transition. Becoming ready opens a window and fires one read.
    pub fn on_transition(self: &Rc<Self>, transition: ReadinessTransition) {
        match transition {
            ReadinessTransition::BecameReady => {
                self.mutate(|state| {
                    state.ready = true;
                    state.window += 1;
                    state.loading_call = None;
                });
                debug!(window = self.current_window(), "Readiness window opened");

                // Tag and mark loading now; only the await is deferred.
                if let Ok(ticket) = self.issue() {
                    let this = Rc::clone(self);
                    self.spawner.spawn(Box::pin(async move {
                        let _ = this.run(ticket).await;
                    }));
                }
            }
            ReadinessTransition::BecameNotReady => {
                self.mutate(|state| {
                    state.ready = false;
                    state.loading_call = None;
                });
                debug!(window = self.current_window(), "Readiness window closed");
            }
        }
    }

    /// Read the greeting now (the "refresh" action).
    ///
    /// Returns `Ok(None)` when the value arrived after its window ended and was dropped.
    pub async fn read(&self) -> Result<Option<ReadResult>> {
        let ticket = self.issue()?;
        self.run(ticket).await
    }

    fn issue(&self) -> Result<ReadTicket> {
        let attempt = self.errors.begin(OperationKind::Read);

        if !self.is_ready() {
            let err = WalletError::NotReady;
            self.errors.fail(attempt, &err);
            return Err(err);
        }
        let Some(contract) = self.contract.clone() else {
            let err = WalletError::ProviderUnavailable;
            self.errors.fail(attempt, &err);
            return Err(err);
        };

        let (call, window) = {
            let mut state = self.state.borrow_mut();
            state.next_call += 1;
            state.loading_call = Some(state.next_call);
            (state.next_call, state.window)
        };
        self.notifier.notify();

        debug!(call, window, "Reading greeting");
        Ok(ReadTicket {
            call,
            window,
            attempt,
            contract,
        })
    }

    async fn run(&self, ticket: ReadTicket) -> Result<Option<ReadResult>> {
        let outcome = ticket.contract.greeting().await;

        let (current, committed) = {
            let mut state = self.state.borrow_mut();
            let current = state.ready && state.window == ticket.window;
            if state.loading_call == Some(ticket.call) {
                state.loading_call = None;
            }
            let committed = match (&outcome, current) {
                (Ok(value), true) => {
                    let result = ReadResult {
                        value: value.clone(),
                        fetched_at: ticket.window,
                    };
                    state.result = Some(result.clone());
                    Some(result)
                }
                _ => None,
            };
            (current, committed)
        };
        self.notifier.notify();

        if !current {
            debug!(
                call = ticket.call,
                window = ticket.window,
                "Discarding read from a closed window"
            );
            return Ok(None);
        }

        match outcome {
            Ok(_) => {
                self.errors.succeed(ticket.attempt);
                Ok(committed)
            }
            Err(e) => {
                let err = WalletError::ReadFailed(e.to_string());
                warn!(error = %err, "Greeting read failed");
                self.errors.fail(ticket.attempt, &err);
                Err(err)
            }
        }
    }

    fn mutate(&self, apply: impl FnOnce(&mut ReadState)) {
        apply(&mut self.state.borrow_mut());
        self.notifier.notify();
    }
}
