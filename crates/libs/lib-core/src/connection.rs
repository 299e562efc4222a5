//! # Connection Controller
//!
//! Owns the connected account.
//!
//! The account changes in exactly three ways:
//! - [`connect`](ConnectionController::connect) succeeds (first returned address)
//! - the provider emits `accountsChanged` (first element, or none for an empty list)
//! - [`bootstrap_existing_connection`](ConnectionController::bootstrap_existing_connection)
//!   finds an already-authorized account at startup
//!
//! Every change is followed by a [`StateNotifier`] notification.

use crate::error::{OperationKind, Result, WalletError};
use crate::error_channel::ErrorChannel;
use crate::notify::StateNotifier;
use crate::provider::{EventHandler, EventKind, ProviderEvent, ProviderGateway, Subscription};
use crate::types::Address;
use std::cell::RefCell;
use std::rc::Rc;
use tracing::{debug, instrument, warn};

#[derive(Debug, Default)]
struct AccountState {
    account: Option<Address>,
    pending_connects: usize,
    /// Bumped on every `accountsChanged` and successful connect.
    revision: u64,
}

pub struct ConnectionController {
    provider: Option<Rc<dyn ProviderGateway>>,
    errors: Rc<ErrorChannel>,
    notifier: Rc<StateNotifier>,
    state: RefCell<AccountState>,
    subscription: RefCell<Option<Subscription>>,
}

impl ConnectionController {
    pub fn new(
        provider: Option<Rc<dyn ProviderGateway>>,
        errors: Rc<ErrorChannel>,
        notifier: Rc<StateNotifier>,
    ) -> Rc<Self> {
        Rc::new(Self {
            provider,
            errors,
            notifier,
            state: RefCell::new(AccountState::default()),
            subscription: RefCell::new(None),
        })
    }

    pub fn account(&self) -> Option<Address> {
        self.state.borrow().account.clone()
    }

    /// True only while a [`connect`](Self::connect) call is waiting on the provider.
    pub fn is_connecting(&self) -> bool {
        self.state.borrow().pending_connects > 0
    }

    pub fn has_provider(&self) -> bool {
        self.gateway().is_some()
    }

    fn gateway(&self) -> Option<Rc<dyn ProviderGateway>> {
        self.provider.clone().filter(|provider| provider.is_available())
    }

    pub fn is_observing(&self) -> bool {
        self.subscription.borrow().is_some()
    }

    /// Ask the provider to authorize an account (prompts the user).
    #[instrument(skip(self))]
    pub async fn connect(&self) -> Result<Address> {
        let attempt = self.errors.begin(OperationKind::Connect);

        let Some(provider) = self.gateway() else {
            let err = WalletError::ProviderUnavailable;
            warn!("Connect requested without a wallet provider");
            self.errors.fail(attempt, &err);
            return Err(err);
        };

        self.mutate(|state| state.pending_connects += 1);

        let result = match provider.request_accounts().await {
            Ok(accounts) => Address::first_of(&accounts).ok_or(WalletError::NoAccountsReturned),
            Err(e) => Err(WalletError::ConnectRejected(e.to_string())),
        };

        self.mutate(|state| {
            state.pending_connects -= 1;
            if let Ok(address) = &result {
                state.account = Some(address.clone());
                state.revision += 1;
            }
        });

        match &result {
            Ok(address) => {
                debug!(account = %address, "Wallet connected");
                self.errors.succeed(attempt);
            }
            Err(err) => {
                warn!(error = %err, "Wallet connection failed");
                self.errors.fail(attempt, err);
            }
        }

        result
    }

    /// Subscribe to `accountsChanged`. Idempotent; returns whether a listener is held.
    pub fn observe_account_changes(self: &Rc<Self>) -> bool {
        let Some(provider) = self.gateway() else {
            return false;
        };
        if self.is_observing() {
            return true;
        }

        let weak = Rc::downgrade(self);
        let handler: EventHandler = Rc::new(move |event| {
            if let (Some(this), ProviderEvent::AccountsChanged(accounts)) = (weak.upgrade(), event) {
                this.apply_accounts(&accounts);
            }
        });

        let subscription = provider.subscribe(EventKind::AccountsChanged, handler);
        *self.subscription.borrow_mut() = Some(subscription);
        true
    }

    /// Release the `accountsChanged` listener, if held.
    pub fn stop_observing(&self) {
        let subscription = self.subscription.borrow_mut().take();
        if let Some(subscription) = subscription {
            subscription.unsubscribe();
        }
    }

    /// Seed the account from already-authorized accounts, without prompting.
    ///
    /// Best effort: failures are logged and otherwise ignored. The answer is
    /// discarded if the account changed while it was pending.
    pub async fn bootstrap_existing_connection(&self) {
        let Some(provider) = self.gateway() else {
            return;
        };

        let since = self.state.borrow().revision;
        match provider.request_already_authorized_accounts().await {
            Ok(_) if self.state.borrow().revision != since => {
                debug!("Authorized-accounts probe overtaken by a newer account")
            }
            Ok(accounts) => match Address::first_of(&accounts) {
                Some(address) => {
                    debug!(account = %address, "Restored existing authorization");
                    self.set_account(Some(address));
                }
                None => debug!("No previously authorized accounts"),
            },
            Err(e) => debug!(error = %e, "Authorized-accounts probe failed; ignoring"),
        }
    }

    fn apply_accounts(&self, accounts: &[String]) {
        let account = Address::first_of(accounts);
        debug!(account = ?account.as_ref().map(Address::as_str), "accountsChanged");
        self.state.borrow_mut().revision += 1;
        self.set_account(account);
    }

    fn set_account(&self, account: Option<Address>) {
        if self.state.borrow().account == account {
            return;
        }
        self.mutate(|state| state.account = account);
    }

    fn mutate(&self, apply: impl FnOnce(&mut AccountState)) {
        apply(&mut self.state.borrow_mut());
        self.notifier.notify();
    }
}
