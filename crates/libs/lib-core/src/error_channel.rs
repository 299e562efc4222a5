//! # Error Channel
//!
//! One slot holding the last [`OperationError`] shown to the user.
//!
//! Each operation kind (connect, switch chain, read) follows the same lifecycle:
//!
//! 1. [`begin`](ErrorChannel::begin) opens a new attempt and clears the slot if it
//!    holds an error of the same kind. Errors of other kinds stay.
//! 2. The attempt concludes with [`succeed`](ErrorChannel::succeed) or
//!    [`fail`](ErrorChannel::fail). Only the newest attempt of a kind may touch the
//!    slot; outcomes of attempts that were superseded by a newer attempt of the same
//!    kind are dropped.
//! 3. A failure overwrites whatever the slot holds, so the slot always reflects the
//!    most recently concluded failing operation.

use crate::error::{OperationError, OperationKind, WalletError};
use crate::notify::StateNotifier;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// One attempt of an operation, as handed out by [`ErrorChannel::begin`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Attempt {
    kind: OperationKind,
    seq: u64,
}

impl Attempt {
    pub fn kind(&self) -> OperationKind {
        self.kind
    }
}

pub struct ErrorChannel {
    slot: RefCell<Option<OperationError>>,
    attempts: [Cell<u64>; 3],
    notifier: Rc<StateNotifier>,
}

impl ErrorChannel {
    pub fn new(notifier: Rc<StateNotifier>) -> Rc<Self> {
        Rc::new(Self {
            slot: RefCell::new(None),
            attempts: Default::default(),
            notifier,
        })
    }

    pub fn current(&self) -> Option<OperationError> {
        self.slot.borrow().clone()
    }

    pub fn begin(&self, kind: OperationKind) -> Attempt {
        let counter = &self.attempts[kind.index()];
        let seq = counter.get() + 1;
        counter.set(seq);

        self.clear_if_owned_by(kind);
        Attempt { kind, seq }
    }

    /// Whether no newer attempt of the same kind has started since `attempt`.
    pub fn is_latest(&self, attempt: Attempt) -> bool {
        self.attempts[attempt.kind.index()].get() == attempt.seq
    }

    pub fn succeed(&self, attempt: Attempt) {
        if self.is_latest(attempt) {
            self.clear_if_owned_by(attempt.kind);
        }
    }

    /// Record `error` for `attempt`. Returns whether the slot was written.
    pub fn fail(&self, attempt: Attempt, error: &WalletError) -> bool {
        if !self.is_latest(attempt) {
            tracing::debug!(
                operation = attempt.kind.name(),
                %error,
                "Dropping failure of a superseded attempt"
            );
            return false;
        }

        *self.slot.borrow_mut() = Some(error.to_operation_error(attempt.kind));
        self.notifier.notify();
        true
    }

    fn clear_if_owned_by(&self, kind: OperationKind) {
        let cleared = {
            let mut slot = self.slot.borrow_mut();
            if slot.as_ref().is_some_and(|err| err.source == kind) {
                *slot = None;
                true
            } else {
                false
            }
        };
        if cleared {
            self.notifier.notify();
        }
    }
}
