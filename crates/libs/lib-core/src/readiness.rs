//! # Readiness Gate
//!
//! "Ready" means an account is connected and the provider is on the target chain.
//! The predicate is never stored; it is recomputed from the controllers' state on
//! every change. Consumers only see its transitions, through [`TransitionDetector`].

use crate::types::{Address, ChainId};

/// Pure readiness predicate.
pub fn ready(account: Option<&Address>, chain_id: Option<ChainId>, target: ChainId) -> bool {
    account.is_some() && chain_id == Some(target)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadinessTransition {
    BecameReady,
    BecameNotReady,
}

/// [`ready`] bound to a target chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadinessGate {
    target: ChainId,
}

impl ReadinessGate {
    pub fn new(target: ChainId) -> Self {
        Self { target }
    }

    pub fn target(&self) -> ChainId {
        self.target
    }

    pub fn evaluate(&self, account: Option<&Address>, chain_id: Option<ChainId>) -> bool {
        ready(account, chain_id, self.target)
    }
}

/// Turns a stream of readiness values into transitions. Starts not ready.
#[derive(Debug, Default)]
pub struct TransitionDetector {
    last: std::cell::Cell<bool>,
}

impl TransitionDetector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn observe(&self, ready: bool) -> Option<ReadinessTransition> {
        let previous = self.last.replace(ready);
        match (previous, ready) {
            (false, true) => Some(ReadinessTransition::BecameReady),
            (true, false) => Some(ReadinessTransition::BecameNotReady),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TARGET: ChainId = 23295;

    #[test]
    fn test_ready_requires_account_and_target_chain() {
        let account = Address::new("0xabc");
        assert!(ready(Some(&account), Some(TARGET), TARGET));
        assert!(!ready(None, Some(TARGET), TARGET));
        assert!(!ready(Some(&account), Some(1), TARGET));
        assert!(!ready(Some(&account), None, TARGET));
        assert!(!ready(None, None, TARGET));
    }

    #[test]
    fn test_gate_uses_its_target() {
        let gate = ReadinessGate::new(TARGET);
        let account = Address::new("0xabc");
        assert_eq!(gate.target(), TARGET);
        assert!(gate.evaluate(Some(&account), Some(TARGET)));
        assert!(!gate.evaluate(Some(&account), Some(TARGET + 1)));
    }

    #[test]
    fn test_only_changes_are_reported() {
        let detector = TransitionDetector::new();
        assert_eq!(detector.observe(false), None);
        assert_eq!(detector.observe(true), Some(ReadinessTransition::BecameReady));
        assert_eq!(detector.observe(true), None);
        assert_eq!(detector.observe(false), Some(ReadinessTransition::BecameNotReady));
        assert_eq!(detector.observe(false), None);
        assert_eq!(detector.observe(true), Some(ReadinessTransition::BecameReady));
    }
}
