//! Change feed shared by the controllers, the read coordinator and their observers.
//!
//! Owners call [`StateNotifier::notify`] after each mutation of their own state,
//! with no `RefCell` borrow held. Listeners run synchronously, in registration order.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

pub type Listener = Rc<dyn Fn()>;

/// Handle returned by [`StateNotifier::listen`]; pass it to [`StateNotifier::unlisten`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListenerId(u64);

#[derive(Default)]
pub struct StateNotifier {
    next_id: Cell<u64>,
    listeners: RefCell<Vec<(ListenerId, Listener)>>,
}

impl StateNotifier {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    pub fn listen(&self, listener: Listener) -> ListenerId {
        let id = ListenerId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.listeners.borrow_mut().push((id, listener));
        id
    }

    pub fn unlisten(&self, id: ListenerId) {
        self.listeners.borrow_mut().retain(|(existing, _)| *existing != id);
    }

    pub fn notify(&self) {
        // Snapshot first: listeners may notify again or register new listeners.
        let listeners: Vec<Listener> = self
            .listeners
            .borrow()
            .iter()
            .map(|(_, listener)| Rc::clone(listener))
            .collect();
        for listener in listeners {
            listener();
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_listeners_run_in_order() {
        let notifier = StateNotifier::new();
        let log = Rc::new(RefCell::new(Vec::new()));

        let first = Rc::clone(&log);
        notifier.listen(Rc::new(move || first.borrow_mut().push(1)));
        let second = Rc::clone(&log);
        notifier.listen(Rc::new(move || second.borrow_mut().push(2)));

        notifier.notify();
        assert_eq!(*log.borrow(), vec![1, 2]);
    }

    #[test]
    fn test_unlisten() {
        let notifier = StateNotifier::new();
        let hits = Rc::new(Cell::new(0));
        let counter = Rc::clone(&hits);
        let id = notifier.listen(Rc::new(move || counter.set(counter.get() + 1)));

        notifier.notify();
        notifier.unlisten(id);
        notifier.notify();

        assert_eq!(hits.get(), 1);
        assert_eq!(notifier.listener_count(), 0);
    }

    #[test]
    fn test_reentrant_notify() {
        let notifier = StateNotifier::new();
        let depth = Rc::new(Cell::new(0));
        let weak = Rc::downgrade(&notifier);
        let seen = Rc::clone(&depth);
        notifier.listen(Rc::new(move || {
            seen.set(seen.get() + 1);
            if seen.get() == 1 {
                if let Some(notifier) = weak.upgrade() {
                    notifier.notify();
                }
            }
        }));

        notifier.notify();
        assert_eq!(depth.get(), 2);
    }
}
