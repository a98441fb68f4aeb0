//! Subscriber registry with synchronous fan-out
//!
//! Callbacks run in subscription order. [`SubscriberSet::notify`] iterates
//! over a copy of the registry taken when the notification starts, and checks
//! membership before each call, so:
//!
//! - a callback subscribed during a notification is first called by the next one
//! - a callback unsubscribed during a notification is not called again
//!
//! No borrow of the registry is held while a callback runs, which is what
//! allows callbacks to subscribe or unsubscribe from inside a notification.

use super::state::{RunState, Visualization};
use std::cell::RefCell;
use std::rc::{Rc, Weak};

type Callback<V> = Rc<dyn Fn(&RunState<V>)>;

struct Registry<V: Visualization> {
    next_id: u64,
    entries: Vec<(u64, Callback<V>)>,
}

/// Type-erased removal hook so [`Subscription`] does not carry the driver type
trait Detach {
    fn detach(&self, id: u64);
}

impl<V: Visualization> Detach for RefCell<Registry<V>> {
    fn detach(&self, id: u64) {
        self.borrow_mut().entries.retain(|(entry_id, _)| *entry_id != id);
    }
}

/// Shared handle to the callbacks registered with one state container
pub struct SubscriberSet<V: Visualization> {
    inner: Rc<RefCell<Registry<V>>>,
}

impl<V: Visualization> SubscriberSet<V> {
    pub fn new() -> Self {
        SubscriberSet {
            inner: Rc::new(RefCell::new(Registry {
                next_id: 0,
                entries: Vec::new(),
            })),
        }
    }

    /// Register a callback. It is not invoked until the next notification.
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&RunState<V>) + 'static,
    {
        let id = {
            let mut registry = self.inner.borrow_mut();
            let id = registry.next_id;
            registry.next_id += 1;
            registry.entries.push((id, Rc::new(callback)));
            id
        };

        let erased: Rc<dyn Detach> = self.inner.clone();
        Subscription {
            id,
            registry: Rc::downgrade(&erased),
        }
    }

    /// Invoke every current subscriber with `state`
    pub fn notify(&self, state: &RunState<V>) {
        let targets: Vec<(u64, Callback<V>)> = self.inner.borrow().entries.clone();
        for (id, callback) in targets {
            if self.contains(id) {
                callback(state);
            }
        }
    }

    fn contains(&self, id: u64) -> bool {
        self.inner
            .borrow()
            .entries
            .iter()
            .any(|(entry_id, _)| *entry_id == id)
    }

    pub fn len(&self) -> usize {
        self.inner.borrow().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<V: Visualization> Clone for SubscriberSet<V> {
    fn clone(&self) -> Self {
        SubscriberSet {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<V: Visualization> Default for SubscriberSet<V> {
    fn default() -> Self {
        Self::new()
    }
}

/// Handle returned by `subscribe`
///
/// Dropping the handle leaves the callback registered; call
/// [`Subscription::unsubscribe`] to remove it. Unsubscribing is idempotent and
/// does nothing once the container itself is gone.
pub struct Subscription {
    id: u64,
    registry: Weak<dyn Detach>,
}

impl Subscription {
    pub fn unsubscribe(&self) {
        if let Some(registry) = self.registry.upgrade() {
            registry.detach(self.id);
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[derive(Debug, Clone)]
    struct Probe;

    impl Visualization for Probe {
        type Kind = ();
        type Snapshot = ();
        type Output = ();
        type Solution = ();
        type View = u32;
    }

    #[test]
    fn test_callbacks_run_in_subscription_order() {
        let set: SubscriberSet<Probe> = SubscriberSet::new();
        let order = Rc::new(RefCell::new(Vec::new()));

        for tag in 0..3 {
            let order = Rc::clone(&order);
            let _ = set.subscribe(move |_| order.borrow_mut().push(tag));
        }
        set.notify(&RunState::default());

        assert_eq!(*order.borrow(), vec![0, 1, 2]);
    }

    #[test]
    fn test_unsubscribe_is_idempotent() {
        let set: SubscriberSet<Probe> = SubscriberSet::new();
        let calls = Rc::new(Cell::new(0));
        let counter = Rc::clone(&calls);
        let sub = set.subscribe(move |_| counter.set(counter.get() + 1));

        set.notify(&RunState::default());
        sub.unsubscribe();
        sub.unsubscribe();
        set.notify(&RunState::default());

        assert_eq!(calls.get(), 1);
        assert!(set.is_empty());
    }

    #[test]
    fn test_subscribe_during_notify_waits_for_next_round() {
        let set: SubscriberSet<Probe> = SubscriberSet::new();
        let late_calls = Rc::new(Cell::new(0));

        let registrar = set.clone();
        let late = Rc::clone(&late_calls);
        let added = Rc::new(Cell::new(false));
        let _ = set.subscribe(move |_| {
            if !added.get() {
                added.set(true);
                let late = Rc::clone(&late);
                let _ = registrar.subscribe(move |_| late.set(late.get() + 1));
            }
        });

        set.notify(&RunState::default());
        assert_eq!(late_calls.get(), 0);

        set.notify(&RunState::default());
        assert_eq!(late_calls.get(), 1);
    }

    #[test]
    fn test_unsubscribe_during_notify_skips_removed_callback() {
        let set: SubscriberSet<Probe> = SubscriberSet::new();
        let second_calls = Rc::new(Cell::new(0));
        let slot: Rc<RefCell<Option<Subscription>>> = Rc::new(RefCell::new(None));

        let victim = Rc::clone(&slot);
        let _ = set.subscribe(move |_| {
            if let Some(sub) = victim.borrow().as_ref() {
                sub.unsubscribe();
            }
        });
        let counter = Rc::clone(&second_calls);
        let second = set.subscribe(move |_| counter.set(counter.get() + 1));
        *slot.borrow_mut() = Some(second);

        set.notify(&RunState::default());
        set.notify(&RunState::default());

        assert_eq!(second_calls.get(), 0);
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_unsubscribe_after_registry_dropped() {
        let set: SubscriberSet<Probe> = SubscriberSet::new();
        let sub = set.subscribe(|_| {});
        drop(set);
        sub.unsubscribe();
    }
}
