//! Typed publish/subscribe channel with no persisted history.
//!
//! A [`BroadcastChannel`] is a cheap, cloneable handle to a shared subscriber
//! list. It is meant to be created by whoever owns a scope (for example one
//! viewer) and handed to exactly the components that need it.
//!
//! Subscribing returns a [`Subscription`] guard; dropping the guard removes the
//! subscriber. Publishing delivers to the subscribers registered when the
//! publish began. A subscriber removed mid-publish (even by its own callback)
//! is skipped from that point on, and subscribers added mid-publish only see
//! later events.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use tracing::trace;

type Callback<E> = Rc<dyn Fn(&E)>;

struct Registry<E> {
    next_id: u64,
    subscribers: Vec<(u64, Callback<E>)>,
}

impl<E> Registry<E> {
    fn contains(&self, id: u64) -> bool {
        self.subscribers.iter().any(|(sid, _)| *sid == id)
    }

    fn remove(&mut self, id: u64) -> Option<Callback<E>> {
        let position = self.subscribers.iter().position(|(sid, _)| *sid == id)?;
        Some(self.subscribers.remove(position).1)
    }
}

/// A single-threaded broadcast bus for events of type `E`.
pub struct BroadcastChannel<E> {
    registry: Rc<RefCell<Registry<E>>>,
}

impl<E: 'static> BroadcastChannel<E> {
    /// Creates a channel with no subscribers.
    #[must_use]
    pub fn new() -> Self {
        Self {
            registry: Rc::new(RefCell::new(Registry {
                next_id: 0,
                subscribers: Vec::new(),
            })),
        }
    }

    /// Registers `callback` for every subsequent publish.
    ///
    /// The subscription lasts as long as the returned guard.
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&E) + 'static,
    {
        let id = {
            let mut registry = self.registry.borrow_mut();
            let id = registry.next_id;
            registry.next_id += 1;
            registry.subscribers.push((id, Rc::new(callback)));
            id
        };

        let registry: Weak<RefCell<Registry<E>>> = Rc::downgrade(&self.registry);
        Subscription {
            release: Some(Box::new(move || {
                if let Some(registry) = registry.upgrade() {
                    // The callback is dropped after the borrow ends, so a
                    // callback owning other guards cannot re-enter a held borrow.
                    let removed = registry.borrow_mut().remove(id);
                    drop(removed);
                }
            })),
        }
    }

    /// Delivers `event` to every live subscriber, in subscription order.
    ///
    /// Returns the number of subscribers that received the event.
    pub fn publish(&self, event: &E) -> usize {
        let snapshot: Vec<(u64, Callback<E>)> = self.registry.borrow().subscribers.clone();

        let mut delivered = 0;
        for (id, callback) in snapshot {
            if !self.registry.borrow().contains(id) {
                continue;
            }
            callback(event);
            delivered += 1;
        }
        trace!(delivered, "event published");
        delivered
    }

    /// Returns the number of live subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.registry.borrow().subscribers.len()
    }
}

impl<E: 'static> Default for BroadcastChannel<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> Clone for BroadcastChannel<E> {
    fn clone(&self) -> Self {
        Self {
            registry: Rc::clone(&self.registry),
        }
    }
}

impl<E> fmt::Debug for BroadcastChannel<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BroadcastChannel")
            .field("subscribers", &self.registry.borrow().subscribers.len())
            .finish()
    }
}

/// Guard that keeps a subscriber registered until dropped.
#[must_use = "dropping a subscription unsubscribes immediately"]
pub struct Subscription {
    release: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    /// Removes the subscriber now.
    pub fn unsubscribe(mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.release.is_some())
            .finish()
    }
}
