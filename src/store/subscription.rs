//! Subscription handles returned by [`ObservableStore::subscribe`].
//!
//! [`ObservableStore::subscribe`]: super::ObservableStore::subscribe

use std::cell::Cell;
use std::fmt;
use std::rc::Weak;

/// Identity of one registration in a store's subscriber list.
///
/// Allocated monotonically per store, never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriberId(pub(crate) u64);

impl fmt::Display for SubscriberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Removal side of a store, erased over the snapshot type.
pub(crate) trait Detach {
    /// Removes the subscriber, returning `true` if it was still registered.
    fn detach(&self, id: SubscriberId) -> bool;
}

/// Handle that deregisters one subscriber from its store.
///
/// The handle references the store weakly: holding it never keeps a store
/// alive, and releasing it after the store is gone is a no-op. Dropping the
/// handle does **not** unsubscribe; the callback stays registered until
/// [`unsubscribe`](Self::unsubscribe) is called or the store is dropped.
///
/// # Examples
///
/// ```
/// use bankflow::store::ObservableStore;
///
/// let store = ObservableStore::new(0_u32);
/// let sub = store.subscribe(|_| {});
/// assert_eq!(store.subscriber_count(), 1);
///
/// assert!(sub.unsubscribe());
/// assert!(!sub.unsubscribe()); // second release is a no-op
/// assert_eq!(store.subscriber_count(), 0);
/// ```
pub struct Subscription {
    id: SubscriberId,
    store: Weak<dyn Detach>,
    released: Cell<bool>,
}

impl Subscription {
    pub(crate) fn new(id: SubscriberId, store: Weak<dyn Detach>) -> Self {
        Self {
            id,
            store,
            released: Cell::new(false),
        }
    }

    /// Removes the subscriber from its store.
    ///
    /// Returns `true` only on the call that actually removed it. Later calls,
    /// or calls after the store was dropped, return `false` and touch nothing
    /// else: another subscriber is never removed by a stale handle.
    pub fn unsubscribe(&self) -> bool {
        if self.released.replace(true) {
            tracing::trace!(subscriber = %self.id, "subscription already released");
            return false;
        }

        let removed = self
            .store
            .upgrade()
            .is_some_and(|store| store.detach(self.id));

        tracing::debug!(subscriber = %self.id, removed = removed, "unsubscribed");
        removed
    }

    /// Returns `true` while the handle is unreleased and its store is alive.
    #[must_use]
    pub fn is_active(&self) -> bool {
        !self.released.get() && self.store.strong_count() > 0
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("released", &self.released.get())
            .field("store_alive", &(self.store.strong_count() > 0))
            .finish()
    }
}
