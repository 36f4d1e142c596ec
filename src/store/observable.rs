//! The observable state container.
//!
//! # Invariants
//!
//! 1. The store holds exactly one snapshot; writes replace it atomically.
//! 2. A write equal (by `PartialEq`) to the current snapshot is a no-op: no
//!    version bump, no notifications.
//! 3. Subscribers are notified synchronously, in registration order, with the
//!    committed snapshot.
//! 4. `subscribe` delivers the current snapshot to the new subscriber before
//!    returning.
//! 5. A write issued during a fan-out is queued and committed after the fan-out
//!    completes, so every notification finishes before the next write becomes
//!    observable.
//! 6. A subscriber removed during a fan-out receives nothing further, not even
//!    the remainder of the current round.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::fmt;
use std::rc::{Rc, Weak};

use serde::Serialize;

use super::diff;
use super::subscription::{Detach, SubscriberId, Subscription};

type Callback<S> = Rc<RefCell<dyn FnMut(&S)>>;
type Describe<S> = fn(&S, &S) -> Vec<String>;

/// Counter identifying one "session" of a store's contents.
///
/// Presenters advance it when they discard state (`reset`, `logout`), so
/// asynchronous loads started earlier can tell their results are stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Generation(u64);

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "gen-{}", self.0)
    }
}

/// What happened to a value passed to [`ObservableStore::set`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    /// The value differed and was committed; subscribers have been notified.
    Committed,
    /// The value equalled the current snapshot; nothing happened.
    Unchanged,
    /// A notification round was in progress; the value was queued and will be
    /// committed (if still different) when the round completes.
    Deferred,
}

struct SubscriberEntry<S> {
    id: SubscriberId,
    callback: Callback<S>,
}

struct StoreInner<S> {
    value: Rc<S>,
    subscribers: Vec<SubscriberEntry<S>>,
    next_id: u64,
    version: u64,
    generation: u64,
    notifying: bool,
    pending: VecDeque<S>,
    describe: Option<Describe<S>>,
}

impl<S> StoreInner<S> {
    fn is_registered(&self, id: SubscriberId) -> bool {
        self.subscribers.iter().any(|entry| entry.id == id)
    }
}

impl<S> Detach for RefCell<StoreInner<S>> {
    fn detach(&self, id: SubscriberId) -> bool {
        let mut inner = self.borrow_mut();
        let before = inner.subscribers.len();
        inner.subscribers.retain(|entry| entry.id != id);
        inner.subscribers.len() != before
    }
}

/// Clears the in-progress flag when a fan-out ends, including by panic.
struct NotifyGuard<'a, S> {
    inner: &'a RefCell<StoreInner<S>>,
}

impl<S> Drop for NotifyGuard<'_, S> {
    fn drop(&mut self) {
        let mut inner = self.inner.borrow_mut();
        inner.notifying = false;
        if std::thread::panicking() {
            let dropped = inner.pending.len();
            inner.pending.clear();
            if dropped > 0 {
                tracing::warn!(dropped = dropped, "discarding queued writes after subscriber panic");
            }
        }
    }
}

/// Single-threaded observable holder of one immutable snapshot.
///
/// Cloning an `ObservableStore` creates another handle to the **same** store,
/// which is how a presenter, its page controller, and its view binders share
/// it. The store is deliberately `!Send`: one logical thread of control owns
/// all of its handles.
///
/// # Examples
///
/// ```
/// use bankflow::store::{ObservableStore, WriteOutcome};
/// use std::cell::RefCell;
/// use std::rc::Rc;
///
/// let store = ObservableStore::new(String::from("idle"));
/// let seen = Rc::new(RefCell::new(Vec::new()));
///
/// let log = Rc::clone(&seen);
/// let _sub = store.subscribe(move |s: &String| log.borrow_mut().push(s.clone()));
///
/// assert_eq!(store.set("loading".into()), WriteOutcome::Committed);
/// assert_eq!(store.set("loading".into()), WriteOutcome::Unchanged);
/// assert_eq!(*seen.borrow(), ["idle", "loading"]);
/// ```
pub struct ObservableStore<S> {
    inner: Rc<RefCell<StoreInner<S>>>,
}

impl<S> Clone for ObservableStore<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<S: fmt::Debug> fmt::Debug for ObservableStore<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("ObservableStore")
            .field("value", &inner.value)
            .field("subscribers", &inner.subscribers.len())
            .field("version", &inner.version)
            .field("generation", &inner.generation)
            .finish_non_exhaustive()
    }
}

impl<S: Clone + PartialEq + 'static> ObservableStore<S> {
    /// Creates a store holding `initial` with no subscribers.
    #[must_use]
    pub fn new(initial: S) -> Self {
        Self::build(initial, None)
    }

    /// Creates a store that logs the names of changed fields on every commit.
    ///
    /// The diff is computed only when debug logging is enabled.
    #[must_use]
    pub fn with_change_log(initial: S) -> Self
    where
        S: Serialize,
    {
        Self::build(initial, Some(diff::changed_fields::<S>))
    }

    fn build(initial: S, describe: Option<Describe<S>>) -> Self {
        Self {
            inner: Rc::new(RefCell::new(StoreInner {
                value: Rc::new(initial),
                subscribers: Vec::new(),
                next_id: 0,
                version: 0,
                generation: 0,
                notifying: false,
                pending: VecDeque::new(),
                describe,
            })),
        }
    }

    /// Returns the current snapshot. O(1); no side effects.
    #[must_use]
    pub fn get(&self) -> Rc<S> {
        Rc::clone(&self.inner.borrow().value)
    }

    /// Runs `f` against the current snapshot.
    ///
    /// The snapshot is detached from the store before `f` runs, so `f` may
    /// freely write to the store.
    pub fn with<R>(&self, f: impl FnOnce(&S) -> R) -> R {
        let snapshot = self.get();
        f(&snapshot)
    }

    /// Replaces the snapshot with `next` if it differs from the current one,
    /// then notifies every subscriber in registration order.
    pub fn set(&self, next: S) -> WriteOutcome {
        {
            let mut inner = self.inner.borrow_mut();
            if inner.notifying {
                inner.pending.push_back(next);
                tracing::debug!(queued = inner.pending.len(), "write deferred until notification completes");
                return WriteOutcome::Deferred;
            }
        }

        let outcome = match self.commit(next) {
            Some(snapshot) => {
                self.notify(&snapshot);
                WriteOutcome::Committed
            }
            None => WriteOutcome::Unchanged,
        };

        self.drain_pending();
        outcome
    }

    /// Clones the current snapshot, lets `f` edit the copy, and writes it back.
    ///
    /// This is the shallow-merge primitive presenters build on: fields `f`
    /// does not touch keep their current values.
    pub fn update(&self, f: impl FnOnce(&mut S)) -> WriteOutcome {
        let mut draft = S::clone(&self.get());
        f(&mut draft);
        self.set(draft)
    }

    /// Registers `callback`, invokes it once with the current snapshot, and
    /// returns the handle that removes it.
    pub fn subscribe(&self, callback: impl FnMut(&S) + 'static) -> Subscription {
        let callback: Callback<S> = Rc::new(RefCell::new(callback));

        let (id, snapshot, nested) = {
            let mut inner = self.inner.borrow_mut();
            let id = SubscriberId(inner.next_id);
            inner.next_id += 1;
            inner.subscribers.push(SubscriberEntry {
                id,
                callback: Rc::clone(&callback),
            });
            let nested = inner.notifying;
            inner.notifying = true;
            (id, Rc::clone(&inner.value), nested)
        };

        tracing::debug!(subscriber = %id, "subscriber registered");
        if nested {
            // the enclosing round drains whatever the replay queues
            Self::invoke(id, &callback, &snapshot);
        } else {
            {
                let _guard = NotifyGuard { inner: &self.inner };
                Self::invoke(id, &callback, &snapshot);
            }
            self.drain_pending();
        }

        let inner: Rc<RefCell<StoreInner<S>>> = Rc::clone(&self.inner);
        let weak: Weak<dyn Detach> = Rc::downgrade(&inner) as Weak<dyn Detach>;
        Subscription::new(id, weak)
    }

    /// Number of currently registered subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.inner.borrow().subscribers.len()
    }

    /// Number of committed writes since construction.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.inner.borrow().version
    }

    /// The store's current generation.
    #[must_use]
    pub fn generation(&self) -> Generation {
        Generation(self.inner.borrow().generation)
    }

    /// Starts a new generation, invalidating every ticket taken before.
    pub fn advance_generation(&self) -> Generation {
        let mut inner = self.inner.borrow_mut();
        inner.generation += 1;
        tracing::debug!(generation = inner.generation, "store generation advanced");
        Generation(inner.generation)
    }

    /// Returns `true` if `ticket` was taken in the current generation.
    #[must_use]
    pub fn is_current(&self, ticket: Generation) -> bool {
        self.generation() == ticket
    }

    /// Returns `true` if both handles refer to the same store.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    /// Swaps in `next` when it differs, returning the committed snapshot.
    fn commit(&self, next: S) -> Option<Rc<S>> {
        let mut inner = self.inner.borrow_mut();
        if *inner.value == next {
            tracing::trace!("write equals current snapshot, skipping");
            return None;
        }

        if let Some(describe) = inner.describe {
            if tracing::enabled!(tracing::Level::DEBUG) {
                let changes = describe(&inner.value, &next);
                tracing::debug!(version = inner.version + 1, changes = ?changes, "state changed");
            }
        }

        inner.value = Rc::new(next);
        inner.version += 1;
        Some(Rc::clone(&inner.value))
    }

    fn notify(&self, snapshot: &Rc<S>) {
        let targets: Vec<(SubscriberId, Callback<S>)> = {
            let mut inner = self.inner.borrow_mut();
            inner.notifying = true;
            inner
                .subscribers
                .iter()
                .map(|entry| (entry.id, Rc::clone(&entry.callback)))
                .collect()
        };
        let _guard = NotifyGuard { inner: &self.inner };

        let _span = tracing::trace_span!("notify", subscribers = targets.len()).entered();

        for (id, callback) in &targets {
            if !self.inner.borrow().is_registered(*id) {
                tracing::trace!(subscriber = %id, "skipping subscriber removed mid-notification");
                continue;
            }
            Self::invoke(*id, callback, snapshot);
        }
    }

    fn drain_pending(&self) {
        loop {
            let next = {
                let mut inner = self.inner.borrow_mut();
                if inner.notifying {
                    return;
                }
                match inner.pending.pop_front() {
                    Some(next) => next,
                    None => return,
                }
            };

            if let Some(snapshot) = self.commit(next) {
                self.notify(&snapshot);
            }
        }
    }

    fn invoke(id: SubscriberId, callback: &Callback<S>, snapshot: &S) {
        match callback.try_borrow_mut() {
            Ok(mut callback) => (*callback)(snapshot),
            Err(_) => {
                tracing::warn!(subscriber = %id, "subscriber re-entered itself, skipping delivery");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn recorder<S: Clone + 'static>() -> (Rc<RefCell<Vec<S>>>, impl FnMut(&S) + 'static) {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        (seen, move |s: &S| sink.borrow_mut().push(s.clone()))
    }

    #[test]
    fn subscribe_replays_current_value_once() {
        let store = ObservableStore::new(5_i32);
        let (seen, cb) = recorder::<i32>();
        let _sub = store.subscribe(cb);
        assert_eq!(*seen.borrow(), vec![5]);
    }

    #[test]
    fn equal_write_is_a_noop() {
        let store = ObservableStore::new(vec![1, 2]);
        let (seen, cb) = recorder::<Vec<i32>>();
        let _sub = store.subscribe(cb);

        assert_eq!(store.set(vec![1, 2]), WriteOutcome::Unchanged);
        assert_eq!(store.version(), 0);
        assert_eq!(seen.borrow().len(), 1);
    }

    #[test]
    fn get_is_shared_not_copied() {
        let store = ObservableStore::new(String::from("x"));
        assert!(Rc::ptr_eq(&store.get(), &store.get()));
    }

    #[test]
    fn write_from_subscriber_is_deferred_until_round_completes() {
        let store = ObservableStore::new(0_u32);
        let order = Rc::new(RefCell::new(Vec::new()));

        let writer = store.clone();
        let log = Rc::clone(&order);
        let _a = store.subscribe(move |v: &u32| {
            log.borrow_mut().push(format!("a{v}"));
            if *v == 1 {
                assert_eq!(writer.set(2), WriteOutcome::Deferred);
            }
        });
        let log = Rc::clone(&order);
        let _b = store.subscribe(move |v: &u32| log.borrow_mut().push(format!("b{v}")));

        assert_eq!(store.set(1), WriteOutcome::Committed);
        assert_eq!(*store.get(), 2);
        assert_eq!(*order.borrow(), ["a0", "b0", "a1", "b1", "a2", "b2"]);
    }

    #[test]
    fn unsubscribe_during_round_stops_later_delivery() {
        let store = ObservableStore::new(0_u32);
        let b_calls = Rc::new(Cell::new(0));

        let handle: Rc<RefCell<Option<Subscription>>> = Rc::new(RefCell::new(None));
        let to_remove = Rc::clone(&handle);
        let _a = store.subscribe(move |v: &u32| {
            if *v == 1 {
                if let Some(sub) = to_remove.borrow().as_ref() {
                    sub.unsubscribe();
                }
            }
        });
        let counter = Rc::clone(&b_calls);
        let b = store.subscribe(move |_| counter.set(counter.get() + 1));
        *handle.borrow_mut() = Some(b);

        store.set(1);
        store.set(2);
        assert_eq!(b_calls.get(), 1, "only the replay reached b");
        assert_eq!(store.subscriber_count(), 1);
    }

    #[test]
    fn panicking_subscriber_leaves_store_usable() {
        let store = ObservableStore::new(0_u32);
        let _boom = store.subscribe(|v: &u32| {
            if *v == 1 {
                panic!("render failed");
            }
        });

        let writer = store.clone();
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| writer.set(1)));
        assert!(result.is_err());
        assert_eq!(*store.get(), 1);

        assert_eq!(store.set(3), WriteOutcome::Committed);
    }

    #[test]
    fn generations_invalidate_old_tickets() {
        let store = ObservableStore::new(());
        let ticket = store.generation();
        assert!(store.is_current(ticket));
        store.advance_generation();
        assert!(!store.is_current(ticket));
    }

    #[test]
    fn subscription_does_not_keep_store_alive() {
        let store = ObservableStore::new(1_u8);
        let sub = store.subscribe(|_| {});
        drop(store);
        assert!(!sub.is_active());
        assert!(!sub.unsubscribe());
    }

    #[test]
    fn write_during_replay_reaches_the_new_subscriber() {
        let store = ObservableStore::new(0_u32);
        let (early, cb) = recorder::<u32>();
        let _early = store.subscribe(cb);

        let writer = store.clone();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let log = Rc::clone(&seen);
        let _sub = store.subscribe(move |v: &u32| {
            log.borrow_mut().push(*v);
            if *v == 0 {
                assert_eq!(writer.set(1), WriteOutcome::Deferred);
            }
        });

        assert_eq!(*store.get(), 1);
        assert_eq!(*seen.borrow(), vec![0, 1]);
        assert_eq!(*early.borrow(), vec![0, 1]);
    }

    #[test]
    fn subscribe_inside_a_round_replays_without_ending_it() {
        let store = ObservableStore::new(0_u32);
        let nested = Rc::new(RefCell::new(Vec::new()));

        let inner_store = store.clone();
        let log = Rc::clone(&nested);
        let subs = Rc::new(RefCell::new(Vec::new()));
        let keep = Rc::clone(&subs);
        let _outer = store.subscribe(move |v: &u32| {
            if *v == 1 {
                let log = Rc::clone(&log);
                keep.borrow_mut()
                    .push(inner_store.subscribe(move |v: &u32| log.borrow_mut().push(*v)));
                assert_eq!(inner_store.set(2), WriteOutcome::Deferred);
            }
        });

        store.set(1);
        assert_eq!(*store.get(), 2);
        assert_eq!(*nested.borrow(), vec![1, 2]);
    }
}
