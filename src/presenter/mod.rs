//! Domain façades over observable stores.
//!
//! A processor owns a handle to one store and exposes named mutation
//! operations. Each operation is a shallow merge of the current snapshot with
//! the fields it names, plus the implied resets documented on the operation.
//! Operations never fail and return nothing: subscribers observe the result.
//!
//! # Modules
//!
//! - [`account`]: Account page state (user, account, transactions)
//! - [`auth`]: Login, two-factor, and session state
//!
//! # Stale completions
//!
//! Loads that suspend on the network take a [`Generation`] ticket before they
//! start and apply their results through
//! [`StateProcessor::apply_if_current`]. Processors advance the generation
//! whenever they discard state (`reset`, `logout`), so a load that finishes
//! after the user logged out is dropped instead of resurrecting old data.
//!
//! # Example
//!
//! ```rust
//! use bankflow::presenter::{AccountProcessor, StateProcessor};
//!
//! let molecule = AccountProcessor::launch();
//! let ticket = molecule.processor.ticket();
//!
//! molecule.processor.reset(); // user navigated away
//!
//! let applied = molecule.processor.apply_if_current(ticket, |p| p.set_loading(true));
//! assert!(!applied);
//! assert!(!molecule.store.get().is_loading);
//! ```

pub mod account;
pub mod auth;

pub use account::{AccountProcessor, AccountState};
pub use auth::{AuthProcessor, AuthState, AuthView};

use crate::store::{Generation, ObservableStore};

/// Common surface of every processor.
pub trait StateProcessor {
    /// Snapshot type held by the processor's store.
    type State: Clone + PartialEq + 'static;

    /// The store this processor mutates.
    fn store(&self) -> &ObservableStore<Self::State>;

    /// Takes a ticket for a load that is about to suspend.
    fn ticket(&self) -> Generation {
        self.store().generation()
    }

    /// Runs `apply` only if no reset happened since `ticket` was taken.
    ///
    /// Returns `true` when `apply` ran.
    fn apply_if_current<F>(&self, ticket: Generation, apply: F) -> bool
    where
        Self: Sized,
        F: FnOnce(&Self),
    {
        let current = self.store().generation();
        if current != ticket {
            tracing::debug!(%ticket, %current, "dropping stale completion");
            return false;
        }
        apply(self);
        true
    }
}

/// A store paired with the processor that mutates it.
#[derive(Debug, Clone)]
pub struct Molecule<S, P> {
    pub store: ObservableStore<S>,
    pub processor: P,
}

/// Creates a store from `initial` and builds its processor.
///
/// `build` receives a handle to the new store; the returned [`Molecule`]
/// keeps another.
pub fn launch<S, P>(initial: S, build: impl FnOnce(ObservableStore<S>) -> P) -> Molecule<S, P>
where
    S: Clone + PartialEq + 'static,
{
    launch_on(ObservableStore::new(initial), build)
}

/// Like [`launch`], for a store the caller already configured.
pub fn launch_on<S, P>(store: ObservableStore<S>, build: impl FnOnce(ObservableStore<S>) -> P) -> Molecule<S, P>
where
    S: Clone + PartialEq + 'static,
{
    let processor = build(store.clone());
    Molecule { store, processor }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Counter {
        hits: u32,
        label: &'static str,
    }

    struct CounterProcessor {
        store: ObservableStore<Counter>,
    }

    impl CounterProcessor {
        fn hit(&self) {
            self.store.update(|s| s.hits += 1);
        }
    }

    impl StateProcessor for CounterProcessor {
        type State = Counter;

        fn store(&self) -> &ObservableStore<Counter> {
            &self.store
        }
    }

    #[test]
    fn launch_shares_one_store() {
        let molecule = launch(Counter { hits: 0, label: "x" }, |store| CounterProcessor { store });
        molecule.processor.hit();
        assert_eq!(molecule.store.get().hits, 1);
        assert_eq!(molecule.store.get().label, "x");
        assert!(molecule.store.ptr_eq(molecule.processor.store()));
    }

    #[test]
    fn apply_if_current_respects_generation() {
        let molecule = launch(Counter { hits: 0, label: "x" }, |store| CounterProcessor { store });
        let ticket = molecule.processor.ticket();
        assert!(molecule.processor.apply_if_current(ticket, CounterProcessor::hit));

        molecule.store.advance_generation();
        assert!(!molecule.processor.apply_if_current(ticket, CounterProcessor::hit));
        assert_eq!(molecule.store.get().hits, 1);
    }
}
