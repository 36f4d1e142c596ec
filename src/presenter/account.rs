//! Account page state and its processor.

use std::rc::Rc;

use serde::{Deserialize, Serialize};

use super::{launch_on, Molecule, StateProcessor};
use crate::domain::{Account, Transaction, User};
use crate::store::ObservableStore;

/// Everything the account page renders.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountState {
    pub user: Option<User>,
    pub account: Option<Account>,
    pub transactions: Vec<Transaction>,
    pub is_loading: bool,
    /// Message for the error banner. `None` hides the banner.
    pub error: Option<String>,
}

/// Named mutations over an [`AccountState`] store.
///
/// Cloning yields another handle to the same store.
#[derive(Debug, Clone)]
pub struct AccountProcessor {
    store: ObservableStore<AccountState>,
    initial: Rc<AccountState>,
}

impl AccountProcessor {
    /// Wraps `store`, capturing its current snapshot as the reset target.
    #[must_use]
    pub fn new(store: ObservableStore<AccountState>) -> Self {
        let initial = store.get();
        Self { store, initial }
    }

    /// Creates an empty account store with change logging and its processor.
    #[must_use]
    pub fn launch() -> Molecule<AccountState, Self> {
        launch_on(ObservableStore::with_change_log(AccountState::default()), Self::new)
    }

    /// Current snapshot.
    #[must_use]
    pub fn state(&self) -> Rc<AccountState> {
        self.store.get()
    }

    pub fn set_loading(&self, is_loading: bool) {
        self.store.update(|s| s.is_loading = is_loading);
    }

    /// Shows `error` and stops the loading indicator.
    pub fn set_error(&self, error: impl Into<String>) {
        let error = error.into();
        self.store.update(|s| {
            s.error = Some(error);
            s.is_loading = false;
        });
    }

    /// Stores the signed-in user and clears any error.
    ///
    /// Leaves `is_loading` alone: the account fetch usually follows.
    pub fn set_user(&self, user: User) {
        self.store.update(|s| {
            s.user = Some(user);
            s.error = None;
        });
    }

    /// Stores the account, clearing the error and the loading indicator.
    pub fn set_account(&self, account: Account) {
        self.store.update(|s| {
            s.account = Some(account);
            s.is_loading = false;
            s.error = None;
        });
    }

    /// Stores the transaction list, clearing the error and the loading indicator.
    pub fn set_transactions(&self, transactions: Vec<Transaction>) {
        self.store.update(|s| {
            s.transactions = transactions;
            s.is_loading = false;
            s.error = None;
        });
    }

    /// Replaces every field at once, as after a combined fetch.
    pub fn load_full_state(&self, user: User, account: Account, transactions: Vec<Transaction>) {
        self.store.set(AccountState {
            user: Some(user),
            account: Some(account),
            transactions,
            is_loading: false,
            error: None,
        });
    }

    /// Restores the initial snapshot and invalidates outstanding tickets.
    pub fn reset(&self) {
        self.store.advance_generation();
        self.store.set(AccountState::clone(&self.initial));
    }
}

impl StateProcessor for AccountProcessor {
    type State = AccountState;

    fn store(&self) -> &ObservableStore<AccountState> {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alice() -> User {
        User {
            id: 1,
            username: "alice".into(),
            name: Some("Alice".into()),
        }
    }

    fn account(balance: &str) -> Account {
        Account {
            id: 1,
            user_id: 1,
            balance: balance.into(),
            routing_number: "021000021".into(),
            account_number: "000123456789".into(),
            is_bank_linked: false,
            is_bank_verified: false,
        }
    }

    #[test]
    fn set_error_stops_loading() {
        let m = AccountProcessor::launch();
        m.processor.set_loading(true);
        m.processor.set_error("boom");

        let s = m.store.get();
        assert_eq!(s.error.as_deref(), Some("boom"));
        assert!(!s.is_loading);
    }

    #[test]
    fn set_user_keeps_loading_but_clears_error() {
        let m = AccountProcessor::launch();
        m.processor.set_loading(true);
        m.processor.set_error("stale");
        m.processor.set_loading(true);
        m.processor.set_user(alice());

        let s = m.store.get();
        assert!(s.is_loading);
        assert_eq!(s.error, None);
        assert_eq!(s.user, Some(alice()));
    }

    #[test]
    fn set_account_and_transactions_clear_loading() {
        let m = AccountProcessor::launch();
        m.processor.set_loading(true);
        m.processor.set_account(account("10.00"));
        assert!(!m.store.get().is_loading);

        m.processor.set_loading(true);
        m.processor.set_transactions(Vec::new());
        assert!(!m.store.get().is_loading);
        assert_eq!(m.store.get().account, Some(account("10.00")));
    }

    #[test]
    fn repeated_error_is_not_renotified() {
        let m = AccountProcessor::launch();
        m.processor.set_error("same");
        let version = m.store.version();
        m.processor.set_error("same");
        assert_eq!(m.store.version(), version);
    }

    #[test]
    fn load_full_state_replaces_everything() {
        let m = AccountProcessor::launch();
        m.processor.set_error("old");
        m.processor.load_full_state(alice(), account("5.00"), Vec::new());

        let s = m.store.get();
        assert_eq!(s.error, None);
        assert_eq!(s.account.as_ref().map(|a| a.balance.as_str()), Some("5.00"));
    }

    #[test]
    fn reset_restores_initial_and_bumps_generation() {
        let m = AccountProcessor::launch();
        let before = m.store.generation();
        m.processor.set_user(alice());
        m.processor.reset();

        assert_eq!(*m.store.get(), AccountState::default());
        assert_ne!(m.store.generation(), before);
    }
}
