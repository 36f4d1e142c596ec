//! Authentication state and its processor.
//!
//! Covers the password login, the two-factor challenge that may follow it,
//! and switching between the login, registration, and two-factor views.

use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use super::{launch_on, Molecule, StateProcessor};
use crate::domain::User;
use crate::store::ObservableStore;

/// Which form the login page shows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AuthView {
    #[default]
    Login,
    Register,
    #[serde(rename = "twofa-setup")]
    TwoFaSetup,
    #[serde(rename = "twofa-verify")]
    TwoFaVerify,
}

impl AuthView {
    /// Stable identifier, matching the serialized form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Login => "login",
            Self::Register => "register",
            Self::TwoFaSetup => "twofa-setup",
            Self::TwoFaVerify => "twofa-verify",
        }
    }
}

impl fmt::Display for AuthView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Session and login-form state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthState {
    pub is_authenticated: bool,
    pub auth_token: Option<String>,
    /// Short-lived token issued with a two-factor challenge.
    pub temp_token: Option<String>,
    pub two_fa_required: bool,
    /// TOTP secret shown while setting up two-factor authentication.
    pub two_fa_secret: Option<String>,
    pub user: Option<User>,
    pub is_loading: bool,
    pub error: Option<String>,
    pub current_view: AuthView,
}

/// Named mutations over an [`AuthState`] store.
#[derive(Debug, Clone)]
pub struct AuthProcessor {
    store: ObservableStore<AuthState>,
    initial: Rc<AuthState>,
}

impl AuthProcessor {
    /// Wraps `store`, capturing its current snapshot as the logout target.
    #[must_use]
    pub fn new(store: ObservableStore<AuthState>) -> Self {
        let initial = store.get();
        Self { store, initial }
    }

    /// Creates a signed-out auth store with change logging and its processor.
    #[must_use]
    pub fn launch() -> Molecule<AuthState, Self> {
        launch_on(ObservableStore::with_change_log(AuthState::default()), Self::new)
    }

    #[must_use]
    pub fn state(&self) -> Rc<AuthState> {
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

    /// Marks the session signed in with `token`.
    ///
    /// `user` replaces the stored user even when `None`.
    pub fn set_authenticated(&self, token: impl Into<String>, user: Option<User>) {
        let token = token.into();
        self.store.update(|s| {
            s.is_authenticated = true;
            s.auth_token = Some(token);
            s.user = user;
            s.is_loading = false;
            s.error = None;
        });
    }

    /// Records a pending two-factor challenge and switches to the setup view.
    pub fn set_2fa_required(&self, temp_token: impl Into<String>, secret: impl Into<String>) {
        let (temp_token, secret) = (temp_token.into(), secret.into());
        self.store.update(|s| {
            s.two_fa_required = true;
            s.temp_token = Some(temp_token);
            s.two_fa_secret = Some(secret);
            s.current_view = AuthView::TwoFaSetup;
            s.is_loading = false;
            s.error = None;
        });
    }

    /// Switches forms, dismissing any error from the previous one.
    pub fn set_view(&self, view: AuthView) {
        self.store.update(|s| {
            s.current_view = view;
            s.error = None;
        });
    }

    /// Returns to the initial signed-out snapshot on the login view and
    /// invalidates outstanding tickets.
    pub fn logout(&self) {
        self.store.advance_generation();
        self.store.set(AuthState {
            current_view: AuthView::Login,
            ..AuthState::clone(&self.initial)
        });
    }
}

impl StateProcessor for AuthProcessor {
    type State = AuthState;

    fn store(&self) -> &ObservableStore<AuthState> {
        &self.store
    }
}
