//! Login page controller.
//!
//! Drives an [`AuthProcessor`] through password login, the optional
//! two-factor challenge, form switching, and sign-out.

use super::actions::AuthAction;
use super::handler::{describe, Page};
use crate::api::BankApi;
use crate::domain::{LoginResponse, TokenGrant};
use crate::presenter::{AuthProcessor, AuthView, StateProcessor};
use crate::store::Generation;

pub const MISSING_CREDENTIALS: &str = "Username and password are required";
pub const NO_PENDING_CHALLENGE: &str = "No pending two-factor challenge";
pub const MISSING_CODE: &str = "Verification code is required";

/// Events the login page reacts to.
#[derive(Clone, PartialEq, Eq)]
pub enum AuthEvent {
    Login { username: String, password: String },
    VerifyTwoFactor { code: String },
    ShowView(AuthView),
    Logout,
}

// Keeps passwords and codes out of the event span.
impl std::fmt::Debug for AuthEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Login { username, .. } => f
                .debug_struct("Login")
                .field("username", username)
                .finish_non_exhaustive(),
            Self::VerifyTwoFactor { .. } => f.debug_struct("VerifyTwoFactor").finish_non_exhaustive(),
            Self::ShowView(view) => f.debug_tuple("ShowView").field(view).finish(),
            Self::Logout => f.write_str("Logout"),
        }
    }
}

/// Controller for the login page.
pub struct LoginPage<A> {
    processor: AuthProcessor,
    api: A,
}

impl<A: BankApi> LoginPage<A> {
    pub fn new(processor: AuthProcessor, api: A) -> Self {
        Self { processor, api }
    }

    #[must_use]
    pub fn processor(&self) -> &AuthProcessor {
        &self.processor
    }

    /// Consumes the page, handing the backend back to the shell.
    pub fn into_api(self) -> A {
        self.api
    }

    fn login(&mut self, username: &str, password: &str) -> Vec<AuthAction> {
        let username = username.trim();
        if username.is_empty() || password.is_empty() {
            self.processor.set_error(MISSING_CREDENTIALS);
            return Vec::new();
        }

        let ticket = self.processor.ticket();
        self.processor.set_loading(true);

        match self.api.login(username, password) {
            Ok(LoginResponse::Granted(grant)) => self.complete(ticket, grant),
            Ok(LoginResponse::TwoFactorRequired { temp_token, secret }) => {
                tracing::info!(username = %username, "two-factor verification required");
                self.processor
                    .apply_if_current(ticket, |p| p.set_2fa_required(temp_token, secret));
                Vec::new()
            }
            Err(err) => {
                tracing::warn!(username = %username, error = %err, "login failed");
                let message = describe(&err, "Login failed");
                self.processor.apply_if_current(ticket, |p| p.set_error(message));
                Vec::new()
            }
        }
    }

    fn verify(&mut self, code: &str) -> Vec<AuthAction> {
        let Some(temp_token) = self.processor.state().temp_token.clone() else {
            self.processor.set_error(NO_PENDING_CHALLENGE);
            return Vec::new();
        };
        if code.trim().is_empty() {
            self.processor.set_error(MISSING_CODE);
            return Vec::new();
        }

        let ticket = self.processor.ticket();
        self.processor.set_loading(true);

        match self.api.verify_two_factor(&temp_token, code.trim()) {
            Ok(grant) => self.complete(ticket, grant),
            Err(err) => {
                tracing::warn!(error = %err, "two-factor verification failed");
                let message = describe(&err, "Verification failed");
                self.processor.apply_if_current(ticket, |p| p.set_error(message));
                Vec::new()
            }
        }
    }

    /// Records a granted session and tells the shell to move on.
    fn complete(&mut self, ticket: Generation, grant: TokenGrant) -> Vec<AuthAction> {
        let token = grant.access_token.clone();
        let applied = self
            .processor
            .apply_if_current(ticket, |p| p.set_authenticated(grant.access_token, grant.user));
        if !applied {
            return Vec::new();
        }

        tracing::info!("signed in");
        vec![AuthAction::StoreToken(token), AuthAction::OpenAccountPage]
    }
}

impl<A: BankApi> Page for LoginPage<A> {
    type Event = AuthEvent;
    type Action = AuthAction;

    fn name(&self) -> &'static str {
        "login"
    }

    fn on_event(&mut self, event: &AuthEvent) -> Vec<AuthAction> {
        match event {
            AuthEvent::Login { username, password } => self.login(username, password),
            AuthEvent::VerifyTwoFactor { code } => self.verify(code),
            AuthEvent::ShowView(view) => {
                self.processor.set_view(*view);
                Vec::new()
            }
            AuthEvent::Logout => {
                self.processor.logout();
                vec![AuthAction::ClearToken]
            }
        }
    }
}
