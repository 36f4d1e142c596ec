//! Account page controller.
//!
//! Loads the signed-in user, their account, and its transactions into an
//! [`AccountProcessor`], handles deposits, and signs out.

use super::actions::{AccountAction, DepositMessage};
use super::handler::{describe, Page};
use crate::api::BankApi;
use crate::domain::{parse_amount, DepositRequest};
use crate::presenter::{AccountProcessor, StateProcessor};
use crate::store::Generation;

/// Shown when the deposit amount is missing, unparsable, or not positive.
pub const INVALID_AMOUNT: &str = "Please enter a valid positive amount";
/// Shown after a deposit succeeds.
pub const DEPOSIT_SUCCESS: &str = "Deposit successful!";

/// Events the account page reacts to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccountEvent {
    /// Initial page load.
    Load,
    /// The refresh button; identical to `Load`.
    Refresh,
    /// Deposit form submission with the raw text the user typed.
    Deposit { amount: String },
    Logout,
}

/// Controller for the account page.
pub struct AccountPage<A> {
    processor: AccountProcessor,
    api: A,
    token: Option<String>,
}

impl<A: BankApi> AccountPage<A> {
    /// Creates the page. `token` is the persisted session token, if any.
    pub fn new(processor: AccountProcessor, api: A, token: Option<String>) -> Self {
        Self { processor, api, token }
    }

    #[must_use]
    pub fn processor(&self) -> &AccountProcessor {
        &self.processor
    }

    #[must_use]
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    #[must_use]
    pub fn api(&self) -> &A {
        &self.api
    }

    /// Fetches user, account, then transactions.
    ///
    /// A rejected token sends the user back to the login page. Any other user
    /// or account failure lands in the error banner. A transaction failure
    /// only replaces the transaction table.
    fn load(&mut self) -> Vec<AccountAction> {
        let Some(token) = self.token.clone() else {
            tracing::warn!("no session token, redirecting to login");
            return vec![AccountAction::RedirectToLogin];
        };

        let ticket = self.processor.ticket();
        self.processor.set_loading(true);

        let user = match self.api.current_user(&token) {
            Ok(user) => user,
            Err(err) if err.is_unauthorized() => {
                tracing::info!(detail = %err.detail, "session token rejected");
                self.token = None;
                self.processor.reset();
                return vec![AccountAction::ClearToken, AccountAction::RedirectToLogin];
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to fetch user");
                let message = describe(&err, "Failed to get user information");
                self.processor.apply_if_current(ticket, |p| p.set_error(message));
                return Vec::new();
            }
        };

        if !self.processor.apply_if_current(ticket, |p| p.set_user(user)) {
            return Vec::new();
        }
        self.processor.set_loading(true);

        let account = match self.api.current_account(&token) {
            Ok(account) => account,
            Err(err) => {
                tracing::error!(error = %err, "failed to fetch account");
                let message = describe(&err, "Failed to load account details");
                self.processor.apply_if_current(ticket, |p| p.set_error(message));
                return Vec::new();
            }
        };

        let account_id = account.id;
        if !self.processor.apply_if_current(ticket, |p| p.set_account(account)) {
            return Vec::new();
        }

        self.load_transactions(&token, account_id, ticket)
            .into_iter()
            .collect()
    }

    /// Loads the ledger, returning the message to show if it failed.
    fn load_transactions(&self, token: &str, account_id: i64, ticket: Generation) -> Option<AccountAction> {
        match self.api.transactions(token, account_id) {
            Ok(transactions) => {
                tracing::debug!(count = transactions.len(), "transactions loaded");
                self.processor.apply_if_current(ticket, |p| p.set_transactions(transactions));
                None
            }
            Err(err) => {
                tracing::warn!(error = %err, "failed to load transactions, continuing");
                let message = describe(&err, "Failed to load transactions");
                Some(AccountAction::TransactionsUnavailable(format!(
                    "Could not load transactions: {message}"
                )))
            }
        }
    }

    fn deposit(&mut self, raw_amount: &str) -> Vec<AccountAction> {
        let account_id = self.processor.state().account.as_ref().map(|a| a.id);
        let (Some(token), Some(account_id)) = (self.token.clone(), account_id) else {
            tracing::debug!("deposit ignored, no session or account");
            return Vec::new();
        };

        let Some(amount) = parse_amount(raw_amount).filter(|v| *v > 0.0) else {
            return vec![AccountAction::DepositMessage(DepositMessage::Error(
                INVALID_AMOUNT.to_string(),
            ))];
        };

        let ticket = self.processor.ticket();
        let updated = match self.api.deposit(&token, account_id, &DepositRequest::standard(amount)) {
            Ok(updated) => updated,
            Err(err) => {
                tracing::error!(error = %err, amount = amount, "deposit failed");
                let message = describe(&err, "Failed to process deposit");
                return vec![AccountAction::DepositMessage(DepositMessage::Error(message))];
            }
        };

        let updated_id = updated.id;
        if !self.processor.apply_if_current(ticket, |p| p.set_account(updated)) {
            return Vec::new();
        }

        match self.api.transactions(&token, updated_id) {
            Ok(transactions) => {
                self.processor.apply_if_current(ticket, |p| p.set_transactions(transactions));
                vec![
                    AccountAction::DepositMessage(DepositMessage::Success(DEPOSIT_SUCCESS.to_string())),
                    AccountAction::HideDepositForm,
                ]
            }
            Err(err) => {
                tracing::warn!(error = %err, "deposit recorded but ledger reload failed");
                let message = describe(&err, "Failed to load transactions");
                vec![AccountAction::DepositMessage(DepositMessage::Error(message))]
            }
        }
    }

    fn logout(&mut self) -> Vec<AccountAction> {
        tracing::info!("signing out");
        self.token = None;
        self.processor.reset();
        vec![AccountAction::ClearToken, AccountAction::RedirectToLogin]
    }
}

impl<A: BankApi> Page for AccountPage<A> {
    type Event = AccountEvent;
    type Action = AccountAction;

    fn name(&self) -> &'static str {
        "account"
    }

    fn on_event(&mut self, event: &AccountEvent) -> Vec<AccountAction> {
        match event {
            AccountEvent::Load | AccountEvent::Refresh => self.load(),
            AccountEvent::Deposit { amount } => self.deposit(amount),
            AccountEvent::Logout => self.logout(),
        }
    }
}
