//! View model types representing renderable page state.
//!
//! View models are computed from store snapshots and consumed by the
//! renderer. They contain no business logic, only display-ready strings, so
//! the formatting rules can be tested without a terminal.
//!
//! # Example
//!
//! ```rust
//! use bankflow::presenter::AccountState;
//! use bankflow::ui::viewmodel::AccountViewModel;
//!
//! let loading = AccountState { is_loading: true, ..AccountState::default() };
//! assert_eq!(AccountViewModel::from_state(&loading), AccountViewModel::Loading);
//! ```

use crate::domain::parse_amount;
use crate::presenter::{AccountState, AuthState, AuthView};

use super::helpers::{format_balance, format_money, format_timestamp, or_not_available};

/// What the account page shows.
///
/// Loading takes precedence over an error, and an error over the details.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccountViewModel {
    Loading,
    Error {
        message: String,
    },
    Details {
        /// `None` until the user record arrives.
        user_name: Option<String>,
        /// `None` until the account record arrives.
        account: Option<AccountSummary>,
        rows: Vec<TransactionRow>,
        /// An account is loaded and it has no transactions.
        show_no_transactions: bool,
    },
}

/// Header block of the account page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountSummary {
    pub routing_number: String,
    pub account_number: String,
    pub balance: String,
}

/// Direction of a ledger entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionKind {
    Deposit,
    Withdrawal,
}

impl TransactionKind {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Deposit => "Deposit",
            Self::Withdrawal => "Withdrawal",
        }
    }
}

/// One line of the transaction table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionRow {
    pub date: String,
    pub kind: TransactionKind,
    /// `$` and the absolute amount, two decimals.
    pub amount: String,
}

impl AccountViewModel {
    #[must_use]
    pub fn from_state(state: &AccountState) -> Self {
        if state.is_loading {
            return Self::Loading;
        }
        if let Some(message) = &state.error {
            return Self::Error {
                message: message.clone(),
            };
        }

        let account = state.account.as_ref().map(|account| AccountSummary {
            routing_number: or_not_available(&account.routing_number),
            account_number: or_not_available(&account.account_number),
            balance: format_balance(&account.balance),
        });

        // An unparsable amount is shown as a zero deposit.
        let rows: Vec<TransactionRow> = state
            .transactions
            .iter()
            .map(|tx| {
                let value = parse_amount(&tx.amount).unwrap_or(0.0);
                TransactionRow {
                    date: format_timestamp(&tx.timestamp),
                    kind: if value >= 0.0 {
                        TransactionKind::Deposit
                    } else {
                        TransactionKind::Withdrawal
                    },
                    amount: format_money(value),
                }
            })
            .collect();

        Self::Details {
            user_name: state.user.as_ref().map(|u| u.display_name().to_string()),
            show_no_transactions: account.is_some() && rows.is_empty(),
            account,
            rows,
        }
    }
}

/// What the login page shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthViewModel {
    pub view: AuthView,
    pub title: &'static str,
    pub is_loading: bool,
    pub error: Option<String>,
    /// TOTP secret, only while setting up two-factor authentication.
    pub two_fa_secret: Option<String>,
    /// Display name once signed in.
    pub signed_in_as: Option<String>,
}

impl AuthViewModel {
    #[must_use]
    pub fn from_state(state: &AuthState) -> Self {
        let title = match state.current_view {
            AuthView::Login => "Sign In",
            AuthView::Register => "Create Account",
            AuthView::TwoFaSetup => "Set Up Two-Factor Authentication",
            AuthView::TwoFaVerify => "Two-Factor Verification",
        };

        let two_fa_secret = match state.current_view {
            AuthView::TwoFaSetup => state.two_fa_secret.clone(),
            _ => None,
        };

        let signed_in_as = state.is_authenticated.then(|| {
            state
                .user
                .as_ref()
                .map_or_else(|| "authenticated user".to_string(), |u| u.display_name().to_string())
        });

        Self {
            view: state.current_view,
            title,
            is_loading: state.is_loading,
            error: state.error.clone(),
            two_fa_secret,
            signed_in_as,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Account, Transaction, User};

    fn tx(id: i64, amount: &str) -> Transaction {
        Transaction {
            id,
            account_id: 1,
            amount: amount.into(),
            timestamp: "2024-03-02T09:15:00".into(),
            transfer_type: None,
            status: "completed".into(),
        }
    }

    fn account() -> Account {
        Account {
            id: 1,
            user_id: 1,
            balance: "1250.5".into(),
            routing_number: String::new(),
            account_number: "000123456789".into(),
            is_bank_linked: false,
            is_bank_verified: false,
        }
    }

    #[test]
    fn loading_beats_error() {
        let state = AccountState {
            is_loading: true,
            error: Some("boom".into()),
            ..AccountState::default()
        };
        assert_eq!(AccountViewModel::from_state(&state), AccountViewModel::Loading);
    }

    #[test]
    fn error_beats_details() {
        let state = AccountState {
            account: Some(account()),
            error: Some("Account not found".into()),
            ..AccountState::default()
        };
        assert_eq!(
            AccountViewModel::from_state(&state),
            AccountViewModel::Error {
                message: "Account not found".into()
            }
        );
    }

    #[test]
    fn details_format_every_field() {
        let state = AccountState {
            user: Some(User {
                id: 1,
                username: "alice".into(),
                name: None,
            }),
            account: Some(account()),
            transactions: vec![tx(1, "25"), tx(2, "-45.1")],
            ..AccountState::default()
        };

        let AccountViewModel::Details {
            user_name,
            account,
            rows,
            show_no_transactions,
        } = AccountViewModel::from_state(&state)
        else {
            panic!("expected details");
        };

        assert_eq!(user_name.as_deref(), Some("alice"));
        let account = account.unwrap();
        assert_eq!(account.routing_number, "N/A");
        assert_eq!(account.balance, "1250.50");
        assert!(!show_no_transactions);
        assert_eq!(
            rows,
            vec![
                TransactionRow {
                    date: "2024-03-02 09:15:00".into(),
                    kind: TransactionKind::Deposit,
                    amount: "$25.00".into(),
                },
                TransactionRow {
                    date: "2024-03-02 09:15:00".into(),
                    kind: TransactionKind::Withdrawal,
                    amount: "$45.10".into(),
                },
            ]
        );
    }

    #[test]
    fn empty_ledger_only_flagged_with_account() {
        let without = AccountViewModel::from_state(&AccountState::default());
        assert!(matches!(without, AccountViewModel::Details { show_no_transactions: false, .. }));

        let with = AccountViewModel::from_state(&AccountState {
            account: Some(account()),
            ..AccountState::default()
        });
        assert!(matches!(with, AccountViewModel::Details { show_no_transactions: true, .. }));
    }

    #[test]
    fn secret_only_shown_during_setup() {
        let mut state = AuthState {
            two_fa_secret: Some("JBSWY3DP".into()),
            current_view: AuthView::TwoFaSetup,
            ..AuthState::default()
        };
        assert_eq!(AuthViewModel::from_state(&state).two_fa_secret.as_deref(), Some("JBSWY3DP"));

        state.current_view = AuthView::TwoFaVerify;
        let vm = AuthViewModel::from_state(&state);
        assert_eq!(vm.two_fa_secret, None);
        assert_eq!(vm.title, "Two-Factor Verification");
    }
}
