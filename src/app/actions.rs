//! Actions representing side effects for the shell to execute.
//!
//! Page controllers never navigate, persist credentials, or touch the
//! terminal themselves. They mutate their processor and return actions; the
//! shell (the binary, or a test) carries them out in order.
//!
//! # Example
//!
//! ```rust
//! use bankflow::app::{AccountAction, DepositMessage};
//!
//! let actions = vec![
//!     AccountAction::DepositMessage(DepositMessage::Success("Deposit successful!".into())),
//!     AccountAction::HideDepositForm,
//! ];
//! assert_eq!(actions.len(), 2);
//! ```

use std::fmt;

/// Outcome line shown under the deposit form.
///
/// Deposit feedback is local to the form: it never goes through the account
/// store's error banner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DepositMessage {
    Success(String),
    Error(String),
}

impl DepositMessage {
    /// The text to display.
    #[must_use]
    pub fn text(&self) -> &str {
        match self {
            Self::Success(text) | Self::Error(text) => text,
        }
    }

    #[must_use]
    pub const fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }
}

impl fmt::Display for DepositMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text())
    }
}

/// Commands emitted by the account page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccountAction {
    /// Leave the account page for the login page.
    RedirectToLogin,

    /// Forget the persisted session token.
    ///
    /// Emitted when the backend rejects the token and on logout.
    ClearToken,

    /// Show a message under the deposit form.
    DepositMessage(DepositMessage),

    /// Close the deposit form.
    HideDepositForm,

    /// The account loaded but its transactions did not.
    ///
    /// The page stays usable; the shell shows the message in place of the
    /// transaction table.
    TransactionsUnavailable(String),
}

/// Commands emitted by the login page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthAction {
    /// Persist the session token for the account page.
    StoreToken(String),

    /// Forget the persisted session token.
    ClearToken,

    /// Navigate to the account page.
    OpenAccountPage,
}
