//! Records consumed from the backend API.
//!
//! These types mirror the JSON the banking API returns. Monetary values are
//! kept as the decimal strings the API emits; parsing happens only where a
//! number is actually needed (validation and display).

use serde::{Deserialize, Serialize};

/// Authenticated user profile (`GET /auth/users/me`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    #[serde(default)]
    pub name: Option<String>,
}

impl User {
    /// Name shown in the UI: the full name when present, otherwise the username.
    ///
    /// # Examples
    ///
    /// ```
    /// use bankflow::domain::User;
    ///
    /// let user = User { id: 1, username: "alice".into(), name: None };
    /// assert_eq!(user.display_name(), "alice");
    /// ```
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .filter(|n| !n.is_empty())
            .unwrap_or(&self.username)
    }
}

/// Deposit account (`GET /users/me/account`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: i64,
    #[serde(default)]
    pub user_id: i64,
    /// Decimal string, e.g. `"1250.00"`.
    pub balance: String,
    #[serde(default)]
    pub routing_number: String,
    #[serde(default)]
    pub account_number: String,
    #[serde(default)]
    pub is_bank_linked: bool,
    #[serde(default)]
    pub is_bank_verified: bool,
}

/// A ledger entry (`GET /accounts/{id}/transactions`).
///
/// Positive amounts are deposits, negative amounts withdrawals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    pub account_id: i64,
    /// Signed decimal string.
    pub amount: String,
    /// ISO-8601 timestamp as sent by the API (with or without offset).
    pub timestamp: String,
    #[serde(default)]
    pub transfer_type: Option<String>,
    #[serde(default)]
    pub status: String,
}

/// Body of `POST /accounts/{id}/deposit`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepositRequest {
    pub amount: f64,
    pub transfer_type: String,
    pub agree_terms: bool,
}

impl DepositRequest {
    /// A standard-transfer deposit with terms accepted, as the account page sends it.
    #[must_use]
    pub fn standard(amount: f64) -> Self {
        Self {
            amount,
            transfer_type: "Standard".to_string(),
            agree_terms: true,
        }
    }
}

/// Successful token exchange.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenGrant {
    pub access_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    #[serde(default)]
    pub user: Option<User>,
}

fn default_token_type() -> String {
    "bearer".to_string()
}

/// Outcome of a login attempt.
///
/// Accounts with two-factor authentication enabled receive a short-lived
/// temporary token and the TOTP secret instead of an access token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LoginResponse {
    Granted(TokenGrant),
    TwoFactorRequired { temp_token: String, secret: String },
}

/// Parses a decimal string the way the web UI's `parseFloat` did, rejecting
/// non-finite values.
///
/// # Examples
///
/// ```
/// use bankflow::domain::parse_amount;
///
/// assert_eq!(parse_amount(" 12.50 "), Some(12.5));
/// assert_eq!(parse_amount("abc"), None);
/// assert_eq!(parse_amount("inf"), None);
/// ```
#[must_use]
pub fn parse_amount(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_name_prefers_full_name() {
        let user = User {
            id: 1,
            username: "alice".into(),
            name: Some("Alice Liddell".into()),
        };
        assert_eq!(user.display_name(), "Alice Liddell");

        let blank = User {
            name: Some(String::new()),
            ..user
        };
        assert_eq!(blank.display_name(), "alice");
    }

    #[test]
    fn login_response_decodes_both_shapes() {
        let granted: LoginResponse =
            serde_json::from_str(r#"{"access_token":"abc","token_type":"bearer"}"#).unwrap();
        assert!(matches!(granted, LoginResponse::Granted(ref g) if g.access_token == "abc"));

        let challenge: LoginResponse =
            serde_json::from_str(r#"{"temp_token":"tmp","secret":"JBSWY3DP"}"#).unwrap();
        assert_eq!(
            challenge,
            LoginResponse::TwoFactorRequired {
                temp_token: "tmp".into(),
                secret: "JBSWY3DP".into()
            }
        );
    }

    #[test]
    fn account_tolerates_missing_optional_fields() {
        let account: Account = serde_json::from_str(r#"{"id":7,"balance":"10.00"}"#).unwrap();
        assert_eq!(account.id, 7);
        assert_eq!(account.routing_number, "");
        assert!(!account.is_bank_linked);
    }
}
