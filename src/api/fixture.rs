//! In-memory backend seeded from a JSON fixture file.
//!
//! The fixture is read once at construction. Logins issue opaque bearer
//! tokens, deposits update the in-memory balance and append a ledger entry.
//! Nothing is written back to disk.
//!
//! # File Format
//!
//! ```json
//! {
//!   "users": [
//!     {
//!       "user": { "id": 1, "username": "alice", "name": "Alice Liddell" },
//!       "password": "wonderland",
//!       "two_factor": { "secret": "JBSWY3DPEHPK3PXP", "code": "123456" },
//!       "account": {
//!         "id": 10, "user_id": 1, "balance": "1250.00",
//!         "routing_number": "021000021", "account_number": "000123456789"
//!       },
//!       "transactions": [
//!         { "id": 1, "account_id": 10, "amount": "-45.10",
//!           "timestamp": "2024-03-02T09:15:00", "status": "completed" }
//!       ]
//!     }
//!   ]
//! }
//! ```
//!
//! `two_factor`, `account`, and `transactions` are optional. A user with
//! `two_factor` set must complete [`BankApi::verify_two_factor`] with the
//! fixture's fixed `code`.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::backend::{ApiResult, BankApi};
use crate::domain::{
    parse_amount, Account, ApiError, BankflowError, DepositRequest, LoginResponse, Result, TokenGrant, Transaction,
    User,
};

const STATUS_BAD_REQUEST: u16 = 400;
const STATUS_UNAUTHORIZED: u16 = 401;
const STATUS_NOT_FOUND: u16 = 404;

/// Top-level fixture document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FixtureData {
    #[serde(default)]
    pub users: Vec<FixtureUser>,
}

/// One user with their credentials and ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FixtureUser {
    pub user: User,
    pub password: String,
    #[serde(default)]
    pub two_factor: Option<TwoFactorFixture>,
    #[serde(default)]
    pub account: Option<Account>,
    #[serde(default)]
    pub transactions: Vec<Transaction>,
}

/// Two-factor settings: the secret shown during setup and the one code the
/// fixture accepts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TwoFactorFixture {
    pub secret: String,
    pub code: String,
}

/// [`BankApi`] backed by a [`FixtureData`] document held in memory.
#[derive(Debug, Clone)]
pub struct FixtureApi {
    data: FixtureData,
    /// Bearer token to index into `data.users`.
    sessions: HashMap<String, usize>,
    /// Temporary two-factor token to index into `data.users`.
    challenges: HashMap<String, usize>,
    issued: u64,
}

impl FixtureApi {
    #[must_use]
    pub fn new(data: FixtureData) -> Self {
        tracing::debug!(users = data.users.len(), "fixture backend ready");
        Self {
            data,
            sessions: HashMap::new(),
            challenges: HashMap::new(),
            issued: 0,
        }
    }

    /// Parses a fixture document.
    ///
    /// # Errors
    ///
    /// Returns [`BankflowError::Json`] if `json` is not a valid fixture.
    pub fn from_json(json: &str) -> Result<Self> {
        let data: FixtureData = serde_json::from_str(json)?;
        Ok(Self::new(data))
    }

    /// Reads and parses the fixture file at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or does not contain a
    /// valid fixture document.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        tracing::debug!(path = ?path, "loading fixture");

        let contents = std::fs::read_to_string(path)?;
        let data: FixtureData = serde_json::from_str(&contents)
            .map_err(|e| BankflowError::Config(format!("failed to parse fixture {}: {e}", path.display())))?;
        Ok(Self::new(data))
    }

    /// The current in-memory document, including deposits made so far.
    #[must_use]
    pub fn data(&self) -> &FixtureData {
        &self.data
    }

    fn issue(&mut self, prefix: &str) -> String {
        self.issued += 1;
        format!("{prefix}-{}", self.issued)
    }

    fn grant(&mut self, index: usize) -> TokenGrant {
        let token = self.issue("fixture-token");
        self.sessions.insert(token.clone(), index);
        tracing::debug!(user = %self.data.users[index].user.username, "session issued");
        TokenGrant {
            access_token: token,
            token_type: "bearer".to_string(),
            user: Some(self.data.users[index].user.clone()),
        }
    }

    fn session(&self, token: &str) -> ApiResult<usize> {
        self.sessions
            .get(token)
            .copied()
            .ok_or_else(|| ApiError::with_status(STATUS_UNAUTHORIZED, "Could not validate credentials"))
    }

    /// Resolves the caller's account, rejecting ids the caller does not own.
    fn owned_account(&self, token: &str, account_id: i64) -> ApiResult<usize> {
        let index = self.session(token)?;
        match &self.data.users[index].account {
            Some(account) if account.id == account_id => Ok(index),
            _ => Err(ApiError::with_status(STATUS_NOT_FOUND, "Account not found or unauthorized")),
        }
    }
}

impl BankApi for FixtureApi {
    fn current_user(&self, token: &str) -> ApiResult<User> {
        let index = self.session(token)?;
        Ok(self.data.users[index].user.clone())
    }

    fn current_account(&self, token: &str) -> ApiResult<Account> {
        let index = self.session(token)?;
        self.data.users[index]
            .account
            .clone()
            .ok_or_else(|| ApiError::with_status(STATUS_NOT_FOUND, "Account not found"))
    }

    fn transactions(&self, token: &str, account_id: i64) -> ApiResult<Vec<Transaction>> {
        let index = self.owned_account(token, account_id)?;
        let mut ledger = self.data.users[index].transactions.clone();
        ledger.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(ledger)
    }

    fn deposit(&mut self, token: &str, account_id: i64, request: &DepositRequest) -> ApiResult<Account> {
        let index = self.owned_account(token, account_id)?;
        if !request.amount.is_finite() || request.amount <= 0.0 {
            return Err(ApiError::with_status(STATUS_BAD_REQUEST, "Deposit amount must be positive"));
        }
        if !request.agree_terms {
            return Err(ApiError::with_status(
                STATUS_BAD_REQUEST,
                "You must agree to ACH terms and conditions",
            ));
        }

        let entry = &mut self.data.users[index];
        let next_id = entry.transactions.iter().map(|t| t.id).max().unwrap_or(0) + 1;
        let Some(account) = entry.account.as_mut() else {
            return Err(ApiError::with_status(STATUS_NOT_FOUND, "Account not found"));
        };

        let balance = parse_amount(&account.balance).unwrap_or(0.0) + request.amount;
        account.balance = format!("{balance:.2}");
        let updated = account.clone();

        entry.transactions.push(Transaction {
            id: next_id,
            account_id,
            amount: format!("{:.2}", request.amount),
            timestamp: chrono::Utc::now().format("%Y-%m-%dT%H:%M:%S").to_string(),
            transfer_type: Some(request.transfer_type.clone()),
            status: "pending".to_string(),
        });

        tracing::info!(account_id = account_id, balance = %updated.balance, "deposit recorded");
        Ok(updated)
    }

    fn login(&mut self, username: &str, password: &str) -> ApiResult<LoginResponse> {
        let Some(index) = self
            .data
            .users
            .iter()
            .position(|u| u.user.username == username && u.password == password)
        else {
            tracing::debug!(username = %username, "login rejected");
            return Err(ApiError::with_status(STATUS_UNAUTHORIZED, "Incorrect username or password"));
        };

        if let Some(secret) = self.data.users[index].two_factor.as_ref().map(|tf| tf.secret.clone()) {
            let temp_token = self.issue("fixture-temp");
            self.challenges.insert(temp_token.clone(), index);
            tracing::debug!(username = %username, "two-factor challenge issued");
            return Ok(LoginResponse::TwoFactorRequired { temp_token, secret });
        }

        Ok(LoginResponse::Granted(self.grant(index)))
    }

    fn verify_two_factor(&mut self, temp_token: &str, code: &str) -> ApiResult<TokenGrant> {
        let Some(&index) = self.challenges.get(temp_token) else {
            return Err(ApiError::with_status(STATUS_UNAUTHORIZED, "Invalid or expired temporary token"));
        };

        let accepted = self.data.users[index]
            .two_factor
            .as_ref()
            .is_some_and(|tf| tf.code == code.trim());
        if !accepted {
            return Err(ApiError::with_status(STATUS_UNAUTHORIZED, "Invalid verification code"));
        }

        self.challenges.remove(temp_token);
        Ok(self.grant(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const FIXTURE: &str = r#"{
        "users": [
            {
                "user": { "id": 1, "username": "alice", "name": "Alice Liddell" },
                "password": "wonderland",
                "account": { "id": 10, "user_id": 1, "balance": "100.00" },
                "transactions": [
                    { "id": 4, "account_id": 10, "amount": "-5.00", "timestamp": "2024-03-02T09:15:00" }
                ]
            },
            {
                "user": { "id": 2, "username": "bob" },
                "password": "builder",
                "two_factor": { "secret": "JBSWY3DPEHPK3PXP", "code": "123456" }
            }
        ]
    }"#;

    fn token(api: &mut FixtureApi) -> String {
        match api.login("alice", "wonderland").unwrap() {
            LoginResponse::Granted(grant) => grant.access_token,
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn login_and_fetch() {
        let mut api = FixtureApi::from_json(FIXTURE).unwrap();
        let token = token(&mut api);

        assert_eq!(api.current_user(&token).unwrap().username, "alice");
        assert_eq!(api.current_account(&token).unwrap().id, 10);
        assert_eq!(api.transactions(&token, 10).unwrap().len(), 1);
    }

    #[test]
    fn wrong_password_is_unauthorized() {
        let mut api = FixtureApi::from_json(FIXTURE).unwrap();
        let err = api.login("alice", "nope").unwrap_err();
        assert!(err.is_unauthorized());
        assert_eq!(err.detail, "Incorrect username or password");
    }

    #[test]
    fn unknown_token_is_unauthorized() {
        let api = FixtureApi::from_json(FIXTURE).unwrap();
        assert!(api.current_user("forged").unwrap_err().is_unauthorized());
    }

    #[test]
    fn deposit_updates_balance_and_ledger() {
        let mut api = FixtureApi::from_json(FIXTURE).unwrap();
        let token = token(&mut api);

        let account = api.deposit(&token, 10, &DepositRequest::standard(25.5)).unwrap();
        assert_eq!(account.balance, "125.50");

        let ledger = api.transactions(&token, 10).unwrap();
        assert_eq!(ledger.len(), 2);
        let newest = &ledger[0];
        assert_eq!(newest.id, 5);
        assert_eq!(newest.amount, "25.50");
        assert_eq!(newest.status, "pending");
        assert_eq!(newest.transfer_type.as_deref(), Some("Standard"));
    }

    #[test]
    fn deposit_rejects_foreign_account_and_bad_amount() {
        let mut api = FixtureApi::from_json(FIXTURE).unwrap();
        let token = token(&mut api);

        let err = api.deposit(&token, 99, &DepositRequest::standard(1.0)).unwrap_err();
        assert_eq!(err.status, Some(404));
        let err = api.deposit(&token, 10, &DepositRequest::standard(-1.0)).unwrap_err();
        assert_eq!(err.status, Some(400));

        let unsigned = DepositRequest {
            agree_terms: false,
            ..DepositRequest::standard(1.0)
        };
        let err = api.deposit(&token, 10, &unsigned).unwrap_err();
        assert_eq!(err.detail, "You must agree to ACH terms and conditions");
    }

    #[test]
    fn two_factor_flow() {
        let mut api = FixtureApi::from_json(FIXTURE).unwrap();
        let LoginResponse::TwoFactorRequired { temp_token, secret } = api.login("bob", "builder").unwrap() else {
            panic!("expected a challenge");
        };
        assert_eq!(secret, "JBSWY3DPEHPK3PXP");

        assert!(api.verify_two_factor(&temp_token, "000000").is_err());
        let grant = api.verify_two_factor(&temp_token, "123456").unwrap();
        assert_eq!(api.current_user(&grant.access_token).unwrap().username, "bob");

        // challenge is single use
        assert!(api.verify_two_factor(&temp_token, "123456").is_err());
    }

    #[test]
    fn from_path_reports_parse_errors_with_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"{ not json").unwrap();

        let err = FixtureApi::from_path(file.path()).unwrap_err();
        assert!(matches!(err, BankflowError::Config(ref msg) if msg.contains("failed to parse fixture")));
    }
}
