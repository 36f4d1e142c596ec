//! Backend API abstraction.
//!
//! This module defines the [`BankApi`] trait the page controllers talk to. The
//! trait is transport-agnostic: implementations return already-parsed records
//! and translate every failure into an [`ApiError`].
//!
//! # Design Philosophy
//!
//! Each method maps to one endpoint the banking pages actually call. Nothing
//! here retries or caches; a failed call is reported once and the caller
//! decides what the user sees.

use crate::domain::{Account, ApiError, DepositRequest, LoginResponse, TokenGrant, Transaction, User};

/// Result of a backend call.
pub type ApiResult<T> = std::result::Result<T, ApiError>;

/// The banking backend as seen by the client.
///
/// Calls that need a session take the bearer token explicitly; the client
/// never stores credentials inside the API object.
///
/// # Implementations
///
/// - [`FixtureApi`](super::FixtureApi): In-memory backend seeded from a JSON file
/// - `&mut A` for any `A: BankApi`, so pages can borrow one backend in turn
pub trait BankApi {
    /// Fetches the signed-in user (`GET /auth/users/me`).
    ///
    /// # Errors
    ///
    /// Returns a 401 [`ApiError`] when `token` is missing or expired.
    fn current_user(&self, token: &str) -> ApiResult<User>;

    /// Fetches the signed-in user's account (`GET /users/me/account`).
    ///
    /// # Errors
    ///
    /// Returns an error when the token is invalid or the user has no account.
    fn current_account(&self, token: &str) -> ApiResult<Account>;

    /// Lists an account's transactions, newest first
    /// (`GET /accounts/{id}/transactions`).
    ///
    /// # Errors
    ///
    /// Returns an error when the token is invalid or does not own the account.
    fn transactions(&self, token: &str, account_id: i64) -> ApiResult<Vec<Transaction>>;

    /// Deposits into an account and returns the updated account
    /// (`POST /accounts/{id}/deposit`).
    ///
    /// # Errors
    ///
    /// Returns an error when the token is invalid, the account is not the
    /// caller's, or the backend rejects the amount.
    fn deposit(&mut self, token: &str, account_id: i64, request: &DepositRequest) -> ApiResult<Account>;

    /// Exchanges credentials for a token or a two-factor challenge
    /// (`POST /auth/token`).
    ///
    /// # Errors
    ///
    /// Returns a 401 [`ApiError`] for unknown users or wrong passwords.
    fn login(&mut self, username: &str, password: &str) -> ApiResult<LoginResponse>;

    /// Completes a two-factor challenge (`POST /auth/2fa/verify`).
    ///
    /// # Errors
    ///
    /// Returns a 401 [`ApiError`] for unknown temporary tokens or wrong codes.
    fn verify_two_factor(&mut self, temp_token: &str, code: &str) -> ApiResult<TokenGrant>;
}

impl<A: BankApi + ?Sized> BankApi for &mut A {
    fn current_user(&self, token: &str) -> ApiResult<User> {
        (**self).current_user(token)
    }

    fn current_account(&self, token: &str) -> ApiResult<Account> {
        (**self).current_account(token)
    }

    fn transactions(&self, token: &str, account_id: i64) -> ApiResult<Vec<Transaction>> {
        (**self).transactions(token, account_id)
    }

    fn deposit(&mut self, token: &str, account_id: i64, request: &DepositRequest) -> ApiResult<Account> {
        (**self).deposit(token, account_id, request)
    }

    fn login(&mut self, username: &str, password: &str) -> ApiResult<LoginResponse> {
        (**self).login(username, password)
    }

    fn verify_two_factor(&mut self, temp_token: &str, code: &str) -> ApiResult<TokenGrant> {
        (**self).verify_two_factor(temp_token, code)
    }
}
