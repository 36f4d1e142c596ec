//! Domain layer: backend records and error types.
//!
//! Nothing here depends on the store, the views, or the page controllers.
//!
//! # Organization
//!
//! - [`error`]: Error types and result aliases
//! - [`records`]: User, account, and transaction records from the banking API
//!
//! # Examples
//!
//! ```
//! use bankflow::domain::{Account, Result};
//!
//! fn parse_account(json: &str) -> Result<Account> {
//!     Ok(serde_json::from_str(json)?)
//! }
//!
//! let account = parse_account(r#"{"id":1,"balance":"10.00"}"#).unwrap();
//! assert_eq!(account.balance, "10.00");
//! ```

pub mod error;
pub mod records;

pub use error::{ApiError, BankflowError, RenderError, Result};
pub use records::{
    parse_amount, Account, DepositRequest, LoginResponse, TokenGrant, Transaction, User,
};
