//! Backend access for the page controllers.
//!
//! # Modules
//!
//! - `backend`: The [`BankApi`] trait and its result alias
//! - `fixture`: JSON-fixture backend used by the demo binary and tests

pub mod backend;
pub mod fixture;

pub use backend::{ApiResult, BankApi};
pub use fixture::{FixtureApi, FixtureData, FixtureUser, TwoFactorFixture};
