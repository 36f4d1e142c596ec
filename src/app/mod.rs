//! Page controllers coordinating the backend, the processors, and actions.
//!
//! Each page turns user events into backend calls and processor updates, and
//! returns the side effects (navigation, token persistence, banners) the
//! caller should perform.
//!
//! # Architecture
//!
//! ```text
//! User Input → Event → Page → BankApi calls → Processor writes → Store
//!                        ↓
//!                     Actions → Side Effects (navigation, session file)
//! ```
//!
//! # Modules
//!
//! - [`actions`]: Side effect commands emitted by the pages
//! - [`handler`]: The [`Page`] trait and [`handle_event`]
//! - [`account`]: Account page: load, refresh, deposit, logout
//! - [`login`]: Login page: credentials, two-factor, view switching
//!
//! # Example
//!
//! ```rust
//! use bankflow::api::FixtureApi;
//! use bankflow::app::{handle_event, AccountAction, AccountEvent, AccountPage};
//! use bankflow::presenter::AccountProcessor;
//!
//! let api = FixtureApi::from_json(r#"{"users": []}"#)?;
//! let mut page = AccountPage::new(AccountProcessor::launch().processor, api, None);
//! let actions = handle_event(&mut page, &AccountEvent::Load);
//! assert_eq!(actions, vec![AccountAction::RedirectToLogin]);
//! # Ok::<(), bankflow::BankflowError>(())
//! ```

pub mod account;
pub mod actions;
pub mod handler;
pub mod login;

pub use account::{AccountEvent, AccountPage};
pub use actions::{AccountAction, AuthAction, DepositMessage};
pub use handler::{handle_event, Page};
pub use login::{AuthEvent, LoginPage};
