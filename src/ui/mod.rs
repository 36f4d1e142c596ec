//! Terminal presentation of the account and login pages.
//!
//! # Architecture
//!
//! The UI layer follows a declarative rendering model:
//!
//! ```text
//! store snapshot → from_state → view model → TerminalView → ANSI output
//! ```
//!
//! # Modules
//!
//! - [`viewmodel`]: Display-ready page models computed from snapshots
//! - [`renderer`]: [`TerminalView`], the `View` implementation for both pages
//! - [`helpers`]: Money, identifier, and timestamp formatting
//! - [`theme`]: Color scheme definitions and ANSI escape sequence generation

pub mod helpers;
pub mod renderer;
pub mod theme;
pub mod viewmodel;

pub use renderer::TerminalView;
pub use theme::Theme;
pub use viewmodel::{AccountSummary, AccountViewModel, AuthViewModel, TransactionKind, TransactionRow};
