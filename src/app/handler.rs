//! Event handling entry point shared by every page.
//!
//! This module defines the [`Page`] trait implemented by the page controllers
//! and [`handle_event`], the single function the shell calls to feed a page
//! one event.
//!
//! # Architecture
//!
//! The handler follows a unidirectional data flow pattern:
//! 1. The shell turns user input into a page event
//! 2. [`handle_event`] hands it to the page inside a tracing span
//! 3. The page calls backend methods and processor operations
//! 4. Processors commit snapshots; bound views re-render
//! 5. Actions are collected and returned for the shell to execute
//!
//! # Example
//!
//! ```rust
//! use bankflow::api::FixtureApi;
//! use bankflow::app::{handle_event, AuthAction, AuthEvent, LoginPage};
//! use bankflow::presenter::AuthProcessor;
//!
//! let api = FixtureApi::from_json(r#"{"users":[{"user":{"id":1,"username":"alice"},"password":"pw"}]}"#)?;
//! let auth = AuthProcessor::launch();
//! let mut page = LoginPage::new(auth.processor.clone(), api);
//!
//! let login = AuthEvent::Login { username: "alice".into(), password: "pw".into() };
//! let actions = handle_event(&mut page, &login);
//!
//! assert!(auth.store.get().is_authenticated);
//! assert_eq!(actions.last(), Some(&AuthAction::OpenAccountPage));
//! # Ok::<(), bankflow::BankflowError>(())
//! ```

use std::fmt::Debug;

use crate::domain::ApiError;

/// A page controller: consumes events, mutates its processor, emits actions.
pub trait Page {
    type Event: Debug;
    type Action: Debug;

    /// Stable page name used in logs.
    fn name(&self) -> &'static str;

    /// Processes one event. Backend failures are routed into state or into
    /// actions; nothing is returned as an error.
    fn on_event(&mut self, event: &Self::Event) -> Vec<Self::Action>;
}

/// Feeds `event` to `page` and returns the actions to execute, in order.
pub fn handle_event<P: Page>(page: &mut P, event: &P::Event) -> Vec<P::Action> {
    let _span = tracing::debug_span!("handle_event", page = page.name(), event = ?event).entered();

    let actions = page.on_event(event);
    tracing::debug!(actions = ?actions, "event handled");
    actions
}

/// The message to show for a failed backend call.
pub(crate) fn describe(err: &ApiError, fallback: &str) -> String {
    if err.detail.trim().is_empty() {
        fallback.to_string()
    } else {
        err.detail.clone()
    }
}
