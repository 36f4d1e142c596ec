//! Observable state container.
//!
//! A store owns one snapshot of application state and a list of subscriber
//! callbacks. Writes are equality-gated, subscribers are notified
//! synchronously in registration order, and new subscribers are replayed the
//! current snapshot immediately.
//!
//! # Modules
//!
//! - `observable`: The store itself, write outcomes, and generations
//! - `subscription`: Revocation-safe unsubscribe handles
//! - `diff`: Changed-field descriptions for debug logging

pub mod diff;
pub mod observable;
pub mod subscription;

pub use diff::changed_fields;
pub use observable::{Generation, ObservableStore, WriteOutcome};
pub use subscription::{SubscriberId, Subscription};
