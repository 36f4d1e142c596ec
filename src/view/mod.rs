//! One-way binding from stores to views.
//!
//! A view is anything implementing [`View`]; [`connect`] subscribes it to a
//! store and keeps one misbehaving view from affecting the others.

pub mod binder;

pub use binder::{connect, View};
