//! Storage layer for the persisted session.
//!
//! # Modules
//!
//! - `backend`: [`SessionStore`] trait and the in-memory implementation
//! - `json`: JSON file-based implementation with atomic writes

pub mod backend;
pub mod json;

pub use backend::{MemorySessionStore, SessionStore};
pub use json::{JsonSessionStore, SESSION_FILE_NAME};
