//! Session storage abstraction.
//!
//! The [`SessionStore`] trait covers the one thing the client persists
//! between runs: the bearer token of the signed-in user.

use crate::domain::error::Result;

/// Persistence for the session token.
///
/// # Implementations
///
/// - [`JsonSessionStore`](super::JsonSessionStore): a JSON file in the data directory
/// - [`MemorySessionStore`]: process-local, used when no data directory is set
pub trait SessionStore {
    /// Returns the stored token, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing file exists but cannot be read or parsed.
    fn load(&self) -> Result<Option<String>>;

    /// Replaces the stored token.
    ///
    /// # Errors
    ///
    /// Returns an error if the token cannot be written.
    fn save(&mut self, token: &str) -> Result<()>;

    /// Removes the stored token. Clearing an empty store succeeds.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing file cannot be removed.
    fn clear(&mut self) -> Result<()>;
}

/// A [`SessionStore`] that forgets everything when dropped.
#[derive(Debug, Default, Clone)]
pub struct MemorySessionStore {
    token: Option<String>,
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> Result<Option<String>> {
        Ok(self.token.clone())
    }

    fn save(&mut self, token: &str) -> Result<()> {
        self.token = Some(token.to_string());
        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        self.token = None;
        Ok(())
    }
}
