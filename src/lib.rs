//! Bankflow: the reactive state core of a small banking client.
//!
//! Bankflow keeps page state in observable stores, pushes every committed
//! snapshot to the views bound to it, and exposes domain operations for the
//! account page and the login flow through narrow processor façades.
//!
//! # Architecture
//!
//! The crate follows a layered architecture with unidirectional data flow:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        main.rs (CLI)                        │
//! │  config → tracing → pages → actions → session file          │
//! └──────────────────────────┬──────────────────────────────────┘
//!                            │
//!         ┌──────────────────┼──────────────────┐
//!         │                  │                  │
//!         ▼                  ▼                  ▼
//! ┌──────────────┐  ┌──────────────┐  ┌──────────────┐
//! │   app/       │  │  presenter/  │  │    api/      │
//! │   Pages      │─▶│  Processors  │  │   BankApi    │
//! │   Actions    │  │  (façades)   │  │   Fixture    │
//! └──────┬───────┘  └──────┬───────┘  └──────────────┘
//!        │                 │ set / update
//!        │                 ▼
//!        │          ┌──────────────┐   snapshot   ┌──────────────┐
//!        │          │   store/     │─────────────▶│  view/ + ui/ │
//!        │          │  Observable  │  fan-out     │  TerminalView│
//!        │          └──────────────┘              └──────────────┘
//!        ▼
//! ┌──────────────┐
//! │  storage/    │  session token persisted between runs
//! └──────────────┘
//! ```
//!
//! # Module Organization
//!
//! - [`store`]: [`ObservableStore`], subscriptions, generations, change diffs
//! - [`view`]: The [`View`] trait and [`connect`], which binds a view to a store
//! - [`presenter`]: [`AccountProcessor`] and [`AuthProcessor`]
//! - [`app`]: Page controllers turning events into backend calls and actions
//! - [`api`]: The [`BankApi`] seam and an in-memory fixture backend
//! - [`domain`]: Backend records and error types
//! - [`ui`]: Themes, view models, and the terminal renderer
//! - [`storage`]: Session token persistence
//! - [`observability`]: Tracing subscriber and rotating log file
//!
//! # Key Design Decisions
//!
//! ## Single-threaded stores
//!
//! Stores are `Rc<RefCell<..>>` handles. Everything that touches them runs
//! on one thread, which matches a UI event loop and lets subscribers be
//! plain `FnMut` closures.
//!
//! ## Equality-gated notification
//!
//! Writing a snapshot equal to the current one notifies nobody. Writes made
//! from inside a subscriber are queued and delivered after the current
//! round, so every subscriber sees every committed snapshot in order.
//!
//! ## Generation tickets
//!
//! A load takes a ticket before calling the backend and applies its result
//! only if the processor was not reset in the meantime.
//!
//! # Example
//!
//! ```rust
//! use bankflow::{connect, AccountProcessor, RenderError};
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! let account = AccountProcessor::launch();
//! let seen = Rc::new(RefCell::new(Vec::new()));
//! let log = Rc::clone(&seen);
//!
//! let _sub = connect(
//!     &account.store,
//!     move |state: &bankflow::AccountState| -> Result<(), RenderError> {
//!         log.borrow_mut().push(state.is_loading);
//!         Ok(())
//!     },
//!     "recorder",
//! );
//! account.processor.set_loading(true);
//! account.processor.set_loading(true);
//!
//! assert_eq!(*seen.borrow(), vec![false, true]);
//! ```

pub mod api;
pub mod app;
pub mod domain;
pub mod observability;
pub mod presenter;
pub mod storage;
pub mod store;
pub mod ui;
pub mod view;

pub use api::{BankApi, FixtureApi};
pub use app::{handle_event, AccountAction, AccountEvent, AccountPage, AuthAction, AuthEvent, LoginPage, Page};
pub use domain::{ApiError, BankflowError, RenderError, Result};
pub use presenter::{AccountProcessor, AccountState, AuthProcessor, AuthState, AuthView, StateProcessor};
pub use store::{ObservableStore, Subscription, WriteOutcome};
pub use ui::Theme;
pub use view::{connect, View};

use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Prefix of the environment variables read by [`Config::env_overrides`].
pub const ENV_PREFIX: &str = "BANKFLOW_";

/// Client configuration.
///
/// Values come from a TOML file, then from `BANKFLOW_*` environment
/// variables; every key is optional.
///
/// # Example
///
/// ```toml
/// data_dir = "~/.local/share/bankflow"
/// theme = "bank-light"
/// trace_level = "debug"
/// fixture = "fixtures/demo.json"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory holding the log file and the session file.
    ///
    /// Without it, logs go to stderr and the session is kept in memory.
    pub data_dir: Option<PathBuf>,

    /// Tracing filter directive.
    ///
    /// Options: `trace`, `debug`, `info`, `warn`, `error`. Default: `"info"`
    pub trace_level: Option<String>,

    /// Built-in theme name to use.
    ///
    /// Options: `bank-dark`, `bank-light`. Ignored if `theme_file` is set.
    #[serde(rename = "theme")]
    pub theme_name: Option<String>,

    /// Path to a custom TOML theme file.
    ///
    /// Takes precedence over `theme_name`. See [`ui::theme`] for format.
    pub theme_file: Option<PathBuf>,

    /// JSON fixture backing the in-memory backend.
    #[serde(rename = "fixture")]
    pub fixture_path: Option<PathBuf>,
}

impl Config {
    /// Applies overrides from a flat key/value map.
    ///
    /// # Parsing Rules
    ///
    /// - Keys match the TOML keys (`theme`, `fixture`, ...)
    /// - Blank values count as absent and leave the current value alone
    /// - Unknown keys are ignored
    ///
    /// # Example
    ///
    /// ```rust
    /// use std::collections::BTreeMap;
    /// use bankflow::Config;
    ///
    /// let base = Config {
    ///     trace_level: Some("warn".to_string()),
    ///     ..Default::default()
    /// };
    /// let mut map = BTreeMap::new();
    /// map.insert("theme".to_string(), "bank-light".to_string());
    /// map.insert("trace_level".to_string(), "  ".to_string());
    ///
    /// let config = base.with_overrides(&map);
    /// assert_eq!(config.theme_name.as_deref(), Some("bank-light"));
    /// assert_eq!(config.trace_level.as_deref(), Some("warn"));
    /// ```
    #[must_use]
    pub fn with_overrides(self, map: &BTreeMap<String, String>) -> Self {
        let get = |key: &str| {
            map.get(key)
                .map(|v| v.trim())
                .filter(|v| !v.is_empty())
                .map(String::from)
        };

        Self {
            data_dir: get("data_dir").map(PathBuf::from).or(self.data_dir),
            trace_level: get("trace_level").or(self.trace_level),
            theme_name: get("theme").or(self.theme_name),
            theme_file: get("theme_file").map(PathBuf::from).or(self.theme_file),
            fixture_path: get("fixture").map(PathBuf::from).or(self.fixture_path),
        }
    }

    /// Collects `BANKFLOW_*` variables into an override map.
    ///
    /// `BANKFLOW_DATA_DIR` becomes `data_dir`, `BANKFLOW_FIXTURE` becomes
    /// `fixture`, and so on.
    ///
    /// # Example
    ///
    /// ```rust
    /// use bankflow::Config;
    ///
    /// let vars = [
    ///     ("BANKFLOW_THEME".to_string(), "bank-light".to_string()),
    ///     ("HOME".to_string(), "/root".to_string()),
    /// ];
    /// let map = Config::env_overrides(vars);
    /// assert_eq!(map.len(), 1);
    /// assert_eq!(map["theme"], "bank-light");
    /// ```
    #[must_use]
    pub fn env_overrides<I>(vars: I) -> BTreeMap<String, String>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        vars.into_iter()
            .filter_map(|(key, value)| {
                key.strip_prefix(ENV_PREFIX)
                    .map(|name| (name.to_ascii_lowercase(), value))
            })
            .collect()
    }

    /// Loads a configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`BankflowError::Config`] if the file cannot be read or is not
    /// valid TOML for this structure.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            BankflowError::Config(format!("failed to read {}: {e}", path.display()))
        })?;
        toml::from_str(&contents).map_err(|e| {
            BankflowError::Config(format!("failed to parse {}: {e}", path.display()))
        })
    }
}

/// Resolves the theme named by the configuration.
///
/// `theme_file` wins over `theme_name`; anything that fails to load falls
/// back to the default theme with a debug log.
///
/// # Example
///
/// ```rust
/// use bankflow::{initialize, Config};
///
/// let config = Config {
///     theme_name: Some("bank-light".to_string()),
///     ..Default::default()
/// };
///
/// let theme = initialize(&config);
/// assert_eq!(theme.name, "bank-light");
/// ```
#[must_use]
pub fn initialize(config: &Config) -> Theme {
    tracing::debug!(config = ?config, "initializing bankflow");

    config.theme_file.as_ref().map_or_else(
        || {
            config.theme_name.as_ref().map_or_else(Theme::default, |theme_name| {
                Theme::from_name(theme_name).unwrap_or_else(|| {
                    tracing::debug!(theme_name = %theme_name, "unknown theme, using default");
                    Theme::default()
                })
            })
        },
        |theme_file| {
            Theme::from_file(theme_file).unwrap_or_else(|e| {
                tracing::debug!(theme_file = ?theme_file, error = %e, "failed to load theme from file, using default");
                Theme::default()
            })
        },
    )
}
