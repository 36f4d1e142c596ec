//! Theme management and ANSI escape sequence generation.
//!
//! This module defines the color scheme used by the terminal views, supporting
//! built-in themes and custom themes loaded from TOML files. It provides
//! utilities for converting hex colors to ANSI escape sequences.
//!
//! # Built-in Themes
//!
//! - `bank-dark`: Dark theme with blue header (default)
//! - `bank-light`: Light theme for bright terminals
//!
//! # TOML Format
//!
//! ```toml
//! name = "my-theme"
//!
//! [colors]
//! header_fg = "#e6edf3"
//! header_bg = "#1f6feb"   # optional
//! label_fg = "#8b949e"
//! text_normal = "#e6edf3"
//! text_dim = "#6e7681"
//! border = "#30363d"
//! error_fg = "#f85149"
//! success_fg = "#3fb950"
//! positive_fg = "#3fb950"
//! negative_fg = "#f0883e"
//! accent_fg = "#58a6ff"
//! ```
//!
//! # Example
//!
//! ```rust
//! use bankflow::ui::Theme;
//!
//! let theme = Theme::from_name("bank-light").unwrap();
//! let title = theme.paint(&theme.colors.accent_fg, "Balance");
//! assert!(title.ends_with(Theme::reset()));
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::domain::{BankflowError, Result};

/// Names accepted by [`Theme::from_name`].
pub const BUILTIN_THEMES: [&str; 2] = ["bank-dark", "bank-light"];

/// Color scheme configuration for the terminal views.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Theme {
    /// Human-readable theme name.
    pub name: String,
    /// Color palette for all UI elements.
    pub colors: ThemeColors,
}

/// Color definitions, as hex strings (e.g. `"#e6edf3"`).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ThemeColors {
    /// Page title text.
    pub header_fg: String,
    /// Optional page title background.
    #[serde(default)]
    pub header_bg: Option<String>,

    /// Field labels ("Routing number", "Balance").
    pub label_fg: String,
    pub text_normal: String,
    /// Secondary text (hints, empty states).
    pub text_dim: String,
    /// Separator lines.
    pub border: String,

    /// Error banners and failed deposit messages.
    pub error_fg: String,
    /// Successful deposit messages.
    pub success_fg: String,

    /// Deposits in the transaction table.
    pub positive_fg: String,
    /// Withdrawals in the transaction table.
    pub negative_fg: String,

    /// Balance and highlighted values.
    pub accent_fg: String,
}

impl Theme {
    /// Loads a built-in theme by name.
    ///
    /// Returns `None` if the name is not one of [`BUILTIN_THEMES`].
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        let toml_str = match name {
            "bank-dark" => include_str!("../../themes/bank-dark.toml"),
            "bank-light" => include_str!("../../themes/bank-light.toml"),
            _ => return None,
        };

        toml::from_str(toml_str).ok()
    }

    /// Loads a theme from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`BankflowError::Theme`] if the file cannot be read or its
    /// contents do not describe a complete theme.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .map_err(|e| BankflowError::Theme(format!("failed to read {}: {e}", path.display())))?;

        toml::from_str(&contents)
            .map_err(|e| BankflowError::Theme(format!("failed to parse {}: {e}", path.display())))
    }

    /// Wraps `text` in the foreground color `hex`, followed by a reset.
    #[must_use]
    pub fn paint(&self, hex: &str, text: &str) -> String {
        format!("{}{text}{}", Self::fg(hex), Self::reset())
    }

    /// Converts a hex color to an RGB tuple.
    ///
    /// Accepts an optional `#` prefix. Malformed input yields white.
    fn hex_to_rgb(hex: &str) -> (u8, u8, u8) {
        let hex = hex.trim().trim_start_matches('#');
        if hex.len() != 6 || !hex.is_ascii() {
            return (255, 255, 255);
        }

        let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&hex[range], 16).unwrap_or(255);
        (channel(0..2), channel(2..4), channel(4..6))
    }

    /// ANSI 24-bit foreground color sequence (`\x1b[38;2;r;g;bm`).
    ///
    /// # Example
    ///
    /// ```rust
    /// use bankflow::ui::Theme;
    ///
    /// assert_eq!(Theme::fg("#ff8000"), "\u{1b}[38;2;255;128;0m");
    /// ```
    #[must_use]
    pub fn fg(hex: &str) -> String {
        let (r, g, b) = Self::hex_to_rgb(hex);
        format!("\u{001b}[38;2;{r};{g};{b}m")
    }

    /// ANSI 24-bit background color sequence (`\x1b[48;2;r;g;bm`).
    #[must_use]
    pub fn bg(hex: &str) -> String {
        let (r, g, b) = Self::hex_to_rgb(hex);
        format!("\u{001b}[48;2;{r};{g};{b}m")
    }

    #[must_use]
    pub const fn bold() -> &'static str {
        "\u{001b}[1m"
    }

    /// Clears all styling.
    #[must_use]
    pub const fn reset() -> &'static str {
        "\u{001b}[0m"
    }
}

impl Default for Theme {
    /// Returns the default theme (`bank-dark`).
    ///
    /// # Panics
    ///
    /// Panics if the built-in theme fails to parse (should never occur).
    fn default() -> Self {
        Self::from_name("bank-dark").expect("Built-in bank-dark theme should always parse")
    }
}
