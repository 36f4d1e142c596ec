//! Terminal renderer for the account and login pages.
//!
//! The renderer follows a two-step process:
//!
//! 1. **View Model Computation**: Transform the store snapshot into a view model
//! 2. **Output**: Write the view model as ANSI-styled lines to any `Write`
//!
//! # Example
//!
//! ```rust
//! use bankflow::presenter::AccountProcessor;
//! use bankflow::ui::TerminalView;
//! use bankflow::view::connect;
//!
//! let account = AccountProcessor::launch();
//! let _sub = connect(&account.store, TerminalView::plain(Vec::new()), "account-view");
//! account.processor.set_loading(true);
//! ```

use std::io::Write;

use crate::domain::RenderError;
use crate::presenter::{AccountState, AuthState};
use crate::view::View;

use super::theme::Theme;
use super::viewmodel::{AccountSummary, AccountViewModel, AuthViewModel, TransactionKind, TransactionRow};

const RULE_WIDTH: usize = 48;

/// A [`View`] writing pages to a terminal or any other byte sink.
///
/// One instance renders one store; connect a separate instance per page.
pub struct TerminalView<W> {
    out: W,
    theme: Theme,
    styled: bool,
}

impl<W: Write> TerminalView<W> {
    /// Renders with colors from `theme`.
    pub fn new(out: W, theme: Theme) -> Self {
        Self {
            out,
            theme,
            styled: true,
        }
    }

    /// Renders without escape sequences.
    pub fn plain(out: W) -> Self {
        Self {
            out,
            theme: Theme::default(),
            styled: false,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn paint(&self, hex: &str, text: &str) -> String {
        if self.styled {
            self.theme.paint(hex, text)
        } else {
            text.to_string()
        }
    }

    fn header(&mut self, title: &str) -> std::io::Result<()> {
        let line = if self.styled {
            let bg = self.theme.colors.header_bg.as_deref().map(Theme::bg).unwrap_or_default();
            format!(
                "{}{bg}{} {title} {}",
                Theme::bold(),
                Theme::fg(&self.theme.colors.header_fg),
                Theme::reset()
            )
        } else {
            format!("== {title} ==")
        };
        writeln!(self.out, "{line}")
    }

    fn rule(&mut self) -> std::io::Result<()> {
        let rule = self.paint(&self.theme.colors.border, &"─".repeat(RULE_WIDTH));
        writeln!(self.out, "{rule}")
    }

    fn field(&mut self, label: &str, value: &str, value_hex: Option<&str>) -> std::io::Result<()> {
        let label = self.paint(&self.theme.colors.label_fg, &format!("{label:<16}"));
        let value = match value_hex {
            Some(hex) => self.paint(hex, value),
            None => value.to_string(),
        };
        writeln!(self.out, "{label}{value}")
    }

    fn render_account(&mut self, vm: &AccountViewModel) -> Result<(), RenderError> {
        self.header("Account")?;
        match vm {
            AccountViewModel::Loading => {
                let text = self.paint(&self.theme.colors.text_dim, "Loading your account details...");
                writeln!(self.out, "{text}")?;
            }
            AccountViewModel::Error { message } => {
                let title = self.paint(&self.theme.colors.error_fg, "Error Loading Account");
                writeln!(self.out, "{title}")?;
                writeln!(self.out, "{message}")?;
                let hint = self.paint(&self.theme.colors.text_dim, "Please try again or create a new account.");
                writeln!(self.out, "{hint}")?;
            }
            AccountViewModel::Details {
                user_name,
                account,
                rows,
                show_no_transactions,
            } => {
                if let Some(name) = user_name {
                    self.field("Name", name, None)?;
                }
                if let Some(summary) = account {
                    self.render_summary(summary)?;
                }
                self.rule()?;
                self.render_rows(rows)?;
                if *show_no_transactions {
                    let text = self.paint(&self.theme.colors.text_dim, "No transactions yet.");
                    writeln!(self.out, "{text}")?;
                }
            }
        }
        self.out.flush()?;
        Ok(())
    }

    fn render_summary(&mut self, summary: &AccountSummary) -> std::io::Result<()> {
        self.field("Routing number", &summary.routing_number, None)?;
        self.field("Account number", &summary.account_number, None)?;
        let accent = self.theme.colors.accent_fg.clone();
        self.field("Balance", &format!("${}", summary.balance), Some(&accent))
    }

    fn render_rows(&mut self, rows: &[TransactionRow]) -> std::io::Result<()> {
        for row in rows {
            let hex = match row.kind {
                TransactionKind::Deposit => &self.theme.colors.positive_fg,
                TransactionKind::Withdrawal => &self.theme.colors.negative_fg,
            };
            let amount = self.paint(hex, &format!("{:>12}", row.amount));
            writeln!(self.out, "{:<20} {:<11}{amount}", row.date, row.kind.label())?;
        }
        Ok(())
    }

    fn render_auth(&mut self, vm: &AuthViewModel) -> Result<(), RenderError> {
        self.header(vm.title)?;
        if vm.is_loading {
            let text = self.paint(&self.theme.colors.text_dim, "Please wait...");
            writeln!(self.out, "{text}")?;
        }
        if let Some(error) = &vm.error {
            let text = self.paint(&self.theme.colors.error_fg, error);
            writeln!(self.out, "{text}")?;
        }
        if let Some(secret) = &vm.two_fa_secret {
            let accent = self.theme.colors.accent_fg.clone();
            self.field("Secret", secret, Some(&accent))?;
            let hint = self.paint(
                &self.theme.colors.text_dim,
                "Add this secret to your authenticator app, then enter a code.",
            );
            writeln!(self.out, "{hint}")?;
        }
        if let Some(name) = &vm.signed_in_as {
            let text = self.paint(&self.theme.colors.success_fg, &format!("Signed in as {name}"));
            writeln!(self.out, "{text}")?;
        }
        self.out.flush()?;
        Ok(())
    }
}

impl<W: Write> View<AccountState> for TerminalView<W> {
    fn render(&mut self, state: &AccountState) -> Result<(), RenderError> {
        self.render_account(&AccountViewModel::from_state(state))
    }
}

impl<W: Write> View<AuthState> for TerminalView<W> {
    fn render(&mut self, state: &AuthState) -> Result<(), RenderError> {
        self.render_auth(&AuthViewModel::from_state(state))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Account;

    fn render_account(state: &AccountState) -> String {
        let mut view = TerminalView::plain(Vec::new());
        View::<AccountState>::render(&mut view, state).unwrap();
        String::from_utf8(view.into_inner()).unwrap()
    }

    #[test]
    fn plain_account_details() {
        let state = AccountState {
            account: Some(Account {
                id: 1,
                user_id: 1,
                balance: "99.5".into(),
                routing_number: "021000021".into(),
                account_number: String::new(),
                is_bank_linked: false,
                is_bank_verified: false,
            }),
            ..AccountState::default()
        };

        let out = render_account(&state);
        assert!(out.starts_with("== Account =="));
        assert!(out.contains("021000021"));
        assert!(out.contains("N/A"));
        assert!(out.contains("$99.50"));
        assert!(out.contains("No transactions yet."));
        assert!(!out.contains('\u{1b}'));
    }

    #[test]
    fn error_banner() {
        let state = AccountState {
            error: Some("Account not found".into()),
            ..AccountState::default()
        };
        let out = render_account(&state);
        assert!(out.contains("Error Loading Account"));
        assert!(out.contains("Account not found"));
    }

    #[test]
    fn styled_output_uses_theme() {
        let mut view = TerminalView::new(Vec::new(), Theme::default());
        View::<AuthState>::render(&mut view, &AuthState::default()).unwrap();
        let out = String::from_utf8(view.into_inner()).unwrap();
        assert!(out.contains("Sign In"));
        assert!(out.contains(Theme::reset()));
    }

    struct Closed;

    impl Write for Closed {
        fn write(&mut self, _: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn write_failures_surface_as_render_errors() {
        let mut view = TerminalView::plain(Closed);
        let err = View::<AccountState>::render(&mut view, &AccountState::default()).unwrap_err();
        assert!(matches!(err, RenderError::Io(_)));
    }
}
