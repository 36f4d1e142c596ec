//! Command-line front end for the bankflow state core.
//!
//! Reads one command per line from stdin, feeds it to the login or account
//! page, and renders both pages to the terminal through store-bound views.
//!
//! # Usage
//!
//! ```text
//! bankflow [config.toml]
//! ```
//!
//! `BANKFLOW_*` environment variables override the matching configuration
//! keys, e.g. `BANKFLOW_FIXTURE` or `BANKFLOW_DATA_DIR`.
//!
//! # Commands
//!
//! - `login <username> <password>`: Sign in
//! - `verify <code>`: Complete a two-factor challenge
//! - `view <login|register|twofa-setup|twofa-verify>`: Switch the auth view
//! - `load` / `refresh`: (Re)load the account page
//! - `deposit <amount>`: Deposit into the signed-in account
//! - `logout`: Sign out and forget the stored session
//! - `quit`: Exit
//!
//! # Session Lifecycle
//!
//! 1. **Startup**: Parse config, initialize tracing, load the fixture backend
//! 2. **Restore**: A token from the session file opens the account page directly
//! 3. **Loop**: Each line becomes a page event; returned actions are executed
//! 4. **Exit**: On `quit` or end of input

use std::io::{self, BufRead, Stdout};
use std::process::ExitCode;

use bankflow::app::{handle_event, AccountAction, AccountEvent, AccountPage, AuthAction, AuthEvent, LoginPage};
use bankflow::observability::init_tracing;
use bankflow::presenter::Molecule;
use bankflow::storage::{JsonSessionStore, MemorySessionStore, SessionStore};
use bankflow::ui::TerminalView;
use bankflow::{
    connect, initialize, AccountProcessor, AccountState, AuthProcessor, AuthState, AuthView, BankflowError, Config,
    FixtureApi, Subscription, Theme,
};

const USAGE: &str = "commands: login <user> <password> | verify <code> | view <name> | load | refresh | deposit <amount> | logout | quit";

/// One parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    Auth(AuthEvent),
    Account(AccountEvent),
    Quit,
}

fn parse_command(line: &str) -> Option<Command> {
    let mut words = line.split_whitespace();
    let head = (words.next()?, words.next(), words.next());
    if words.next().is_some() {
        return None;
    }
    let command = match head {
        ("login", Some(username), password) => Command::Auth(AuthEvent::Login {
            username: username.to_string(),
            password: password.unwrap_or_default().to_string(),
        }),
        ("verify", code, None) => Command::Auth(AuthEvent::VerifyTwoFactor {
            code: code.unwrap_or_default().to_string(),
        }),
        ("view", Some(name), None) => Command::Auth(AuthEvent::ShowView(parse_view(name)?)),
        ("load", None, None) => Command::Account(AccountEvent::Load),
        ("refresh", None, None) => Command::Account(AccountEvent::Refresh),
        ("deposit", amount, None) => Command::Account(AccountEvent::Deposit {
            amount: amount.unwrap_or_default().to_string(),
        }),
        ("logout", None, None) => Command::Account(AccountEvent::Logout),
        ("quit" | "exit", None, None) => Command::Quit,
        _ => return None,
    };
    Some(command)
}

fn parse_view(name: &str) -> Option<AuthView> {
    [AuthView::Login, AuthView::Register, AuthView::TwoFaSetup, AuthView::TwoFaVerify]
        .into_iter()
        .find(|view| view.as_str() == name)
}

/// Everything one interactive session owns.
struct Session {
    api: FixtureApi,
    sessions: Box<dyn SessionStore>,
    theme: Theme,
    auth: Molecule<AuthState, AuthProcessor>,
    account: Molecule<AccountState, AccountProcessor>,
    /// Bound while the account page is shown.
    account_view: Option<Subscription>,
    _auth_view: Subscription,
}

impl Session {
    fn new(api: FixtureApi, sessions: Box<dyn SessionStore>, theme: Theme) -> Self {
        let auth = AuthProcessor::launch();
        let account = AccountProcessor::launch();
        let auth_view = connect(&auth.store, TerminalView::new(io::stdout(), theme.clone()), "login-view");
        Self {
            api,
            sessions,
            theme,
            auth,
            account,
            account_view: None,
            _auth_view: auth_view,
        }
    }

    fn token(&self) -> Option<String> {
        match self.sessions.load() {
            Ok(token) => token,
            Err(e) => {
                tracing::warn!(error = %e, "session file unreadable, starting signed out");
                None
            }
        }
    }

    fn dispatch(&mut self, command: &Command) {
        match command {
            Command::Auth(event) => self.auth_event(event),
            Command::Account(event) => self.account_event(event),
            Command::Quit => {}
        }
    }

    fn auth_event(&mut self, event: &AuthEvent) {
        let actions = {
            let mut page = LoginPage::new(self.auth.processor.clone(), &mut self.api);
            handle_event(&mut page, event)
        };
        for action in actions {
            self.run_auth_action(action);
        }
    }

    fn account_event(&mut self, event: &AccountEvent) {
        let token = self.token();
        let actions = {
            let mut page = AccountPage::new(self.account.processor.clone(), &mut self.api, token);
            handle_event(&mut page, event)
        };
        for action in actions {
            self.run_account_action(action);
        }
    }

    fn run_auth_action(&mut self, action: AuthAction) {
        match action {
            AuthAction::StoreToken(token) => self.store_token(&token),
            AuthAction::ClearToken => self.clear_token(),
            AuthAction::OpenAccountPage => {
                self.show_account_page();
                self.account_event(&AccountEvent::Load);
            }
        }
    }

    fn run_account_action(&mut self, action: AccountAction) {
        match action {
            AccountAction::RedirectToLogin => {
                if let Some(sub) = self.account_view.take() {
                    sub.unsubscribe();
                }
                self.auth.processor.logout();
            }
            AccountAction::ClearToken => self.clear_token(),
            AccountAction::DepositMessage(message) => {
                let hex = if message.is_error() {
                    &self.theme.colors.error_fg
                } else {
                    &self.theme.colors.success_fg
                };
                println!("{}", self.theme.paint(hex, message.text()));
            }
            AccountAction::HideDepositForm => tracing::debug!("deposit form closed"),
            AccountAction::TransactionsUnavailable(message) => {
                println!("{}", self.theme.paint(&self.theme.colors.error_fg, &message));
            }
        }
    }

    fn show_account_page(&mut self) {
        if self.account_view.is_none() {
            let view: TerminalView<Stdout> = TerminalView::new(io::stdout(), self.theme.clone());
            self.account_view = Some(connect(&self.account.store, view, "account-view"));
        }
    }

    fn store_token(&mut self, token: &str) {
        if let Err(e) = self.sessions.save(token) {
            tracing::error!(error = %e, "failed to persist session");
        }
    }

    fn clear_token(&mut self) {
        if let Err(e) = self.sessions.clear() {
            tracing::error!(error = %e, "failed to clear session");
        }
    }
}

fn load_config() -> bankflow::Result<Config> {
    let config = match std::env::args().nth(1) {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };
    let vars = std::env::vars_os()
        .filter_map(|(key, value)| Some((key.into_string().ok()?, value.into_string().ok()?)));
    Ok(config.with_overrides(&Config::env_overrides(vars)))
}

fn run() -> bankflow::Result<()> {
    let config = load_config()?;
    let log_target = init_tracing(&config);
    tracing::info!(log_target = ?log_target, "bankflow starting");

    let theme = initialize(&config);
    let fixture = config.fixture_path.as_ref().ok_or_else(|| {
        BankflowError::Config("no fixture configured; set `fixture` or BANKFLOW_FIXTURE".to_string())
    })?;
    let api = FixtureApi::from_path(fixture)?;

    let sessions: Box<dyn SessionStore> = match &config.data_dir {
        Some(dir) => Box::new(JsonSessionStore::in_dir(dir)),
        None => Box::new(MemorySessionStore::default()),
    };

    let mut session = Session::new(api, sessions, theme);
    if session.token().is_some() {
        tracing::info!("restoring saved session");
        session.show_account_page();
        session.account_event(&AccountEvent::Load);
    }

    for line in io::stdin().lock().lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        match parse_command(&line) {
            Some(Command::Quit) => break,
            Some(command) => session.dispatch(&command),
            None => eprintln!("{USAGE}"),
        }
    }

    tracing::info!("bankflow exiting");
    Ok(())
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("bankflow: {e}");
            ExitCode::FAILURE
        }
    }
}
