//! authflow - command-line client for the authflow session.
//!
//! Logs in against an auth service, keeps the tokens in the configured
//! session storage, and renews or drops them on request.

use std::io::{self, BufRead, Write};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{debug, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use authflow_core::{
    AuthClient, AuthOutcome, Config, LoginForm, Session, SessionController, SessionHandle, SessionStore,
};

#[derive(Debug, Parser)]
#[command(name = "authflow", version, about = "Log in to an auth service and keep the session fresh")]
struct Cli {
    /// Auth service base URL (overrides the config file and AUTHFLOW_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Log in and persist the session
    Login {
        #[arg(long)]
        email: Option<String>,
        /// Prompted for when omitted
        #[arg(long)]
        password: Option<String>,
    },
    /// Exchange the refresh token for a new token pair
    Refresh {
        /// Only refresh when the access token is about to expire
        #[arg(long)]
        if_needed: bool,
    },
    /// Forget the session
    Logout,
    /// Show the current session
    Status,
}

/// Initialize the tracing subscriber for logging
fn init_tracing() {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    init_tracing();

    let mut config = Config::load()?;
    if let Some(url) = cli.api_url {
        config.api_base_url = url;
    }
    debug!(api = %config.api_base_url, storage = ?config.storage, "Loaded config");

    let client = AuthClient::new(&config.api_base_url).context("Failed to create HTTP client")?;

    match cli.command {
        Command::Login { email, password } => login(&open_session(&config, client)?, email, password).await,
        Command::Refresh { if_needed } => refresh(&open_session(&config, client)?, if_needed).await,
        // Logout must work even when the persisted session cannot be read back
        Command::Logout => {
            logout(&config, client)?;
            println!("Logged out");
            Ok(ExitCode::SUCCESS)
        }
        Command::Status => {
            let session = open_session(&config, client)?;
            for line in describe_session(&session.snapshot().await) {
                println!("{}", line);
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn open_session(config: &Config, client: AuthClient) -> Result<SessionHandle<AuthClient>> {
    let store = config.open_session_store()?;
    Ok(SessionController::new(store, client).into_handle())
}

/// Clear the session without loading it first
fn logout(config: &Config, client: AuthClient) -> Result<()> {
    let store = SessionStore::new(config.open_storage()?);
    SessionController::new(store, client).logout();
    Ok(())
}

async fn login(
    session: &SessionHandle<AuthClient>,
    email: Option<String>,
    password: Option<String>,
) -> Result<ExitCode> {
    let email = match email {
        Some(email) => email,
        None => prompt_line("Email: ")?,
    };
    let password = match password {
        Some(password) => password,
        None => rpassword::prompt_password("Password: ").context("Failed to read password")?,
    };

    let request = LoginForm::new(email, password).validate()?;
    let outcome = session.login(&request).await?;
    Ok(report(&outcome, "Login successful", "Login failed"))
}

async fn refresh(session: &SessionHandle<AuthClient>, if_needed: bool) -> Result<ExitCode> {
    if session.snapshot().await.refresh_token().is_none() {
        println!("Not logged in");
        return Ok(ExitCode::FAILURE);
    }

    let outcome = if if_needed {
        match session.refresh_if_needed().await? {
            Some(outcome) => outcome,
            None => {
                println!("Access token still valid");
                return Ok(ExitCode::SUCCESS);
            }
        }
    } else {
        session.refresh().await?
    };

    Ok(report(&outcome, "Token refreshed", "Refresh failed; session cleared"))
}

fn report(outcome: &AuthOutcome, success_text: &str, failure_text: &str) -> ExitCode {
    let text = if outcome.success { success_text } else { failure_text };
    match outcome.message {
        Some(ref message) if message != text => println!("{}: {}", text, message),
        _ => println!("{}", text),
    }
    if outcome.success {
        info!("{}", text);
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn prompt_line(prompt: &str) -> Result<String> {
    print!("{}", prompt);
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .context("Failed to read from stdin")?;
    Ok(line.trim().to_string())
}

/// Human-readable summary of a session, one line per fact
fn describe_session(session: &Session) -> Vec<String> {
    let mut lines = Vec::new();

    match session.user() {
        Some(user) if session.is_authenticated() => {
            lines.push(format!("Logged in as {} <{}>", user.full_name(), user.email));
        }
        _ => lines.push("Not logged in".to_string()),
    }

    if session.access_token().is_some() {
        let expiry = match (session.is_access_token_expired(), session.minutes_until_expiry()) {
            (true, _) => "expired".to_string(),
            (false, Some(minutes)) => format!("expires in {}m", minutes),
            (false, None) => "expiry unknown".to_string(),
        };
        lines.push(format!("Access token: {}", expiry));
    }

    if session.refresh_token().is_some() {
        let expiry = match session.refresh_token_expires_at() {
            Some(_) if session.is_refresh_token_expired() => "expired".to_string(),
            Some(at) => format!("valid until {}", at),
            None => "expiry unknown".to_string(),
        };
        lines.push(format!("Refresh token: {}", expiry));
    }

    lines
}
