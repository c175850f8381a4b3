//! Core library for authflow.
//!
//! A client-side session that logs in against an auth service, persists its
//! tokens one key per field, and renews them with a refresh token.
//!
//! ```no_run
//! use authflow_core::{AuthClient, Config, LoginRequest, SessionController};
//!
//! # async fn run() -> anyhow::Result<()> {
//! let config = Config::load()?;
//! let store = config.open_session_store()?;
//! let mut session = SessionController::new(store, AuthClient::new(&config.api_base_url)?);
//!
//! let outcome = session.login(&LoginRequest::new("test@example.com", "password123")).await?;
//! if outcome.success && session.session().needs_refresh() {
//!     session.refresh().await?;
//! }
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod auth;
pub mod config;
pub mod models;
pub mod storage;

pub use api::{ApiError, AuthClient, AuthService, ReferenceAuthService};
pub use auth::{AuthOutcome, Session, SessionController, SessionError, SessionHandle, SessionStore};
pub use config::{Config, StorageBackend};
pub use models::{Gender, LoginForm, LoginRequest, LoginResponse, RefreshRequest, RefreshResponse, User};
