//! Login, refresh, and logout over a `SessionStore`.
//!
//! Two states are reachable through these operations: unauthenticated (every
//! field empty) and authenticated (tokens and user present). A rejected login
//! leaves the session as it was. A rejected or failed refresh logs out.

use tracing::{debug, info, warn};

use super::{Session, SessionError, SessionHandle, SessionStore};
use crate::api::AuthService;
use crate::models::{LoginRequest, LoginResponse, RefreshRequest, RefreshResponse, User};

/// Result of a `login` or `refresh` that did not fault.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthOutcome {
    pub success: bool,
    /// Message supplied by the auth service, if any
    pub message: Option<String>,
}

impl AuthOutcome {
    fn succeeded(message: Option<String>) -> Self {
        Self {
            success: true,
            message,
        }
    }

    fn failed(message: Option<String>) -> Self {
        Self {
            success: false,
            message,
        }
    }

    pub fn is_success(&self) -> bool {
        self.success
    }
}

pub struct SessionController<S> {
    store: SessionStore,
    service: S,
}

impl<S: AuthService> SessionController<S> {
    pub fn new(store: SessionStore, service: S) -> Self {
        Self { store, service }
    }

    /// Move the controller behind a lock so clones can share it across tasks
    pub fn into_handle(self) -> SessionHandle<S> {
        SessionHandle::new(self)
    }

    pub fn session(&self) -> &Session {
        self.store.session()
    }

    pub fn is_authenticated(&self) -> bool {
        self.store.session().is_authenticated()
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    /// Replace both tokens. Each expiry is replaced only when one is given;
    /// `None` or an empty string keeps whatever expiry is already held.
    pub fn set_tokens(
        &mut self,
        access_token: impl Into<String>,
        refresh_token: impl Into<String>,
        access_token_expires_at: Option<String>,
        refresh_token_expires_at: Option<String>,
    ) -> Result<(), SessionError> {
        self.store.set_access_token(Some(access_token.into()))?;
        self.store.set_refresh_token(Some(refresh_token.into()))?;
        if let Some(exp) = non_empty(access_token_expires_at) {
            self.store.set_access_token_expires_at(Some(exp))?;
        }
        if let Some(exp) = non_empty(refresh_token_expires_at) {
            self.store.set_refresh_token_expires_at(Some(exp))?;
        }
        Ok(())
    }

    /// Log in with `credentials`.
    ///
    /// The session changes only if the service reports success with an access
    /// token, a refresh token, and a user. Anything less is a rejection and the
    /// prior session is kept. Transport faults are returned as errors with the
    /// session unchanged.
    pub async fn login(&mut self, credentials: &LoginRequest) -> Result<AuthOutcome, SessionError> {
        let response = self.service.login(credentials).await?;

        let LoginResponse {
            success,
            message,
            access_token,
            access_token_expires_at,
            refresh_token,
            refresh_token_expires_at,
            user,
        } = response;

        match (success, non_empty(access_token), non_empty(refresh_token), user) {
            (true, Some(access), Some(refresh), Some(user)) => {
                let user_id = user.id.clone();
                if let Err(e) = self.establish(access, refresh, access_token_expires_at, refresh_token_expires_at, user) {
                    warn!(error = %e, "Failed to persist login; clearing session");
                    self.logout();
                    return Err(e);
                }
                info!(user_id = %user_id, "Logged in");
                Ok(AuthOutcome::succeeded(message))
            }
            (success, ..) => {
                if success {
                    warn!(email = %credentials.email, "Login response reported success but was incomplete");
                } else {
                    debug!(email = %credentials.email, "Login rejected");
                }
                Ok(AuthOutcome::failed(message))
            }
        }
    }

    /// Clear every session field and storage key. Never fails.
    pub fn logout(&mut self) {
        let failures = self.store.clear();
        if failures > 0 {
            warn!(failures = failures, "Logged out with storage keys left behind");
        } else {
            info!("Logged out");
        }
    }

    /// Exchange the held refresh token for a new token pair.
    ///
    /// Without a refresh token this returns a failed outcome and makes no
    /// request. Any outcome other than a complete success ends the session,
    /// including transport faults, which are logged rather than returned.
    pub async fn refresh(&mut self) -> Result<AuthOutcome, SessionError> {
        let Some(refresh_token) = self.store.session().refresh_token().map(str::to_owned) else {
            debug!("No refresh token held; skipping refresh");
            return Ok(AuthOutcome::failed(None));
        };

        let response = match self.service.refresh_token(&RefreshRequest { refresh_token }).await {
            Ok(response) => response,
            Err(e) => {
                warn!(error = %e, "Refresh request failed; ending session");
                self.logout();
                return Ok(AuthOutcome::failed(Some(e.to_string())));
            }
        };

        let RefreshResponse {
            success,
            message,
            access_token,
            access_token_expires_at,
            refresh_token,
            refresh_token_expires_at,
        } = response;

        match (success, non_empty(access_token), non_empty(refresh_token)) {
            (true, Some(access), Some(refresh)) => {
                if let Err(e) = self.set_tokens(access, refresh, access_token_expires_at, refresh_token_expires_at) {
                    warn!(error = %e, "Failed to persist refreshed tokens; ending session");
                    self.logout();
                    return Err(e);
                }
                info!("Refreshed tokens");
                Ok(AuthOutcome::succeeded(message))
            }
            _ => {
                warn!(success = success, "Refresh rejected; ending session");
                self.logout();
                Ok(AuthOutcome::failed(message))
            }
        }
    }

    fn establish(
        &mut self,
        access_token: String,
        refresh_token: String,
        access_token_expires_at: Option<String>,
        refresh_token_expires_at: Option<String>,
        user: User,
    ) -> Result<(), SessionError> {
        self.set_tokens(access_token, refresh_token, access_token_expires_at, refresh_token_expires_at)?;
        self.store.set_user(Some(user))?;
        Ok(())
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
