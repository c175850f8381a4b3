use std::sync::Arc;

use tokio::sync::Mutex;

use super::{AuthOutcome, Session, SessionController, SessionError};
use crate::api::AuthService;
use crate::models::LoginRequest;

/// Shared access to one `SessionController`.
///
/// Clone is cheap. The lock is held for the whole of each operation, including
/// the auth service call, so at most one login, refresh, or logout runs at a
/// time and a logout cannot interleave with a refresh.
pub struct SessionHandle<S> {
    inner: Arc<Mutex<SessionController<S>>>,
}

impl<S> Clone for SessionHandle<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: AuthService> SessionHandle<S> {
    pub fn new(controller: SessionController<S>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(controller)),
        }
    }

    pub async fn login(&self, credentials: &LoginRequest) -> Result<AuthOutcome, SessionError> {
        self.inner.lock().await.login(credentials).await
    }

    pub async fn refresh(&self) -> Result<AuthOutcome, SessionError> {
        self.inner.lock().await.refresh().await
    }

    pub async fn logout(&self) {
        self.inner.lock().await.logout();
    }

    pub async fn set_tokens(
        &self,
        access_token: impl Into<String>,
        refresh_token: impl Into<String>,
        access_token_expires_at: Option<String>,
        refresh_token_expires_at: Option<String>,
    ) -> Result<(), SessionError> {
        self.inner.lock().await.set_tokens(
            access_token,
            refresh_token,
            access_token_expires_at,
            refresh_token_expires_at,
        )
    }

    /// Copy of the current session
    pub async fn snapshot(&self) -> Session {
        self.inner.lock().await.session().clone()
    }

    pub async fn is_authenticated(&self) -> bool {
        self.inner.lock().await.is_authenticated()
    }

    /// Refresh only when the access token is close to expiry.
    /// Returns `None` when no refresh was needed.
    pub async fn refresh_if_needed(&self) -> Result<Option<AuthOutcome>, SessionError> {
        let mut controller = self.inner.lock().await;
        if !controller.session().needs_refresh() {
            return Ok(None);
        }
        controller.refresh().await.map(Some)
    }
}
