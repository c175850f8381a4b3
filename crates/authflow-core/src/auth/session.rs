use chrono::{DateTime, Duration, Utc};

use crate::models::User;

/// Buffer before access token expiry at which a refresh is advisable (5 minutes)
const TOKEN_REFRESH_BUFFER_MINUTES: i64 = 5;

/// Authentication state held by one client.
///
/// Fields can only be changed through a `SessionController`. Expiry values are
/// the strings the auth service sent; the parsed accessors return `None` for
/// values that are not RFC 3339.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub(crate) user: Option<User>,
    pub(crate) access_token: Option<String>,
    pub(crate) refresh_token: Option<String>,
    pub(crate) access_token_expires_at: Option<String>,
    pub(crate) refresh_token_expires_at: Option<String>,
}

impl Session {
    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn access_token(&self) -> Option<&str> {
        self.access_token.as_deref()
    }

    pub fn refresh_token(&self) -> Option<&str> {
        self.refresh_token.as_deref()
    }

    pub fn access_token_expires_at(&self) -> Option<&str> {
        self.access_token_expires_at.as_deref()
    }

    pub fn refresh_token_expires_at(&self) -> Option<&str> {
        self.refresh_token_expires_at.as_deref()
    }

    /// Authenticated means both an access token and a user are held.
    pub fn is_authenticated(&self) -> bool {
        self.access_token.is_some() && self.user.is_some()
    }

    /// True when no field is set
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn access_token_expiry(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(self.access_token_expires_at.as_deref())
    }

    pub fn refresh_token_expiry(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(self.refresh_token_expires_at.as_deref())
    }

    /// Whether the access token's known expiry has passed.
    /// An unknown expiry is never reported as expired.
    pub fn is_access_token_expired(&self) -> bool {
        self.access_token_expiry()
            .map(|expiry| Utc::now() > expiry)
            .unwrap_or(false)
    }

    pub fn is_refresh_token_expired(&self) -> bool {
        self.refresh_token_expiry()
            .map(|expiry| Utc::now() > expiry)
            .unwrap_or(false)
    }

    /// Check if the access token will expire soon and should be refreshed
    pub fn needs_refresh(&self) -> bool {
        self.access_token_expiry()
            .map(|expiry| Utc::now() > expiry - Duration::minutes(TOKEN_REFRESH_BUFFER_MINUTES))
            .unwrap_or(false)
    }

    /// Get minutes remaining until the access token expires (for display)
    pub fn minutes_until_expiry(&self) -> Option<i64> {
        self.access_token_expiry()
            .map(|expiry| (expiry - Utc::now()).num_minutes().max(0))
    }
}

fn parse_timestamp(value: Option<&str>) -> Option<DateTime<Utc>> {
    value
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc))
}
