//! The reference auth service: one hard-coded user, fixed tokens, no real checks.
//!
//! Used directly in-process by tests and wrapped in HTTP by `authflow-server`.

use async_trait::async_trait;
use chrono::{DateTime, Duration, SecondsFormat, Utc};
use tracing::{debug, info};

use super::{ApiError, AuthService};
use crate::models::{Gender, LoginRequest, LoginResponse, RefreshRequest, RefreshResponse, User};

/// The only email the reference service accepts
pub const DEMO_EMAIL: &str = "test@example.com";

/// The only password the reference service accepts
pub const DEMO_PASSWORD: &str = "password123";

pub const LOGIN_ACCESS_TOKEN: &str = "dummy-access-token";
pub const LOGIN_REFRESH_TOKEN: &str = "dummy-refresh-token";
pub const REFRESHED_ACCESS_TOKEN: &str = "dummy-new-access-token";
pub const REFRESHED_REFRESH_TOKEN: &str = "dummy-new-refresh-token";

/// Access token lifetime in minutes
const ACCESS_TOKEN_TTL_MINUTES: i64 = 15;

/// Refresh token lifetime in days
const REFRESH_TOKEN_TTL_DAYS: i64 = 7;

/// Format a timestamp the way the service sends it: RFC 3339, milliseconds, `Z`
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[derive(Debug, Clone)]
pub struct ReferenceAuthService {
    user: User,
}

impl ReferenceAuthService {
    pub fn new() -> Self {
        let now = format_timestamp(Utc::now());
        Self {
            user: User {
                id: "1".to_string(),
                email: DEMO_EMAIL.to_string(),
                first_name: "John".to_string(),
                last_name: "Doe".to_string(),
                age: 30,
                gender: Gender::Male,
                created_at: now.clone(),
                updated_at: now,
            },
        }
    }

    pub fn user(&self) -> &User {
        &self.user
    }

    /// Check credentials against the hard-coded user.
    pub fn authenticate(&self, request: &LoginRequest) -> LoginResponse {
        if request.email != self.user.email || request.password != DEMO_PASSWORD {
            info!(email = %request.email, "Rejected login");
            return LoginResponse::failure("Invalid email or password");
        }

        let now = Utc::now();
        info!(email = %request.email, "Accepted login");
        LoginResponse {
            success: true,
            message: Some("Login successful".to_string()),
            access_token: Some(LOGIN_ACCESS_TOKEN.to_string()),
            access_token_expires_at: Some(format_timestamp(now + Duration::minutes(ACCESS_TOKEN_TTL_MINUTES))),
            refresh_token: Some(LOGIN_REFRESH_TOKEN.to_string()),
            refresh_token_expires_at: Some(format_timestamp(now + Duration::days(REFRESH_TOKEN_TTL_DAYS))),
            user: Some(self.user.clone()),
        }
    }

    /// Issue a new token pair for any non-empty refresh token.
    pub fn renew(&self, request: &RefreshRequest) -> RefreshResponse {
        if request.refresh_token.is_empty() {
            debug!("Rejected refresh with empty token");
            return RefreshResponse::failure("Invalid refresh request");
        }

        let now = Utc::now();
        RefreshResponse {
            success: true,
            message: Some("Token refreshed successfully".to_string()),
            access_token: Some(REFRESHED_ACCESS_TOKEN.to_string()),
            access_token_expires_at: Some(format_timestamp(now + Duration::minutes(ACCESS_TOKEN_TTL_MINUTES))),
            refresh_token: Some(REFRESHED_REFRESH_TOKEN.to_string()),
            refresh_token_expires_at: Some(format_timestamp(now + Duration::days(REFRESH_TOKEN_TTL_DAYS))),
        }
    }
}

impl Default for ReferenceAuthService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AuthService for ReferenceAuthService {
    async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, ApiError> {
        Ok(self.authenticate(request))
    }

    async fn refresh_token(&self, request: &RefreshRequest) -> Result<RefreshResponse, ApiError> {
        Ok(self.renew(request))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(ts: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(ts)
            .expect("timestamp should be RFC 3339")
            .with_timezone(&Utc)
    }

    #[test]
    fn test_authenticate_demo_user() {
        let service = ReferenceAuthService::new();
        let resp = service.authenticate(&LoginRequest::new(DEMO_EMAIL, DEMO_PASSWORD));

        assert!(resp.success);
        assert_eq!(resp.message.as_deref(), Some("Login successful"));
        assert_eq!(resp.access_token.as_deref(), Some(LOGIN_ACCESS_TOKEN));
        assert_eq!(resp.refresh_token.as_deref(), Some(LOGIN_REFRESH_TOKEN));
        assert_eq!(resp.user.as_ref(), Some(service.user()));

        let access_exp = parse(resp.access_token_expires_at.as_deref().unwrap());
        let refresh_exp = parse(resp.refresh_token_expires_at.as_deref().unwrap());
        let access_ttl = access_exp - Utc::now();
        assert!(access_ttl > Duration::minutes(14) && access_ttl <= Duration::minutes(15));
        assert!(refresh_exp - Utc::now() > Duration::days(6));
    }

    #[test]
    fn test_authenticate_rejects_wrong_credentials() {
        let service = ReferenceAuthService::new();
        for (email, password) in [("wrong@example.com", "x"), (DEMO_EMAIL, "x"), ("wrong@example.com", DEMO_PASSWORD)] {
            let resp = service.authenticate(&LoginRequest::new(email, password));
            assert_eq!(resp, LoginResponse::failure("Invalid email or password"));
        }
    }

    #[test]
    fn test_renew_accepts_any_non_empty_token() {
        let service = ReferenceAuthService::new();
        let resp = service.renew(&RefreshRequest {
            refresh_token: "anything".to_string(),
        });
        assert!(resp.success);
        assert_eq!(resp.access_token.as_deref(), Some(REFRESHED_ACCESS_TOKEN));
        assert_eq!(resp.refresh_token.as_deref(), Some(REFRESHED_REFRESH_TOKEN));

        let rejected = service.renew(&RefreshRequest {
            refresh_token: String::new(),
        });
        assert_eq!(rejected, RefreshResponse::failure("Invalid refresh request"));
    }

    #[test]
    fn test_timestamp_format() {
        let at = parse("2026-10-18T12:34:56.789Z");
        assert_eq!(format_timestamp(at), "2026-10-18T12:34:56.789Z");
    }
}
