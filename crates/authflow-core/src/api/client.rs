//! HTTP client for the auth service.
//!
//! Both endpoints answer 401 with a `{success: false, message}` body when the
//! credentials or refresh token are rejected. The client hands those bodies
//! back as ordinary responses so callers see a rejection, not a fault.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header, Client, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use tracing::debug;

use super::{ApiError, AuthService};
use crate::models::{LoginRequest, LoginResponse, RefreshRequest, RefreshResponse};

// ============================================================================
// Constants
// ============================================================================

/// Base URL of the reference auth service when run locally
pub const DEFAULT_BASE_URL: &str = "http://localhost:4000";

/// HTTP request timeout in seconds.
const REQUEST_TIMEOUT_SECS: u64 = 30;

const LOGIN_PATH: &str = "login";
const REFRESH_TOKEN_PATH: &str = "refresh-token";

/// Auth service client.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Debug, Clone)]
pub struct AuthClient {
    client: Client,
    base_url: String,
}

impl AuthClient {
    /// Create a client for the service rooted at `base_url`
    pub fn new(base_url: impl Into<String>) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    async fn post<T: DeserializeOwned, B: Serialize>(&self, path: &str, body: &B) -> Result<T, ApiError> {
        let url = self.url(path);

        let response = self
            .client
            .post(&url)
            .header(header::ACCEPT, "application/json")
            .json(body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        debug!(url = %url, status = status.as_u16(), "Auth service responded");

        if status.is_success() {
            return serde_json::from_str(&text).map_err(|e| {
                ApiError::InvalidResponse(format!("Failed to parse JSON response from {}: {}", url, e))
            });
        }

        // A rejection carries a regular response body
        if status == StatusCode::UNAUTHORIZED {
            if let Ok(parsed) = serde_json::from_str(&text) {
                return Ok(parsed);
            }
        }

        Err(ApiError::from_status(status, &text))
    }
}

#[async_trait]
impl AuthService for AuthClient {
    async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, ApiError> {
        self.post(LOGIN_PATH, request).await
    }

    async fn refresh_token(&self, request: &RefreshRequest) -> Result<RefreshResponse, ApiError> {
        self.post(REFRESH_TOKEN_PATH, request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = AuthClient::new("http://localhost:4000/").expect("Failed to build client");
        assert_eq!(client.base_url(), "http://localhost:4000");
        assert_eq!(client.url("login"), "http://localhost:4000/login");
    }

    #[tokio::test]
    async fn test_login_success() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/login"))
            .and(body_json(serde_json::json!({
                "email": "test@example.com",
                "password": "password123"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "success": true,
                "message": "Login successful",
                "access_token": "dummy-access-token",
                "refresh_token": "dummy-refresh-token",
                "user": {
                    "id": "1",
                    "email": "test@example.com",
                    "first_name": "John",
                    "last_name": "Doe",
                    "age": 30,
                    "gender": "male",
                    "created_at": "2026-01-01T00:00:00.000Z",
                    "updated_at": "2026-01-01T00:00:00.000Z"
                }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = AuthClient::new(server.uri()).unwrap();
        let resp = client
            .login(&LoginRequest::new("test@example.com", "password123"))
            .await
            .expect("login should not fail");

        assert!(resp.success);
        assert_eq!(resp.access_token.as_deref(), Some("dummy-access-token"));
        assert_eq!(resp.user.map(|u| u.email).as_deref(), Some("test@example.com"));
    }

    #[tokio::test]
    async fn test_login_rejection_is_not_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/login"))
            .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
                "success": false,
                "message": "Invalid email or password"
            })))
            .mount(&server)
            .await;

        let client = AuthClient::new(server.uri()).unwrap();
        let resp = client
            .login(&LoginRequest::new("wrong@example.com", "x"))
            .await
            .expect("a 401 with a body is a rejection");

        assert!(!resp.success);
        assert_eq!(resp.message.as_deref(), Some("Invalid email or password"));
    }

    #[tokio::test]
    async fn test_refresh_posts_token() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/refresh-token"))
            .and(body_json(serde_json::json!({"refresh_token": "dummy-refresh-token"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "success": true,
                "access_token": "dummy-new-access-token",
                "refresh_token": "dummy-new-refresh-token"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = AuthClient::new(format!("{}/", server.uri())).unwrap();
        let resp = client
            .refresh_token(&RefreshRequest {
                refresh_token: "dummy-refresh-token".to_string(),
            })
            .await
            .unwrap();

        assert!(resp.success);
        assert_eq!(resp.access_token.as_deref(), Some("dummy-new-access-token"));
    }

    #[tokio::test]
    async fn test_server_error_is_a_fault() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let client = AuthClient::new(server.uri()).unwrap();
        let err = client
            .login(&LoginRequest::new("test@example.com", "password123"))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Unavailable(body) if body == "boom"));
    }

    #[tokio::test]
    async fn test_unparseable_unauthorized_maps_to_unauthorized() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401).set_body_string("go away"))
            .mount(&server)
            .await;

        let client = AuthClient::new(server.uri()).unwrap();
        let err = client
            .refresh_token(&RefreshRequest {
                refresh_token: "r".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Rejected));
    }

    #[tokio::test]
    async fn test_malformed_success_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&server)
            .await;

        let client = AuthClient::new(server.uri()).unwrap();
        let err = client
            .login(&LoginRequest::new("test@example.com", "password123"))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::InvalidResponse(_)));
    }
}
