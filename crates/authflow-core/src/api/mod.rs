//! Auth service collaborators.
//!
//! The session controller talks to an `AuthService`, which has two operations:
//! `login` and `refresh_token`. Two implementations ship here:
//! - `AuthClient`: JSON over HTTP (`POST /login`, `POST /refresh-token`)
//! - `ReferenceAuthService`: the in-process dummy backend with one hard-coded user

pub mod client;
pub mod error;
pub mod reference;

use async_trait::async_trait;

use crate::models::{LoginRequest, LoginResponse, RefreshRequest, RefreshResponse};

pub use client::AuthClient;
pub use error::ApiError;
pub use reference::ReferenceAuthService;

/// External service that checks credentials and issues tokens.
///
/// A rejected credential is a normal response with `success == false`, not an
/// `Err`. Errors are reserved for transport and protocol faults.
#[async_trait]
pub trait AuthService: Send + Sync {
    async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, ApiError>;

    async fn refresh_token(&self, request: &RefreshRequest) -> Result<RefreshResponse, ApiError>;
}
