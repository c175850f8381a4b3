//! Data models shared by the client, the session store, and the reference service.
//!
//! - `User`: the authenticated user record
//! - `LoginRequest`, `LoginResponse`, `RefreshRequest`, `RefreshResponse`: auth wire types
//! - `LoginForm`: credential input collected by a front end

pub mod auth;
pub mod form;
pub mod user;

pub use auth::{LoginRequest, LoginResponse, RefreshRequest, RefreshResponse};
pub use form::{FormError, LoginForm};
pub use user::{Gender, User};
