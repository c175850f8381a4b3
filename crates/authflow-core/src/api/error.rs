use thiserror::Error;

/// Failures talking to the auth service. A well-formed rejection (a body with
/// `success: false`) is not an error; these cover everything else.
#[derive(Error, Debug)]
pub enum ApiError {
    /// 401 whose body could not be read as a login or refresh response
    #[error("Auth service rejected the request")]
    Rejected,

    #[error("Auth service unavailable: {0}")]
    Unavailable(String),

    #[error("Could not reach auth service: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Unexpected response from auth service: {0}")]
    InvalidResponse(String),
}

/// Longest response body carried into an error message
const MAX_ERROR_BODY_LENGTH: usize = 500;

impl ApiError {
    fn truncate_body(body: &str) -> String {
        if body.len() <= MAX_ERROR_BODY_LENGTH {
            return body.to_string();
        }
        let mut end = MAX_ERROR_BODY_LENGTH;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}... ({} bytes)", &body[..end], body.len())
    }

    /// Classify a non-success status from `/login` or `/refresh-token`
    pub fn from_status(status: reqwest::StatusCode, body: &str) -> Self {
        let body = Self::truncate_body(body);
        if status == reqwest::StatusCode::UNAUTHORIZED {
            ApiError::Rejected
        } else if status.is_server_error() {
            ApiError::Unavailable(body)
        } else {
            ApiError::InvalidResponse(format!("status {}: {}", status, body))
        }
    }
}
