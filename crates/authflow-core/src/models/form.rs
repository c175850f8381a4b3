use thiserror::Error;

use super::LoginRequest;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum FormError {
    #[error("Email is required")]
    MissingEmail,

    #[error("Email address is not valid: {0}")]
    InvalidEmail(String),

    #[error("Password is required")]
    MissingPassword,
}

/// Raw credential input as typed by the user, before it becomes a `LoginRequest`.
#[derive(Debug, Clone, Default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl LoginForm {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    /// Check the fields a login form marks as required.
    /// Whitespace around the email is trimmed; the password is passed through as-is.
    pub fn validate(self) -> Result<LoginRequest, FormError> {
        let email = self.email.trim();
        if email.is_empty() {
            return Err(FormError::MissingEmail);
        }
        if !looks_like_email(email) {
            return Err(FormError::InvalidEmail(email.to_string()));
        }
        if self.password.is_empty() {
            return Err(FormError::MissingPassword);
        }
        Ok(LoginRequest::new(email, self.password))
    }
}

fn looks_like_email(s: &str) -> bool {
    match s.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && !domain.is_empty() && !domain.contains('@') && !s.contains(char::is_whitespace)
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_trims_email() {
        let req = LoginForm::new("  test@example.com ", "password123")
            .validate()
            .expect("form should be valid");
        assert_eq!(req.email, "test@example.com");
        assert_eq!(req.password, "password123");
    }

    #[test]
    fn test_validate_rejects_bad_input() {
        assert_eq!(LoginForm::new("", "x").validate(), Err(FormError::MissingEmail));
        assert_eq!(
            LoginForm::new("not-an-email", "x").validate(),
            Err(FormError::InvalidEmail("not-an-email".to_string()))
        );
        assert_eq!(
            LoginForm::new("a@@b", "x").validate(),
            Err(FormError::InvalidEmail("a@@b".to_string()))
        );
        assert_eq!(
            LoginForm::new("test@example.com", "").validate(),
            Err(FormError::MissingPassword)
        );
    }
}
