use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

/// The user record returned on login and persisted under the `user` key.
///
/// Timestamps are kept as the ISO-8601 strings the auth service sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub age: u32,
    pub gender: Gender,
    pub created_at: String,
    pub updated_at: String,
}

impl User {
    pub fn full_name(&self) -> String {
        match (self.first_name.is_empty(), self.last_name.is_empty()) {
            (false, false) => format!("{} {}", self.first_name, self.last_name),
            (false, true) => self.first_name.clone(),
            (true, false) => self.last_name.clone(),
            (true, true) => self.email.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(first: &str, last: &str) -> User {
        User {
            id: "1".to_string(),
            email: "test@example.com".to_string(),
            first_name: first.to_string(),
            last_name: last.to_string(),
            age: 30,
            gender: Gender::Male,
            created_at: "2026-01-01T00:00:00.000Z".to_string(),
            updated_at: "2026-01-01T00:00:00.000Z".to_string(),
        }
    }

    #[test]
    fn test_full_name() {
        assert_eq!(user("John", "Doe").full_name(), "John Doe");
        assert_eq!(user("John", "").full_name(), "John");
        assert_eq!(user("", "").full_name(), "test@example.com");
    }

    #[test]
    fn test_parse_user_json() {
        let json = r#"{"id":"1","email":"test@example.com","first_name":"John","last_name":"Doe","age":30,"gender":"male","created_at":"2026-01-01T00:00:00.000Z","updated_at":"2026-01-01T00:00:00.000Z"}"#;
        let parsed: User = serde_json::from_str(json).expect("Failed to parse user test JSON");
        assert_eq!(parsed, user("John", "Doe"));
    }

    #[test]
    fn test_unknown_gender_rejected() {
        let json = r#"{"id":"1","email":"a@b.c","first_name":"","last_name":"","age":1,"gender":"other","created_at":"","updated_at":""}"#;
        assert!(serde_json::from_str::<User>(json).is_err());
    }
}
