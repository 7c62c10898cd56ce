//! Authentication Models
//! Mission: Define user credentials, token claims and the login/registration payloads

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::validation::{FieldErrors, Validate};

/// Stored user account; the credential the authenticator checks against.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String, // bcrypt hash - never serialize
    pub email: Option<String>,
    pub git_addr: Option<String>,
    pub enabled: bool,
    pub created_at: String,
}

/// A user whose password has just been checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedUser {
    pub id: Uuid,
    pub username: String,
}

impl VerifiedUser {
    pub fn from_user(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
        }
    }
}

/// Verified caller bound to the current request by the authorization filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedIdentity {
    pub username: String,
}

/// JWT Claims payload
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    pub sub: String, // username
    pub iat: usize,
    pub exp: usize,
}

/// Login request body
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

impl Validate for LoginRequest {
    fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        errors.require("username", &self.username);
        errors.require("password", &self.password);
        errors.into_result()
    }
}

/// Login response
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    pub token: String,
    pub expires_in: i64, // seconds until expiration
}

/// Registration request body
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    pub email: Option<String>,
    pub git_addr: Option<String>,
}

pub const USERNAME_MIN_LEN: usize = 3;
pub const USERNAME_MAX_LEN: usize = 50;
pub const PASSWORD_MIN_LEN: usize = 8;

/// Usernames end up as token claims and in URLs, so keep them to identifier characters.
pub fn is_valid_username(username: &str) -> bool {
    (USERNAME_MIN_LEN..=USERNAME_MAX_LEN).contains(&username.chars().count())
        && username
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
}

impl Validate for RegisterRequest {
    fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();

        if errors.require("username", &self.username) && !is_valid_username(&self.username) {
            errors.add(
                "username",
                format!(
                    "username must be {}-{} characters of letters, digits, '_', '-' or '.'",
                    USERNAME_MIN_LEN, USERNAME_MAX_LEN
                ),
            );
        }

        if errors.require("password", &self.password)
            && self.password.chars().count() < PASSWORD_MIN_LEN
        {
            errors.add(
                "password",
                format!("password must be at least {} characters", PASSWORD_MIN_LEN),
            );
        }

        if let Some(email) = self.email.as_deref().filter(|e| !e.trim().is_empty()) {
            if !email.contains('@') {
                errors.add("email", "email must be a valid address");
            }
        }

        errors.into_result()
    }
}

/// User response (sanitized)
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: String,
    pub username: String,
    pub email: Option<String>,
    pub git_addr: Option<String>,
    pub created_at: String,
}

impl UserResponse {
    pub fn from_user(user: &User) -> Self {
        Self {
            id: user.id.to_string(),
            username: user.username.clone(),
            email: user.email.clone(),
            git_addr: user.git_addr.clone(),
            created_at: user.created_at.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn register(username: &str, password: &str, email: Option<&str>) -> RegisterRequest {
        RegisterRequest {
            username: username.to_string(),
            password: password.to_string(),
            email: email.map(str::to_string),
            git_addr: None,
        }
    }

    #[test]
    fn test_user_serialization_hides_password_hash() {
        let user = User {
            id: Uuid::new_v4(),
            username: "alice".to_string(),
            password_hash: "$2b$04$secret".to_string(),
            email: None,
            git_addr: None,
            enabled: true,
            created_at: "2024-01-01T00:00:00Z".to_string(),
        };

        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("password_hash"));
        assert!(!json.contains("$2b$04$secret"));
    }

    #[test]
    fn test_username_rules() {
        assert!(is_valid_username("alice"));
        assert!(is_valid_username("testID1"));
        assert!(is_valid_username("a.b-c_d"));
        assert!(!is_valid_username("al"));
        assert!(!is_valid_username("alice smith"));
        assert!(!is_valid_username("alice@home"));
        assert!(!is_valid_username(&"x".repeat(51)));
    }

    #[test]
    fn test_register_validation() {
        assert!(register("testID1", "testPassword", Some("test@gmail.com"))
            .validate()
            .is_ok());

        let errors = register("", "short", Some("not-an-email"))
            .validate()
            .unwrap_err();
        let fields: Vec<&str> = errors.iter().map(|e| e.field).collect();
        assert_eq!(fields, vec!["username", "password", "email"]);
    }

    #[test]
    fn test_login_validation_requires_both_fields() {
        let errors = LoginRequest {
            username: "alice".to_string(),
            password: " ".to_string(),
        }
        .validate()
        .unwrap_err();
        assert_eq!(errors.first_message(), Some("password is required"));
    }

    #[test]
    fn test_register_request_uses_camel_case() {
        let req: RegisterRequest = serde_json::from_str(
            r#"{"username":"testID1","password":"testPassword","gitAddr":"https://github.com/testId"}"#,
        )
        .unwrap();
        assert_eq!(req.git_addr.as_deref(), Some("https://github.com/testId"));
        assert!(req.email.is_none());
    }

    #[test]
    fn test_token_response_uses_camel_case() {
        let json = serde_json::to_value(TokenResponse {
            token: "abc".to_string(),
            expires_in: 18_000,
        })
        .unwrap();
        assert_eq!(json["expiresIn"], 18_000);
        assert!(json.get("expires_in").is_none());
    }
}
