//! User DTOs - credentials and public identity

use crate::entities::{Role, User};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use validator::Validate;

lazy_static! {
    static ref USERNAME_REGEX: Regex = Regex::new(r"^[A-Za-z0-9_.]{3,32}$").unwrap();
}

// struct per gestire io col client: password never leaves the server
#[derive(Serialize, Deserialize, Debug)]
pub struct UserDTO {
    pub id: Option<i64>,
    pub username: Option<String>,
    #[serde(skip_serializing)]
    pub password: Option<String>,
}

impl From<User> for UserDTO {
    fn from(value: User) -> Self {
        Self {
            id: Some(value.user_id),
            username: Some(value.username),
            password: None,
        }
    }
}

/// Registration form
#[derive(Serialize, Deserialize, Debug, Clone, Validate)]
pub struct RegisterDTO {
    #[validate(regex(
        path = *USERNAME_REGEX,
        message = "Username must be 3-32 letters, digits, dots or underscores"
    ))]
    pub username: String,

    #[validate(length(min = 8, max = 128, message = "Password must be between 8 and 128 characters"))]
    pub password: String,

    #[validate(length(min = 2, max = 80, message = "Name must be between 2 and 80 characters"))]
    pub full_name: String,
}

/// Insert payload for the users table, password already hashed
#[derive(Debug, Clone)]
pub struct CreateUserDTO {
    pub username: String,
    pub password: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct LoginDTO {
    pub username: String,
    pub password: String,
}

/// Returned by login/register together with the session token
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct SessionDTO {
    pub token: String,
    pub user_id: i64,
    pub username: String,
    pub role: Role,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(username: &str, password: &str) -> RegisterDTO {
        RegisterDTO {
            username: username.to_string(),
            password: password.to_string(),
            full_name: "Ana Ruiz".to_string(),
        }
    }

    #[test]
    fn register_form_bounds() {
        assert!(form("ana_ruiz", "correcthorse").validate().is_ok());
        assert!(form("a", "correcthorse").validate().is_err());
        assert!(form("ana ruiz", "correcthorse").validate().is_err());
        assert!(form("ana_ruiz", "short").validate().is_err());
    }
}
