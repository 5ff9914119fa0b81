use serde::{Deserialize, Serialize};

use crate::error::ApiError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
}

/// Body for `POST /register/`; the endpoint expects camelCase name fields
#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    #[serde(rename = "firstName")]
    pub first_name: String,
    #[serde(rename = "lastName")]
    pub last_name: String,
}

impl RegisterRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.username.trim().is_empty() || self.email.trim().is_empty() || self.password.is_empty() {
            return Err(ApiError::Validation(
                "Username, email, and password are required".to_string(),
            ));
        }
        if !self.email.contains('@') {
            return Err(ApiError::Validation(format!(
                "Invalid email address: {}",
                self.email
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RegisterResponse {
    #[serde(default)]
    pub message: String,
    pub user: User,
}
