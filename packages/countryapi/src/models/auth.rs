use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::shared::validate_text;
use crate::error::AppError;

const PASSWORD_LEN: std::ops::RangeInclusive<usize> = 8..=128;

/// Request body for user registration.
#[derive(Deserialize)]
pub struct RegisterRequest {
    /// Unique email address, compared case-insensitively.
    pub email: String,
    /// Display name (1-64 chars).
    pub name: String,
    /// Password (8-128 characters).
    pub password: String,
}

/// Canonical form used for storage and lookup.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub fn validate_email(email: &str) -> Result<(), AppError> {
    let email = email.trim();
    let len = email.chars().count();
    if !(3..=254).contains(&len) {
        return Err(AppError::Validation("Email must be 3-254 characters".into()));
    }
    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.is_empty()
                && !domain.contains('@')
                && !email.chars().any(char::is_whitespace)
        }
        None => false,
    };
    if !valid {
        return Err(AppError::Validation("Email address is malformed".into()));
    }
    Ok(())
}

pub fn validate_password(password: &str) -> Result<(), AppError> {
    if !PASSWORD_LEN.contains(&password.chars().count()) {
        return Err(AppError::Validation(
            "Password must be 8-128 characters".into(),
        ));
    }
    Ok(())
}

pub fn validate_register_request(payload: &RegisterRequest) -> Result<(), AppError> {
    validate_email(&payload.email)?;
    validate_text(&payload.name, "Name", 64)?;
    validate_password(&payload.password)
}

/// Request body for user login.
#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

pub fn validate_login_request(payload: &LoginRequest) -> Result<(), AppError> {
    if payload.email.trim().is_empty() {
        return Err(AppError::Validation("Email must not be empty".into()));
    }
    if payload.password.is_empty() {
        return Err(AppError::Validation("Password must not be empty".into()));
    }
    Ok(())
}

/// Request body for rotating the caller's password.
#[derive(Deserialize)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

/// Successful registration response.
#[derive(Serialize)]
pub struct RegisterResponse {
    pub id: i32,
    pub email: String,
    pub name: String,
}

impl From<crate::entity::user::Model> for RegisterResponse {
    fn from(user: crate::entity::user::Model) -> Self {
        Self {
            id: user.id,
            email: user.email,
            name: user.name,
        }
    }
}

/// Successful login response.
#[derive(Serialize)]
pub struct LoginResponse {
    /// JWT bearer token.
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub user_id: i32,
    pub email: String,
    pub name: String,
}

/// Current authenticated user's profile.
#[derive(Serialize)]
pub struct MeResponse {
    pub id: i32,
    pub email: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl From<crate::entity::user::Model> for MeResponse {
    fn from(user: crate::entity::user::Model) -> Self {
        Self {
            id: user.id,
            email: user.email,
            name: user.name,
            created_at: user.created_at,
        }
    }
}
