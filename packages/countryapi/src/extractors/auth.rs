use axum::{extract::FromRequestParts, http::request::Parts};

use crate::error::AppError;
use crate::services::CredentialStore;
use crate::state::AppState;

/// Authenticated actor extracted from the `Authorization: Bearer <token>` header.
///
/// Add this as a handler parameter to require authentication. The decoded
/// identity is passed explicitly into every service call that needs an actor.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser {
    pub user_id: i32,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("Authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or(AppError::TokenMissing)?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or(AppError::TokenInvalid)?;

        let user_id = CredentialStore::new(&state.db, &state.config.auth).validate(token)?;

        Ok(AuthUser { user_id })
    }
}
