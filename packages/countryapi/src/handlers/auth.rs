use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use tracing::instrument;

use crate::error::AppError;
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::models::auth::{
    ChangePasswordRequest, LoginRequest, LoginResponse, MeResponse, RegisterRequest,
    RegisterResponse,
};
use crate::services::CredentialStore;
use crate::state::AppState;

/// Handle user registration.
#[instrument(skip(state, payload), fields(email = %payload.email))]
pub async fn register(
    State(state): State<AppState>,
    AppJson(payload): AppJson<RegisterRequest>,
) -> Result<impl IntoResponse, AppError> {
    let user = CredentialStore::new(&state.db, &state.config.auth)
        .register(&payload)
        .await?;

    Ok((StatusCode::CREATED, Json(RegisterResponse::from(user))))
}

/// Handle user login.
#[instrument(skip(state, payload), fields(email = %payload.email))]
pub async fn login(
    State(state): State<AppState>,
    AppJson(payload): AppJson<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let issued = CredentialStore::new(&state.db, &state.config.auth)
        .authenticate(&payload)
        .await?;

    Ok(Json(LoginResponse {
        token: issued.token,
        expires_at: issued.expires_at,
        user_id: issued.user.id,
        email: issued.user.email,
        name: issued.user.name,
    }))
}

/// Return the current authenticated user's profile.
#[instrument(skip(state, auth_user), fields(user_id = auth_user.user_id))]
pub async fn me(
    auth_user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<MeResponse>, AppError> {
    let user = CredentialStore::new(&state.db, &state.config.auth)
        .me(auth_user.user_id)
        .await?;

    Ok(Json(user.into()))
}

/// Rotate the caller's password.
#[instrument(skip(state, auth_user, payload), fields(user_id = auth_user.user_id))]
pub async fn change_password(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<ChangePasswordRequest>,
) -> Result<StatusCode, AppError> {
    CredentialStore::new(&state.db, &state.config.auth)
        .change_password(
            auth_user.user_id,
            &payload.current_password,
            &payload.new_password,
        )
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
