use chrono::{DateTime, Duration, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QuerySelect, Set, TransactionTrait, sea_query::LockType,
};
use tracing::instrument;

use crate::config::AuthConfig;
use crate::entity::user;
use crate::error::AppError;
use crate::models::auth::{
    LoginRequest, RegisterRequest, normalize_email, validate_login_request, validate_password,
    validate_register_request,
};
use crate::utils::{hash, jwt};

/// A freshly issued bearer token together with the user it identifies.
#[derive(Debug)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub user: user::Model,
}

/// User identities, password hashes and bearer tokens.
pub struct CredentialStore<'a> {
    db: &'a DatabaseConnection,
    auth: &'a AuthConfig,
}

impl<'a> CredentialStore<'a> {
    pub fn new(db: &'a DatabaseConnection, auth: &'a AuthConfig) -> Self {
        Self { db, auth }
    }

    /// Create a user. Fails with `EmailTaken` when the email is already registered.
    #[instrument(skip(self, payload), fields(email = %payload.email))]
    pub async fn register(&self, payload: &RegisterRequest) -> Result<user::Model, AppError> {
        validate_register_request(payload)?;

        let email = normalize_email(&payload.email);
        let name = payload.name.trim().to_string();
        let password_hash = hash_blocking(payload.password.clone()).await?;

        let txn = self.db.begin().await?;

        let taken = user::Entity::find()
            .filter(user::Column::Email.eq(email.as_str()))
            .count(&txn)
            .await?
            > 0;
        if taken {
            return Err(AppError::EmailTaken);
        }

        let new_user = user::ActiveModel {
            email: Set(email),
            name: Set(name),
            password_hash: Set(password_hash),
            created_at: Set(Utc::now()),
            ..Default::default()
        };

        let user = new_user
            .insert(&txn)
            .await
            .map_err(|e| AppError::unique_or_internal(e, || AppError::EmailTaken))?;

        txn.commit().await?;
        tracing::info!(user_id = user.id, "User registered");
        Ok(user)
    }

    /// Check an email/password pair and issue a signed token.
    #[instrument(skip(self, payload), fields(email = %payload.email))]
    pub async fn authenticate(&self, payload: &LoginRequest) -> Result<IssuedToken, AppError> {
        validate_login_request(payload)?;

        let user = user::Entity::find()
            .filter(user::Column::Email.eq(normalize_email(&payload.email)))
            .one(self.db)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        if !verify_blocking(payload.password.clone(), user.password_hash.clone()).await? {
            return Err(AppError::InvalidCredentials);
        }

        let ttl = Duration::hours(self.auth.token_ttl_hours);
        let issued_at = Utc::now();
        let token = jwt::sign_at(
            user.id,
            &user.email,
            &user.name,
            &self.auth.jwt_secret,
            ttl,
            issued_at,
        )
        .map_err(|e| AppError::Internal(format!("JWT sign error: {}", e)))?;

        Ok(IssuedToken {
            token,
            expires_at: issued_at + ttl,
            user,
        })
    }

    /// Decode a bearer token into the user id it was issued for.
    pub fn validate(&self, token: &str) -> Result<i32, AppError> {
        self.validate_at(token, Utc::now())
    }

    pub fn validate_at(&self, token: &str, now: DateTime<Utc>) -> Result<i32, AppError> {
        jwt::verify_at(token, &self.auth.jwt_secret, now)
            .map(|claims| claims.uid)
            .map_err(|e| {
                tracing::debug!("Rejected bearer token: {e}");
                AppError::TokenInvalid
            })
    }

    /// Profile of the actor. A token may outlive its user, hence `NotFound`.
    pub async fn me(&self, actor_id: i32) -> Result<user::Model, AppError> {
        user::Entity::find_by_id(actor_id)
            .one(self.db)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".into()))
    }

    /// Rotate the actor's password after checking the current one.
    #[instrument(skip(self, current, new))]
    pub async fn change_password(
        &self,
        actor_id: i32,
        current: &str,
        new: &str,
    ) -> Result<(), AppError> {
        validate_password(new)?;
        let new_hash = hash_blocking(new.to_owned()).await?;

        let txn = self.db.begin().await?;

        let user = user::Entity::find_by_id(actor_id)
            .lock(LockType::Update)
            .one(&txn)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".into()))?;

        if !verify_blocking(current.to_owned(), user.password_hash.clone()).await? {
            return Err(AppError::InvalidCredentials);
        }

        let mut active: user::ActiveModel = user.into();
        active.password_hash = Set(new_hash);
        active.update(&txn).await?;

        txn.commit().await?;
        tracing::info!(user_id = actor_id, "Password changed");
        Ok(())
    }
}

async fn hash_blocking(password: String) -> Result<String, AppError> {
    tokio::task::spawn_blocking(move || hash::hash_password(&password))
        .await
        .map_err(|e| AppError::Internal(format!("Password hashing task failed: {e}")))?
        .map_err(|e| AppError::Internal(format!("Password hash error: {e}")))
}

async fn verify_blocking(password: String, stored: String) -> Result<bool, AppError> {
    tokio::task::spawn_blocking(move || hash::verify_password(&password, &stored))
        .await
        .map_err(|e| AppError::Internal(format!("Password verify task failed: {e}")))?
        .map_err(|e| AppError::Internal(format!("Password verify error: {e}")))
}
