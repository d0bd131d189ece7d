use anyhow::{Result, bail};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

/// JWT Claims structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,  // Email
    pub uid: i32,     // User ID
    pub name: String, // Display name
    pub iat: i64,     // Issued-at timestamp
    pub exp: i64,     // Expiration timestamp
}

/// Sign a token for a user, issued at `now` and valid for `ttl`.
pub fn sign_at(
    user_id: i32,
    email: &str,
    name: &str,
    secret: &str,
    ttl: Duration,
    now: DateTime<Utc>,
) -> Result<String> {
    let Some(expiration) = now.checked_add_signed(ttl) else {
        bail!("token lifetime overflows the timestamp range");
    };

    let claims = Claims {
        sub: email.to_owned(),
        uid: user_id,
        name: name.to_owned(),
        iat: now.timestamp(),
        exp: expiration.timestamp(),
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;

    Ok(token)
}

/// Verify and decode a JWT token, treating `now` as the current time.
///
/// Expiry is checked here rather than by `jsonwebtoken` so the result depends
/// only on the arguments.
pub fn verify_at(token: &str, secret: &str, now: DateTime<Utc>) -> Result<Claims> {
    let mut validation = Validation::default();
    validation.validate_exp = false;

    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )?;

    if token_data.claims.exp <= now.timestamp() {
        bail!("token expired");
    }

    Ok(token_data.claims)
}
