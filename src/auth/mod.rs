use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config;

/// Audience GoTrue stamps into every end-user access token
const SESSION_AUDIENCE: &str = "authenticated";

/// Claims carried by the Supabase access token stored in the session cookie
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    pub sub: String,
    pub email: Option<String>,
    pub role: Option<String>,
    pub exp: i64,
}

#[derive(Debug, Error)]
pub enum SessionTokenError {
    #[error("session token secret not configured")]
    MissingSecret,

    #[error("invalid session token: {0}")]
    Invalid(String),
}

/// Verify a session token locally against the provider's signing secret.
/// Expiry and audience are enforced; anything that fails verification is
/// treated as no session at all.
pub fn verify_session_token(token: &str) -> Result<SessionClaims, SessionTokenError> {
    let secret = &config::config().supabase.jwt_secret;
    if secret.is_empty() {
        return Err(SessionTokenError::MissingSecret);
    }

    let decoding_key = DecodingKey::from_secret(secret.as_bytes());
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_audience(&[SESSION_AUDIENCE]);

    let token_data = decode::<SessionClaims>(token, &decoding_key, &validation)
        .map_err(|e| SessionTokenError::Invalid(e.to_string()))?;

    Ok(token_data.claims)
}
