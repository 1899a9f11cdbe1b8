use axum_extra::extract::cookie::CookieJar;
use serde_json::{json, Value};

use crate::auth::{verify_session_token, SessionTokenError};
use crate::config;
use crate::error::ApiError;
use crate::middleware::response::ApiResponse;

/// GET /api/admin/auth/me - the session-check collaborator.
///
/// Verifies the access token held in the session cookie and returns the
/// claims. Every failure mode is a 401: the gate treats any non-2xx from
/// here as "unauthenticated", so this endpoint must never surface a 500
/// for a bad or unverifiable token.
pub async fn me(jar: CookieJar) -> Result<ApiResponse<Value>, ApiError> {
    let cookie_name = &config::config().security.session_cookie_name;

    let token = jar
        .get(cookie_name)
        .map(|c| c.value().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ApiError::unauthorized("No active session"))?;

    let claims = verify_session_token(&token).map_err(|e| match e {
        SessionTokenError::MissingSecret => {
            tracing::warn!("session verification skipped: SUPABASE_JWT_SECRET not set");
            ApiError::unauthorized("Session verification unavailable")
        }
        SessionTokenError::Invalid(msg) => {
            tracing::debug!("session token rejected: {}", msg);
            ApiError::unauthorized("Session expired or invalid")
        }
    })?;

    Ok(ApiResponse::success(json!({
        "id": claims.sub,
        "email": claims.email,
        "role": claims.role,
    })))
}
