use axum::{http::HeaderMap, Json};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::config;
use crate::database::manager::DatabaseManager;
use crate::error::ApiError;
use crate::middleware::response::ApiResponse;
use crate::services::auth_provider::{AuthProvider, ProviderSession};

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// POST /api/admin/auth/login - relay credentials to the auth provider,
/// set the session cookie and return the signed-in user
pub async fn login(
    jar: CookieJar,
    headers: HeaderMap,
    Json(payload): Json<LoginRequest>,
) -> Result<(CookieJar, ApiResponse<Value>), ApiError> {
    let email = payload.email.trim();
    if email.is_empty() || payload.password.is_empty() {
        return Err(ApiError::bad_request("email and password are required"));
    }

    let session = AuthProvider::new()
        .password_login(email, &payload.password)
        .await?;

    let user_agent = headers
        .get("user-agent")
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string());
    record_login_event(&session, email, user_agent).await;

    let cookie = session_cookie(&session);
    tracing::info!(%email, "admin signed in");

    Ok((
        jar.add(cookie),
        ApiResponse::success(json!({ "user": session.user })),
    ))
}

fn session_cookie(session: &ProviderSession) -> Cookie<'static> {
    let security = &config::config().security;
    let max_age = session
        .expires_in
        .unwrap_or(security.session_max_age_secs);

    let mut cookie = Cookie::new(
        security.session_cookie_name.clone(),
        session.access_token.clone(),
    );
    cookie.set_path("/");
    cookie.set_http_only(true);
    cookie.set_same_site(SameSite::Lax);
    cookie.set_secure(security.secure_cookies);
    cookie.set_max_age(time::Duration::seconds(max_age as i64));
    cookie
}

/// Best-effort audit row for the logins report. A write failure must never
/// fail the sign-in itself.
async fn record_login_event(session: &ProviderSession, fallback_email: &str, user_agent: Option<String>) {
    let email = session
        .user
        .email
        .clone()
        .unwrap_or_else(|| fallback_email.to_string());
    let user_id = Uuid::parse_str(&session.user.id).ok();

    let pool = match DatabaseManager::pool().await {
        Ok(pool) => pool,
        Err(e) => {
            tracing::warn!("skipping login event, database unavailable: {}", e);
            return;
        }
    };

    let result = sqlx::query(
        "INSERT INTO login_events (user_id, email, user_agent) VALUES ($1, $2, $3)",
    )
    .bind(user_id)
    .bind(&email)
    .bind(&user_agent)
    .execute(&pool)
    .await;

    if let Err(e) = result {
        tracing::warn!("failed to record login event for {}: {}", email, e);
    }
}
