use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde_json::{json, Value};

use crate::config;
use crate::middleware::response::ApiResponse;

/// POST /api/admin/auth/logout - clear the session cookie. Always succeeds,
/// even when no session was present.
pub async fn logout(jar: CookieJar) -> (CookieJar, ApiResponse<Value>) {
    let security = &config::config().security;

    let mut cookie = Cookie::new(security.session_cookie_name.clone(), "");
    cookie.set_path("/");
    cookie.set_http_only(true);
    cookie.set_same_site(SameSite::Lax);
    cookie.set_secure(security.secure_cookies);
    cookie.set_max_age(time::Duration::seconds(0));

    (jar.add(cookie), ApiResponse::success(json!({ "signed_out": true })))
}
