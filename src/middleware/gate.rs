use axum::{
    extract::{Request, State},
    http::{header, HeaderValue, Method, StatusCode},
    middleware::Next,
    response::{IntoResponse, Json, Redirect, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde_json::json;
use std::sync::Arc;

use crate::config;

/// Client-readable cookie echoed back in the request header (double-submit)
pub const CSRF_COOKIE: &str = "csrf_token";
pub const CSRF_HEADER: &str = "x-csrf-token";
const CSRF_MAX_AGE_SECS: i64 = 86_400;

/// Session-check collaborator, relative to this server
pub const SESSION_CHECK_PATH: &str = "/api/admin/auth/me";

const LOGIN_PAGE: &str = "/login";
const LOGIN_REDIRECT: &str = "/login?error=unauthorized";

const API_PREFIX: &str = "/api";
const ADMIN_API_PREFIX: &str = "/api/admin";

/// Unauthenticated surface: framework/static assets plus operational probes
const PUBLIC_PREFIXES: &[&str] = &["/_next", "/static", "/favicon", "/images", "/assets"];
const PUBLIC_EXACT: &[&str] = &["/health"];

/// Token-acquisition endpoints under the admin-auth namespace
const AUTH_BOOTSTRAP: &[&str] = &["/api/admin/auth/login", "/api/admin/auth/logout"];

/// Per-request filter state: where to reach the session-check collaborator
/// and which cookie attributes to mint with.
#[derive(Clone)]
pub struct AccessGate {
    session_check_url: String,
    secure_cookies: bool,
    http: reqwest::Client,
}

impl AccessGate {
    pub fn new(session_check_url: impl Into<String>) -> Self {
        Self {
            session_check_url: session_check_url.into(),
            secure_cookies: config::config().security.secure_cookies,
            http: reqwest::Client::new(),
        }
    }

    /// Ask the session-check collaborator whether the request's cookies hold
    /// a live session. Any transport failure counts as unauthenticated.
    async fn session_is_valid(&self, cookie_header: Option<&str>) -> bool {
        let mut probe = self
            .http
            .get(&self.session_check_url)
            .header(header::CACHE_CONTROL, "no-store");
        if let Some(cookies) = cookie_header {
            probe = probe.header(header::COOKIE, cookies);
        }

        match probe.send().await {
            Ok(resp) => resp.status().is_success(),
            Err(err) => {
                tracing::debug!("session check unreachable: {}", err);
                false
            }
        }
    }
}

/// Every inbound path falls into exactly one class, decided fresh per request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteClass {
    PublicStatic,
    PublicAuthBootstrap,
    ProtectedApiMutation,
    ProtectedApiRead,
    ProtectedPage,
}

/// Pure classification of (path, method). Side-effecting checks happen later.
pub fn classify(path: &str, method: &Method) -> RouteClass {
    if PUBLIC_EXACT.contains(&path) || PUBLIC_PREFIXES.iter().any(|p| path.starts_with(p)) {
        return RouteClass::PublicStatic;
    }
    if path == LOGIN_PAGE || AUTH_BOOTSTRAP.contains(&path) {
        return RouteClass::PublicAuthBootstrap;
    }
    if path.starts_with(API_PREFIX) {
        if is_mutating(method) && is_admin_api(path) {
            return RouteClass::ProtectedApiMutation;
        }
        return RouteClass::ProtectedApiRead;
    }
    RouteClass::ProtectedPage
}

fn is_mutating(method: &Method) -> bool {
    !matches!(*method, Method::GET | Method::HEAD | Method::OPTIONS)
}

fn is_admin_api(path: &str) -> bool {
    path == ADMIN_API_PREFIX || path.starts_with("/api/admin/")
}

/// Access gate applied in front of every route.
///
/// One pass per request: ensure a CSRF cookie exists, enforce the
/// double-submit check on mutating admin-API calls, and enforce session
/// validity on page navigations. API reads under the admin namespace are
/// deliberately left to downstream authorization.
pub async fn access_gate(
    State(gate): State<Arc<AccessGate>>,
    request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_string();
    let method = request.method().clone();

    let jar = CookieJar::from_headers(request.headers());
    let csrf_cookie = jar.get(CSRF_COOKIE).map(|c| c.value().to_string());

    // Token ensure: stage a fresh cookie for requests arriving without one.
    // The staged Set-Cookie rides along on every allowed outcome of this
    // same pass; rejections and redirects go out bare.
    let minted = if csrf_cookie.is_none() {
        Some(build_csrf_cookie(mint_csrf_token(), gate.secure_cookies))
    } else {
        None
    };

    match classify(&path, &method) {
        RouteClass::PublicStatic | RouteClass::PublicAuthBootstrap | RouteClass::ProtectedApiRead => {
            deliver(next.run(request).await, minted)
        }
        RouteClass::ProtectedApiMutation => {
            let header_token = request
                .headers()
                .get(CSRF_HEADER)
                .and_then(|v| v.to_str().ok())
                .map(|s| s.to_string());

            if !csrf_matches(csrf_cookie.as_deref(), header_token.as_deref()) {
                tracing::warn!(%method, %path, "CSRF check failed on admin mutation");
                return csrf_rejection();
            }
            deliver(next.run(request).await, minted)
        }
        RouteClass::ProtectedPage => {
            let cookie_header = request
                .headers()
                .get(header::COOKIE)
                .and_then(|v| v.to_str().ok())
                .map(|s| s.to_string());

            if gate.session_is_valid(cookie_header.as_deref()).await {
                deliver(next.run(request).await, minted)
            } else {
                tracing::debug!(%path, "no valid session, redirecting to login");
                Redirect::temporary(LOGIN_REDIRECT).into_response()
            }
        }
    }
}

/// 16 random bytes as 32 lowercase hex chars
fn mint_csrf_token() -> String {
    let bytes: [u8; 16] = rand::random();
    hex::encode(bytes)
}

fn build_csrf_cookie(token: String, secure: bool) -> Cookie<'static> {
    // Readable by client script so it can be echoed in the request header
    let mut cookie = Cookie::new(CSRF_COOKIE, token);
    cookie.set_path("/");
    cookie.set_http_only(false);
    cookie.set_same_site(SameSite::Lax);
    cookie.set_secure(secure);
    cookie.set_max_age(time::Duration::seconds(CSRF_MAX_AGE_SECS));
    cookie
}

/// Both values present and byte-equal. An empty cookie counts as absent.
fn csrf_matches(cookie: Option<&str>, header: Option<&str>) -> bool {
    match (cookie, header) {
        (Some(c), Some(h)) => !c.is_empty() && c == h,
        _ => false,
    }
}

fn csrf_rejection() -> Response {
    (StatusCode::FORBIDDEN, Json(json!({ "error": "csrf_failed" }))).into_response()
}

fn deliver(mut response: Response, minted: Option<Cookie<'static>>) -> Response {
    if let Some(cookie) = minted {
        if let Ok(value) = HeaderValue::from_str(&cookie.to_string()) {
            response.headers_mut().append(header::SET_COOKIE, value);
        }
    }
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_static_and_operational_paths() {
        assert_eq!(classify("/_next/static/chunk.js", &Method::GET), RouteClass::PublicStatic);
        assert_eq!(classify("/favicon.ico", &Method::GET), RouteClass::PublicStatic);
        assert_eq!(classify("/assets/logo.png", &Method::GET), RouteClass::PublicStatic);
        assert_eq!(classify("/health", &Method::GET), RouteClass::PublicStatic);
    }

    #[test]
    fn classifies_auth_bootstrap() {
        assert_eq!(classify("/login", &Method::GET), RouteClass::PublicAuthBootstrap);
        assert_eq!(classify("/api/admin/auth/login", &Method::POST), RouteClass::PublicAuthBootstrap);
        assert_eq!(classify("/api/admin/auth/logout", &Method::POST), RouteClass::PublicAuthBootstrap);
    }

    #[test]
    fn classifies_admin_api_by_method() {
        assert_eq!(classify("/api/admin/bookings", &Method::GET), RouteClass::ProtectedApiRead);
        assert_eq!(classify("/api/admin/bookings", &Method::HEAD), RouteClass::ProtectedApiRead);
        assert_eq!(classify("/api/admin/bookings", &Method::OPTIONS), RouteClass::ProtectedApiRead);
        assert_eq!(classify("/api/admin/bookings/42", &Method::PATCH), RouteClass::ProtectedApiMutation);
        assert_eq!(classify("/api/admin/categories/sync", &Method::POST), RouteClass::ProtectedApiMutation);
        // the session-check endpoint itself is an ordinary API read
        assert_eq!(classify(SESSION_CHECK_PATH, &Method::GET), RouteClass::ProtectedApiRead);
    }

    #[test]
    fn mutations_outside_admin_namespace_are_not_csrf_gated() {
        assert_eq!(classify("/api/webhooks/stripe", &Method::POST), RouteClass::ProtectedApiRead);
        // prefix match is segment-aware
        assert_eq!(classify("/api/administrivia", &Method::POST), RouteClass::ProtectedApiRead);
    }

    #[test]
    fn classifies_pages() {
        assert_eq!(classify("/", &Method::GET), RouteClass::ProtectedPage);
        assert_eq!(classify("/bookings", &Method::GET), RouteClass::ProtectedPage);
        assert_eq!(classify("/analytics", &Method::GET), RouteClass::ProtectedPage);
    }

    #[test]
    fn minted_token_is_32_lowercase_hex_chars() {
        let token = mint_csrf_token();
        assert_eq!(token.len(), 32);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
        assert_ne!(token, mint_csrf_token());
    }

    #[test]
    fn csrf_match_requires_both_values_equal() {
        assert!(csrf_matches(Some("abc123"), Some("abc123")));
        assert!(!csrf_matches(Some("abc123"), Some("abc124")));
        assert!(!csrf_matches(Some("abc123"), None));
        assert!(!csrf_matches(None, Some("abc123")));
        assert!(!csrf_matches(None, None));
        assert!(!csrf_matches(Some(""), Some("")));
    }

    #[test]
    fn csrf_cookie_attributes() {
        let cookie = build_csrf_cookie("aabbccdd".into(), false);
        let rendered = cookie.to_string();
        assert!(rendered.starts_with("csrf_token=aabbccdd"));
        assert!(rendered.contains("SameSite=Lax"));
        assert!(rendered.contains("Path=/"));
        assert!(rendered.contains("Max-Age=86400"));
        assert!(!rendered.contains("HttpOnly"));
        assert!(!rendered.contains("Secure"));

        let secured = build_csrf_cookie("aabbccdd".into(), true).to_string();
        assert!(secured.contains("Secure"));
    }
}
