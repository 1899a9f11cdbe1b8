// In-process router tests: the session-check collaborator is replaced by a
// local stub so both gate outcomes (pass-through, redirect) are observable
// without a real auth provider.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    routing::get,
    Router,
};
use tower::ServiceExt;

use market_admin_api::middleware::gate::{AccessGate, SESSION_CHECK_PATH};
use market_admin_api::routes;

/// Serve a stub collaborator that always answers with the given status,
/// returning the URL the gate should call.
async fn spawn_stub(status: StatusCode) -> String {
    let app = Router::new().route(SESSION_CHECK_PATH, get(move || async move { status }));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind stub listener");
    let addr = listener.local_addr().expect("stub addr");

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("stub server");
    });

    format!("http://{}{}", addr, SESSION_CHECK_PATH)
}

fn page_request(path: &str) -> Request<Body> {
    Request::builder()
        .uri(path)
        .body(Body::empty())
        .expect("request")
}

#[tokio::test]
async fn page_passes_through_when_session_is_valid() {
    let stub = spawn_stub(StatusCode::OK).await;
    let app = routes::app(AccessGate::new(stub));

    let response = app.oneshot(page_request("/bookings")).await.expect("response");

    assert_eq!(response.status(), StatusCode::OK);

    // The pass also minted a CSRF cookie for the cookieless request
    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .expect("csrf cookie minted");
    assert!(set_cookie.starts_with("csrf_token="));

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    let html = String::from_utf8_lossy(&body);
    assert!(html.contains("Bookings"));
}

#[tokio::test]
async fn page_redirects_when_session_is_rejected() {
    let stub = spawn_stub(StatusCode::UNAUTHORIZED).await;
    let app = routes::app(AccessGate::new(stub));

    let response = app.oneshot(page_request("/bookings")).await.expect("response");

    assert!(response.status().is_redirection());
    assert_eq!(
        response
            .headers()
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok()),
        Some("/login?error=unauthorized")
    );
}

#[tokio::test]
async fn collaborator_errors_fail_closed() {
    let stub = spawn_stub(StatusCode::INTERNAL_SERVER_ERROR).await;
    let app = routes::app(AccessGate::new(stub));

    let response = app.oneshot(page_request("/")).await.expect("response");
    assert!(response.status().is_redirection());
}

#[tokio::test]
async fn unreachable_collaborator_fails_closed() {
    // Nothing listens on port 9; the transport error must read as "no session"
    let app = routes::app(AccessGate::new(format!(
        "http://127.0.0.1:9{}",
        SESSION_CHECK_PATH
    )));

    let response = app.oneshot(page_request("/analytics")).await.expect("response");

    assert!(response.status().is_redirection());
    assert_eq!(
        response
            .headers()
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok()),
        Some("/login?error=unauthorized")
    );
}

#[tokio::test]
async fn api_reads_never_consult_the_collaborator() {
    // With an unreachable collaborator, a consult would redirect; reads must not
    let app = routes::app(AccessGate::new(format!(
        "http://127.0.0.1:9{}",
        SESSION_CHECK_PATH
    )));

    let response = app
        .oneshot(page_request("/api/admin/categories"))
        .await
        .expect("response");

    assert!(!response.status().is_redirection());
    assert_ne!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn login_page_skips_the_session_check() {
    let app = routes::app(AccessGate::new(format!(
        "http://127.0.0.1:9{}",
        SESSION_CHECK_PATH
    )));

    let response = app.oneshot(page_request("/login")).await.expect("response");
    assert_eq!(response.status(), StatusCode::OK);
}
