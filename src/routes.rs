use axum::{
    routing::{get, post},
    Router,
};
use serde_json::json;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::handlers::{admin, auth, pages};
use crate::middleware::gate::{access_gate, AccessGate};

/// Assemble the full router with the access gate in front of every route
pub fn app(gate: AccessGate) -> Router {
    Router::new()
        .route("/health", get(health))
        .merge(page_routes())
        .merge(auth_routes())
        .merge(admin_api_routes())
        // Gate first, then observability around everything
        .layer(axum::middleware::from_fn_with_state(Arc::new(gate), access_gate))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

fn page_routes() -> Router {
    Router::new()
        .route("/", get(pages::dashboard))
        .route("/login", get(pages::login))
        .route("/bookings", get(pages::bookings))
        .route("/analytics", get(pages::analytics))
        .route("/categories", get(pages::categories))
        .route("/users", get(pages::users))
}

fn auth_routes() -> Router {
    Router::new()
        .route("/api/admin/auth/login", post(auth::login))
        .route("/api/admin/auth/logout", post(auth::logout))
        .route("/api/admin/auth/me", get(auth::me))
}

fn admin_api_routes() -> Router {
    Router::new()
        .route("/api/admin/bookings", get(admin::bookings::list))
        .route(
            "/api/admin/bookings/:id",
            get(admin::bookings::get).patch(admin::bookings::patch),
        )
        .route("/api/admin/categories", get(admin::categories::list))
        .route("/api/admin/categories/sync", post(admin::categories::sync))
        .route("/api/admin/users", get(admin::users::list))
        .route("/api/admin/analytics", get(admin::analytics::summary))
        .route("/api/admin/logins", get(admin::logins::list))
}

async fn health() -> impl axum::response::IntoResponse {
    use axum::{http::StatusCode, response::Json};

    let checked_at = chrono::Utc::now();
    match crate::database::manager::DatabaseManager::health_check().await {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "data": { "status": "ok", "database": "ok", "checked_at": checked_at }
            })),
        ),
        Err(e) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "success": false,
                "error": "database unavailable",
                "data": { "status": "degraded", "detail": e.to_string(), "checked_at": checked_at }
            })),
        ),
    }
}
