use market_admin_api::config;
use market_admin_api::middleware::gate::{AccessGate, SESSION_CHECK_PATH};
use market_admin_api::routes;

#[tokio::main]
async fn main() {
    // Load .env if present so cargo run picks up DATABASE_URL, SUPABASE_URL, etc.
    let _ = dotenvy::dotenv();

    // Initialize configuration (this loads the config singleton)
    let config = config::config();

    tracing_subscriber::fmt::init();
    tracing::info!("Starting market admin API in {:?} mode", config.environment);

    // Allow tests or deployments to override port via env
    let port = std::env::var("ADMIN_API_PORT")
        .ok()
        .or_else(|| std::env::var("PORT").ok())
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(3000);

    // The gate reaches its session-check collaborator over loopback
    let session_check_url = format!("http://127.0.0.1:{}{}", port, SESSION_CHECK_PATH);
    let app = routes::app(AccessGate::new(session_check_url));

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {}: {}", bind_addr, e));

    println!("Market admin API listening on http://{}", bind_addr);

    axum::serve(listener, app).await.expect("server");
}
