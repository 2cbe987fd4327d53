use bookshop_api::{auth::TokenService, config::Config, create_router, store, AppState};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("bookshop_api=debug,tower_http=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true)
        .init();

    tracing::info!("Bookshop API - Starting...");

    let config = Config::from_env().expect("Invalid configuration");
    if config.jwt_secret.is_none() {
        tracing::warn!("JWT_SECRET is not set; login and protected routes will fail");
    }

    tracing::info!("Connecting to document store...");
    let store = store::connect(&config.database_url, config.max_connections)
        .await
        .expect("Failed to open document store");

    let tokens = TokenService::new(config.jwt_secret.clone(), config.token_ttl);
    let app = create_router(AppState::new(store, tokens));

    let addr = config.bind_address();
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind to address");

    tracing::info!("Bookshop API is running on http://{}", addr);
    tracing::info!("Swagger UI available at http://{}/swagger-ui", addr);

    axum::serve(listener, app).await.expect("Server error");
}
