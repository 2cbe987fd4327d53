pub mod auth;
pub mod books;
pub mod config;
pub mod error;
pub mod extract;
pub mod health;
pub mod store;

use axum::{
    extract::FromRef,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use auth::{AuthService, TokenService, UserRepository};
use books::BookRepository;
use store::SharedStore;

/// OpenAPI documentation structure
#[derive(OpenApi)]
#[openapi(
    paths(
        auth::handlers::signup_handler,
        auth::handlers::login_handler,
        health::check_connection,
        books::handlers::list_books,
        books::handlers::get_book,
        books::handlers::create_book,
        books::handlers::update_book,
        books::handlers::delete_book,
    ),
    components(
        schemas(
            auth::SignupRequest,
            auth::LoginRequest,
            auth::SignupResponse,
            auth::TokenResponse,
            health::ConnectionResponse,
            books::BookListResponse,
            books::BookFoundResponse,
            books::BookResponse,
            books::MessageResponse,
        )
    ),
    tags(
        (name = "auth", description = "Signup and login"),
        (name = "books", description = "Book records, token required"),
        (name = "health", description = "Store connectivity")
    ),
    info(
        title = "Bookshop API",
        version = "0.1.0",
        description = "Authenticated CRUD API for bookshop records"
    )
)]
pub struct ApiDoc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub store: SharedStore,
    pub tokens: Arc<TokenService>,
    pub auth: Arc<AuthService>,
    pub books: BookRepository,
}

impl AppState {
    pub fn new(store: SharedStore, tokens: TokenService) -> Self {
        let tokens = Arc::new(tokens);
        let auth = AuthService::new(UserRepository::new(store.clone()), tokens.clone());

        Self {
            books: BookRepository::new(store.clone()),
            auth: Arc::new(auth),
            tokens,
            store,
        }
    }
}

impl FromRef<AppState> for Arc<TokenService> {
    fn from_ref(state: &AppState) -> Self {
        state.tokens.clone()
    }
}

/// Creates and configures the application router
/// Maps all API endpoints to their handlers and adds tracing and CORS layers
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/signup", post(auth::signup_handler))
        .route("/login", post(auth::login_handler))
        .route("/check_connection", get(health::check_connection))
        .route(
            "/books",
            get(books::list_books).post(books::create_book),
        )
        .route(
            "/books/:id",
            get(books::get_book)
                .patch(books::update_book)
                .delete(books::delete_book),
        )
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests;
