// HTTP handlers for authentication endpoints

use axum::{extract::State, Json};
use validator::Validate;

use crate::auth::{
    error::AuthError,
    models::{LoginRequest, SignupRequest, SignupResponse, TokenResponse},
};
use crate::extract::JsonBody;
use crate::AppState;

/// Handler for POST /signup
/// Registers a new user
#[utoipa::path(
    post,
    path = "/signup",
    request_body = SignupRequest,
    responses(
        (status = 200, description = "User created", body = SignupResponse),
        (status = 400, description = "Invalid input or email already registered", body = String, example = json!({"error": "Email already exists"})),
        (status = 500, description = "Internal server error", body = String)
    ),
    tag = "auth"
)]
pub async fn signup_handler(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<SignupRequest>,
) -> Result<Json<SignupResponse>, AuthError> {
    tracing::debug!("Signup request for {}", request.email);

    request.validate()?;

    let user_id = state.auth.signup(&request.email, &request.password).await?;

    Ok(Json(SignupResponse {
        message: "User created successfully".to_string(),
        user_id: user_id.to_string(),
    }))
}

/// Handler for POST /login
/// Exchanges credentials for a bearer token
#[utoipa::path(
    post,
    path = "/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Token issued", body = TokenResponse),
        (status = 401, description = "Bad credentials", body = String, example = json!({"error": "Invalid username or password"})),
        (status = 500, description = "Internal server error", body = String)
    ),
    tag = "auth"
)]
pub async fn login_handler(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<LoginRequest>,
) -> Result<Json<TokenResponse>, AuthError> {
    tracing::debug!("Login request for {}", request.email);

    let token = state.auth.login(&request.email, &request.password).await?;

    Ok(Json(TokenResponse { token }))
}
