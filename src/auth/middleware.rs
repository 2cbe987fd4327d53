// Token gate for protected routes

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{header, request::Parts, HeaderMap},
};
use std::sync::Arc;
use tracing::debug;

use crate::auth::{error::AuthError, token::TokenService};

/// Identity decoded from a verified token
///
/// Taking this as a handler argument gates the route: the handler only runs
/// when the `Authorization` header carries a valid, unexpired token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub email: String,
}

/// Check the raw `Authorization` header against the token service
///
/// The header holds the bare token, without a `Bearer ` prefix.
pub fn authenticate(
    headers: &HeaderMap,
    tokens: &TokenService,
) -> Result<AuthenticatedUser, AuthError> {
    let token = headers
        .get(header::AUTHORIZATION)
        .ok_or(AuthError::MissingToken)?
        .to_str()
        .map_err(|_| AuthError::InvalidToken)?;

    if token.is_empty() {
        return Err(AuthError::MissingToken);
    }

    let claims = tokens.verify(token)?;
    Ok(AuthenticatedUser {
        email: claims.email,
    })
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthenticatedUser
where
    Arc<TokenService>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let tokens = Arc::<TokenService>::from_ref(state);
        let user = authenticate(&parts.headers, &tokens)?;

        debug!("Authenticated {} for {}", user.email, parts.uri.path());
        Ok(user)
    }
}
