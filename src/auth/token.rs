// JWT token generation and validation service

use crate::auth::error::AuthError;
use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};

/// JWT claims structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub email: String,
    pub exp: i64, // expiration timestamp
}

/// Token service for JWT operations
///
/// Tokens are HS256-signed, carry the user's email, and expire a fixed
/// duration after issuance. There is no refresh or revocation.
#[derive(Debug, Clone)]
pub struct TokenService {
    secret: Option<String>,
    token_duration: Duration,
}

impl TokenService {
    /// Tokens expire 30 minutes after issuance unless configured otherwise
    pub const DEFAULT_DURATION_MINUTES: i64 = 30;

    /// Create a new TokenService; a missing secret fails every token operation
    pub fn new(secret: Option<String>, token_duration: Duration) -> Self {
        Self {
            secret,
            token_duration,
        }
    }

    /// Create a TokenService with the given secret and the default lifetime
    pub fn with_secret(secret: impl Into<String>) -> Self {
        Self::new(
            Some(secret.into()),
            Duration::minutes(Self::DEFAULT_DURATION_MINUTES),
        )
    }

    fn secret(&self) -> Result<&[u8], AuthError> {
        self.secret
            .as_deref()
            .map(str::as_bytes)
            .ok_or_else(|| AuthError::ConfigError("JWT_SECRET not configured".to_string()))
    }

    /// Issue a token for an authenticated email
    pub fn issue(&self, email: &str) -> Result<String, AuthError> {
        let claims = Claims {
            email: email.to_string(),
            exp: (Utc::now() + self.token_duration).timestamp(),
        };
        self.sign(&claims)
    }

    /// Sign arbitrary claims with the configured secret
    pub fn sign(&self, claims: &Claims) -> Result<String, AuthError> {
        let secret = self
            .secret()
            .map_err(|e| AuthError::TokenGenerationError(e.to_string()))?;

        encode(
            &Header::new(Algorithm::HS256),
            claims,
            &EncodingKey::from_secret(secret),
        )
        .map_err(|e| AuthError::TokenGenerationError(e.to_string()))
    }

    /// Verify signature and expiry, returning the decoded claims
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        let secret = self.secret()?;

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        decode::<Claims>(token, &DecodingKey::from_secret(secret), &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::ExpiredToken,
                _ => AuthError::InvalidToken,
            })
    }
}
