// Authentication data models and DTOs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::store::DocumentId;

/// Stored user record
#[derive(Debug, Clone)]
pub struct User {
    pub id: DocumentId,
    pub email: String,
    pub password_hash: String,
}

/// Shape of a user document's fields
#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct UserFields {
    pub email: String,
    pub password_hash: String,
}

/// Signup request DTO
///
/// Absent fields deserialize as empty strings and are caught by validation.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(default)]
pub struct SignupRequest {
    #[validate(email)]
    #[schema(example = "reader@example.com")]
    pub email: String,
    #[validate(length(min = 1, message = "password must not be empty"))]
    #[schema(example = "correct horse battery staple")]
    pub password: String,
}

/// Login request DTO
///
/// Absent fields deserialize as empty strings, which never match a user.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct LoginRequest {
    #[schema(example = "reader@example.com")]
    pub email: String,
    pub password: String,
}

/// Signup response DTO
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SignupResponse {
    #[schema(example = "User created successfully")]
    pub message: String,
    pub user_id: String,
}

/// Login response DTO
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TokenResponse {
    pub token: String,
}
