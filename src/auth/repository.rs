// User repository over the document store

use serde_json::Value;

use crate::auth::{
    error::AuthError,
    models::{User, UserFields},
};
use crate::store::{Document, DocumentId, Fields, SharedStore};

/// Collection holding user records
pub const USERS_COLLECTION: &str = "users";

/// User repository for credential lookups and signups
#[derive(Clone)]
pub struct UserRepository {
    store: SharedStore,
}

impl UserRepository {
    /// Create a new UserRepository
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    fn user_from_document(doc: Document) -> Result<User, AuthError> {
        let fields: UserFields = serde_json::from_value(Value::Object(doc.fields))
            .map_err(|e| AuthError::StoreError(e.into()))?;

        Ok(User {
            id: doc.id,
            email: fields.email,
            password_hash: fields.password_hash,
        })
    }

    /// Create a new user
    pub async fn create_user(
        &self,
        email: &str,
        password_hash: &str,
    ) -> Result<DocumentId, AuthError> {
        let mut fields = Fields::new();
        fields.insert("email".to_string(), Value::String(email.to_string()));
        fields.insert(
            "password_hash".to_string(),
            Value::String(password_hash.to_string()),
        );

        let id = self.store.insert(USERS_COLLECTION, fields).await?;
        Ok(id)
    }

    /// Find a user by exact email
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, AuthError> {
        self.store
            .find_by_field(USERS_COLLECTION, "email", &Value::String(email.to_string()))
            .await?
            .map(Self::user_from_document)
            .transpose()
    }

    /// Check if an email exists
    pub async fn email_exists(&self, email: &str) -> Result<bool, AuthError> {
        Ok(self.find_by_email(email).await?.is_some())
    }
}
