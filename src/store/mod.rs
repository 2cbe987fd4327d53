// Document store: the schema-less database behind users and books
// Provides a generic find/insert/update/delete interface over named collections

pub mod memory;
pub mod postgres;

use axum::async_trait;
use serde_json::{Map, Value};
use std::{fmt, str::FromStr, sync::Arc};
use uuid::Uuid;

pub use memory::MemoryDocumentStore;
pub use postgres::PgDocumentStore;

/// Key under which a document's identifier is rendered in JSON
pub const ID_FIELD: &str = "_id";

/// Top-level key/value pairs of a document
pub type Fields = Map<String, Value>;

/// Store handle shared by every request
pub type SharedStore = Arc<dyn DocumentStore>;

/// Opaque document identifier assigned by the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DocumentId(Uuid);

impl DocumentId {
    /// Generate a fresh identifier
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for DocumentId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for DocumentId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl FromStr for DocumentId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

/// A stored document: its identifier plus whatever fields it was given
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: DocumentId,
    pub fields: Fields,
}

/// Outcome of a partial-merge update
///
/// `matched` counts documents found by id, `modified` those whose content
/// actually changed. A merge that rewrites a field with its current value
/// matches without modifying.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpdateResult {
    pub matched: u64,
    pub modified: u64,
}

/// Errors raised by a document store
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("{0}")]
    Database(#[from] sqlx::Error),

    #[error("migration failed: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("duplicate value for unique field '{0}'")]
    Duplicate(String),

    #[error("malformed document: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Generic access to a document database
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Names of the collections currently holding documents
    async fn collection_names(&self) -> Result<Vec<String>, StoreError>;

    /// Every document of a collection, in the store's default order
    async fn find_all(&self, collection: &str) -> Result<Vec<Document>, StoreError>;

    async fn find_by_id(
        &self,
        collection: &str,
        id: DocumentId,
    ) -> Result<Option<Document>, StoreError>;

    /// First document whose top-level `field` equals `value`
    async fn find_by_field(
        &self,
        collection: &str,
        field: &str,
        value: &Value,
    ) -> Result<Option<Document>, StoreError>;

    /// Store `fields` as a new document and return its identifier
    async fn insert(&self, collection: &str, fields: Fields) -> Result<DocumentId, StoreError>;

    /// Overwrite only the supplied top-level fields of one document
    async fn update_fields(
        &self,
        collection: &str,
        id: DocumentId,
        fields: Fields,
    ) -> Result<UpdateResult, StoreError>;

    /// Remove one document, returning how many were deleted
    async fn delete(&self, collection: &str, id: DocumentId) -> Result<u64, StoreError>;
}

/// Open the store named by `database_url`
///
/// `memory://` selects the in-process store; anything else is treated as a
/// PostgreSQL connection string and migrated before use.
pub async fn connect(database_url: &str, max_connections: u32) -> Result<SharedStore, StoreError> {
    if database_url.starts_with("memory://") {
        tracing::info!("Using in-memory document store");
        let store = MemoryDocumentStore::new().with_unique_field("users", "email");
        return Ok(Arc::new(store));
    }

    let store = PgDocumentStore::connect(database_url, max_connections).await?;
    store.migrate().await?;
    Ok(Arc::new(store))
}
