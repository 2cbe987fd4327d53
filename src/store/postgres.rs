// PostgreSQL-backed document store
// Each document is one JSONB row in the `documents` table, keyed by collection

use axum::async_trait;
use serde_json::Value;
use sqlx::{
    postgres::{PgPool, PgPoolOptions},
    types::Json,
    FromRow,
};
use std::time::Duration;
use uuid::Uuid;

use super::{Document, DocumentId, DocumentStore, Fields, StoreError, UpdateResult};

#[derive(Debug, FromRow)]
struct DocumentRow {
    id: Uuid,
    body: Json<Fields>,
}

impl From<DocumentRow> for Document {
    fn from(row: DocumentRow) -> Self {
        Document {
            id: row.id.into(),
            fields: row.body.0,
        }
    }
}

/// Document store over a PostgreSQL connection pool
#[derive(Debug, Clone)]
pub struct PgDocumentStore {
    pool: PgPool,
}

impl PgDocumentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Creates and configures a connection pool
    ///
    /// # Arguments
    /// * `database_url` - PostgreSQL connection string
    /// * `max_connections` - Upper bound on pooled connections
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, StoreError> {
        tracing::debug!("Creating database connection pool");

        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(Duration::from_secs(3))
            .connect(database_url)
            .await?;

        tracing::info!("Database connection pool created successfully");
        Ok(Self::new(pool))
    }

    /// Run the embedded migrations
    pub async fn migrate(&self) -> Result<(), StoreError> {
        tracing::info!("Running database migrations...");
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        tracing::info!("Migrations completed successfully");
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    async fn collection_names(&self) -> Result<Vec<String>, StoreError> {
        let names = sqlx::query_scalar::<_, String>(
            "SELECT DISTINCT collection FROM documents ORDER BY collection",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(names)
    }

    async fn find_all(&self, collection: &str) -> Result<Vec<Document>, StoreError> {
        tracing::debug!("Fetching all documents from {}", collection);

        let rows = sqlx::query_as::<_, DocumentRow>(
            "SELECT id, body FROM documents WHERE collection = $1 ORDER BY seq",
        )
        .bind(collection)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Document::from).collect())
    }

    async fn find_by_id(
        &self,
        collection: &str,
        id: DocumentId,
    ) -> Result<Option<Document>, StoreError> {
        let row = sqlx::query_as::<_, DocumentRow>(
            "SELECT id, body FROM documents WHERE collection = $1 AND id = $2",
        )
        .bind(collection)
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Document::from))
    }

    async fn find_by_field(
        &self,
        collection: &str,
        field: &str,
        value: &Value,
    ) -> Result<Option<Document>, StoreError> {
        let row = sqlx::query_as::<_, DocumentRow>(
            r#"
            SELECT id, body FROM documents
            WHERE collection = $1 AND body -> $2 = $3::jsonb
            ORDER BY seq
            LIMIT 1
            "#,
        )
        .bind(collection)
        .bind(field)
        .bind(Json(value))
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Document::from))
    }

    async fn insert(&self, collection: &str, fields: Fields) -> Result<DocumentId, StoreError> {
        let id = DocumentId::new();

        sqlx::query("INSERT INTO documents (id, collection, body) VALUES ($1, $2, $3)")
            .bind(id.as_uuid())
            .bind(collection)
            .bind(Json(fields))
            .execute(&self.pool)
            .await
            .map_err(|e| {
                if let sqlx::Error::Database(db_err) = &e {
                    if db_err.is_unique_violation() {
                        let constraint = db_err.constraint().unwrap_or("unique").to_string();
                        return StoreError::Duplicate(constraint);
                    }
                }
                StoreError::Database(e)
            })?;

        Ok(id)
    }

    async fn update_fields(
        &self,
        collection: &str,
        id: DocumentId,
        fields: Fields,
    ) -> Result<UpdateResult, StoreError> {
        // Rows whose merged body equals the current one are left untouched
        let modified = sqlx::query(
            r#"
            UPDATE documents
            SET body = body || $3::jsonb
            WHERE collection = $1 AND id = $2 AND body || $3::jsonb <> body
            "#,
        )
        .bind(collection)
        .bind(id.as_uuid())
        .bind(Json(fields))
        .execute(&self.pool)
        .await?
        .rows_affected();

        if modified > 0 {
            return Ok(UpdateResult {
                matched: modified,
                modified,
            });
        }

        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM documents WHERE collection = $1 AND id = $2)",
        )
        .bind(collection)
        .bind(id.as_uuid())
        .fetch_one(&self.pool)
        .await?;

        Ok(UpdateResult {
            matched: u64::from(exists),
            modified: 0,
        })
    }

    async fn delete(&self, collection: &str, id: DocumentId) -> Result<u64, StoreError> {
        let result = sqlx::query("DELETE FROM documents WHERE collection = $1 AND id = $2")
            .bind(collection)
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
