// In-process document store
// Keeps each collection as an insertion-ordered list behind an async lock

use axum::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use tokio::sync::RwLock;

use super::{Document, DocumentId, DocumentStore, Fields, StoreError, UpdateResult};

/// Document store held entirely in memory
#[derive(Debug, Default)]
pub struct MemoryDocumentStore {
    collections: RwLock<HashMap<String, Vec<Document>>>,
    unique_fields: Vec<(String, String)>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject inserts into `collection` that repeat an existing `field` value
    pub fn with_unique_field(mut self, collection: &str, field: &str) -> Self {
        self.unique_fields
            .push((collection.to_string(), field.to_string()));
        self
    }

    fn unique_fields_of<'a>(&'a self, collection: &'a str) -> impl Iterator<Item = &'a str> {
        self.unique_fields
            .iter()
            .filter(move |(c, _)| c == collection)
            .map(|(_, f)| f.as_str())
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn collection_names(&self) -> Result<Vec<String>, StoreError> {
        let collections = self.collections.read().await;
        let mut names: Vec<String> = collections
            .iter()
            .filter(|(_, docs)| !docs.is_empty())
            .map(|(name, _)| name.clone())
            .collect();
        names.sort();
        Ok(names)
    }

    async fn find_all(&self, collection: &str) -> Result<Vec<Document>, StoreError> {
        let collections = self.collections.read().await;
        Ok(collections.get(collection).cloned().unwrap_or_default())
    }

    async fn find_by_id(
        &self,
        collection: &str,
        id: DocumentId,
    ) -> Result<Option<Document>, StoreError> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .and_then(|docs| docs.iter().find(|doc| doc.id == id))
            .cloned())
    }

    async fn find_by_field(
        &self,
        collection: &str,
        field: &str,
        value: &Value,
    ) -> Result<Option<Document>, StoreError> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .and_then(|docs| docs.iter().find(|doc| doc.fields.get(field) == Some(value)))
            .cloned())
    }

    async fn insert(&self, collection: &str, fields: Fields) -> Result<DocumentId, StoreError> {
        let mut collections = self.collections.write().await;
        let docs = collections.entry(collection.to_string()).or_default();

        for field in self.unique_fields_of(collection) {
            if let Some(value) = fields.get(field) {
                if docs.iter().any(|doc| doc.fields.get(field) == Some(value)) {
                    return Err(StoreError::Duplicate(field.to_string()));
                }
            }
        }

        let id = DocumentId::new();
        docs.push(Document { id, fields });
        Ok(id)
    }

    async fn update_fields(
        &self,
        collection: &str,
        id: DocumentId,
        fields: Fields,
    ) -> Result<UpdateResult, StoreError> {
        let mut collections = self.collections.write().await;
        let Some(doc) = collections
            .get_mut(collection)
            .and_then(|docs| docs.iter_mut().find(|doc| doc.id == id))
        else {
            return Ok(UpdateResult::default());
        };

        let mut changed = false;
        for (key, value) in fields {
            if doc.fields.get(&key) != Some(&value) {
                doc.fields.insert(key, value);
                changed = true;
            }
        }

        Ok(UpdateResult {
            matched: 1,
            modified: u64::from(changed),
        })
    }

    async fn delete(&self, collection: &str, id: DocumentId) -> Result<u64, StoreError> {
        let mut collections = self.collections.write().await;
        let Some(docs) = collections.get_mut(collection) else {
            return Ok(0);
        };

        let before = docs.len();
        docs.retain(|doc| doc.id != id);
        Ok((before - docs.len()) as u64)
    }
}
