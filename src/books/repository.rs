// Book repository over the document store

use tracing::debug;

use crate::books::models::{client_fields, Book};
use crate::store::{DocumentId, Fields, SharedStore, StoreError};

/// Collection holding book records
pub const BOOKS_COLLECTION: &str = "books";

/// Result of a partial-merge update
#[derive(Debug, Clone, PartialEq)]
pub enum UpdateOutcome {
    /// No book has this id, or it vanished before it could be re-read
    Missing,
    /// The book exists but the merge changed nothing
    Unchanged,
    /// The merge changed the book; carries the re-read document
    Modified(Book),
}

/// Result of a delete
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// No book has this id
    Missing,
    /// The book was seen but the delete removed nothing
    NotDeleted,
    Deleted,
}

/// Repository for book operations
#[derive(Clone)]
pub struct BookRepository {
    store: SharedStore,
}

impl BookRepository {
    /// Create a new BookRepository
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    /// All books in the store's default order
    pub async fn list(&self) -> Result<Vec<Book>, StoreError> {
        let docs = self.store.find_all(BOOKS_COLLECTION).await?;
        Ok(docs.into_iter().map(Book::from).collect())
    }

    pub async fn find_by_id(&self, id: DocumentId) -> Result<Option<Book>, StoreError> {
        let doc = self.store.find_by_id(BOOKS_COLLECTION, id).await?;
        Ok(doc.map(Book::from))
    }

    /// Insert the body as a new book and read it back
    ///
    /// Returns `None` if the new book is gone by the time it is re-read.
    pub async fn create(&self, body: Fields) -> Result<Option<Book>, StoreError> {
        let id = self
            .store
            .insert(BOOKS_COLLECTION, client_fields(body))
            .await?;
        debug!("Inserted book {}", id);

        self.find_by_id(id).await
    }

    /// Merge the body's top-level fields into an existing book
    pub async fn update(&self, id: DocumentId, body: Fields) -> Result<UpdateOutcome, StoreError> {
        let result = self
            .store
            .update_fields(BOOKS_COLLECTION, id, client_fields(body))
            .await?;

        if result.matched == 0 {
            return Ok(UpdateOutcome::Missing);
        }
        if result.modified == 0 {
            return Ok(UpdateOutcome::Unchanged);
        }

        Ok(match self.find_by_id(id).await? {
            Some(book) => UpdateOutcome::Modified(book),
            None => {
                debug!("Book {} disappeared after update", id);
                UpdateOutcome::Missing
            }
        })
    }

    /// Delete a book after checking that it exists
    pub async fn delete(&self, id: DocumentId) -> Result<DeleteOutcome, StoreError> {
        if self.find_by_id(id).await?.is_none() {
            return Ok(DeleteOutcome::Missing);
        }

        let deleted = self.store.delete(BOOKS_COLLECTION, id).await?;
        Ok(if deleted > 0 {
            DeleteOutcome::Deleted
        } else {
            DeleteOutcome::NotDeleted
        })
    }
}
