// Book models and response envelopes

use serde::{ser::SerializeMap, Serialize, Serializer};
use utoipa::ToSchema;

use crate::store::{Document, DocumentId, Fields, ID_FIELD};

/// A book record: a store-assigned id plus whatever fields the client sent
///
/// No schema is enforced. Serializes as a flat JSON object with the id
/// rendered as a string under `_id`.
#[derive(Debug, Clone, PartialEq)]
pub struct Book {
    pub id: DocumentId,
    pub fields: Fields,
}

impl From<Document> for Book {
    fn from(doc: Document) -> Self {
        Book {
            id: doc.id,
            fields: doc.fields,
        }
    }
}

impl Serialize for Book {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let extra = self.fields.keys().filter(|key| *key != ID_FIELD).count();
        let mut map = serializer.serialize_map(Some(extra + 1))?;
        map.serialize_entry(ID_FIELD, &self.id.to_string())?;
        for (key, value) in self.fields.iter().filter(|(key, _)| *key != ID_FIELD) {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// Strip keys the store owns from a client-supplied body
pub fn client_fields(mut body: Fields) -> Fields {
    body.remove(ID_FIELD);
    body
}

/// Response for GET /books
#[derive(Debug, Serialize, ToSchema)]
pub struct BookListResponse {
    #[schema(value_type = Vec<Object>)]
    pub result: Vec<Book>,
}

/// Response for GET /books/{id}
#[derive(Debug, Serialize, ToSchema)]
pub struct BookFoundResponse {
    #[schema(example = "Book found")]
    pub message: String,
    #[schema(value_type = Object)]
    pub result: Book,
}

/// Response for POST /books and PATCH /books/{id}
#[derive(Debug, Serialize, ToSchema)]
pub struct BookResponse {
    pub message: String,
    #[schema(value_type = Object)]
    pub book: Book,
}

/// Response carrying only a message
#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    #[schema(example = "Book deleted successfully")]
    pub message: String,
}
