// HTTP handlers for book endpoints
// Every route here requires a valid token in the Authorization header

use axum::{
    extract::{Path, State},
    Json,
};

use crate::auth::middleware::AuthenticatedUser;
use crate::books::{
    BookFoundResponse, BookListResponse, BookResponse, DeleteOutcome, MessageResponse,
    UpdateOutcome,
};
use crate::error::ApiError;
use crate::extract::JsonBody;
use crate::store::{DocumentId, Fields};
use crate::AppState;

const BOOK_NOT_FOUND: &str = "Book not found";

fn parse_book_id(raw: &str) -> Result<DocumentId, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::BadRequest(format!("Invalid book id: {}", raw)))
}

/// Handler for GET /books
/// Retrieves every book
#[utoipa::path(
    get,
    path = "/books",
    responses(
        (status = 200, description = "All books", body = BookListResponse),
        (status = 401, description = "Missing, invalid or expired token", body = String, example = json!({"error": "Authorization header is missing"})),
        (status = 500, description = "Internal server error", body = String)
    ),
    tag = "books"
)]
pub async fn list_books(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<BookListResponse>, ApiError> {
    tracing::debug!("{} listing books", user.email);

    let books = state.books.list().await?;

    tracing::debug!("Retrieved {} books", books.len());
    Ok(Json(BookListResponse { result: books }))
}

/// Handler for GET /books/{id}
/// Retrieves one book by id
#[utoipa::path(
    get,
    path = "/books/{id}",
    params(
        ("id" = String, Path, description = "Book id")
    ),
    responses(
        (status = 200, description = "Book found", body = BookFoundResponse),
        (status = 400, description = "Malformed id", body = String),
        (status = 401, description = "Missing, invalid or expired token", body = String),
        (status = 404, description = "Book not found", body = MessageResponse),
        (status = 500, description = "Internal server error", body = String)
    ),
    tag = "books"
)]
pub async fn get_book(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<String>,
) -> Result<Json<BookFoundResponse>, ApiError> {
    tracing::debug!("{} fetching book {}", user.email, id);

    let id = parse_book_id(&id)?;
    let book = state
        .books
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found(BOOK_NOT_FOUND))?;

    Ok(Json(BookFoundResponse {
        message: "Book found".to_string(),
        result: book,
    }))
}

/// Handler for POST /books
/// Stores the request body verbatim as a new book
#[utoipa::path(
    post,
    path = "/books",
    responses(
        (status = 200, description = "Book inserted", body = BookResponse),
        (status = 400, description = "Body is not valid JSON", body = String),
        (status = 401, description = "Missing, invalid or expired token", body = String),
        (status = 422, description = "Body is not a JSON object", body = String),
        (status = 500, description = "Internal server error", body = String)
    ),
    tag = "books"
)]
pub async fn create_book(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    JsonBody(body): JsonBody<Fields>,
) -> Result<Json<BookResponse>, ApiError> {
    tracing::debug!("{} creating book", user.email);

    let book = state
        .books
        .create(body)
        .await?
        .ok_or_else(|| ApiError::not_found(BOOK_NOT_FOUND))?;

    tracing::info!("Successfully created book with id: {}", book.id);
    Ok(Json(BookResponse {
        message: "Book inserted successfully".to_string(),
        book,
    }))
}

/// Handler for PATCH /books/{id}
/// Overwrites only the fields present in the request body
#[utoipa::path(
    patch,
    path = "/books/{id}",
    params(
        ("id" = String, Path, description = "Book id")
    ),
    responses(
        (status = 200, description = "Book updated", body = BookResponse),
        (status = 400, description = "Malformed id", body = String),
        (status = 401, description = "Missing, invalid or expired token", body = String),
        (status = 404, description = "Book not found or no changes made", body = MessageResponse),
        (status = 422, description = "Body is not a JSON object", body = String),
        (status = 500, description = "Internal server error", body = String)
    ),
    tag = "books"
)]
pub async fn update_book(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<String>,
    JsonBody(body): JsonBody<Fields>,
) -> Result<Json<BookResponse>, ApiError> {
    tracing::debug!("{} updating book {}", user.email, id);

    let id = parse_book_id(&id)?;
    match state.books.update(id, body).await? {
        UpdateOutcome::Modified(book) => {
            tracing::info!("Successfully updated book with id: {}", id);
            Ok(Json(BookResponse {
                message: "Book updated successfully".to_string(),
                book,
            }))
        }
        // Both outcomes share one response; the log keeps them apart
        UpdateOutcome::Missing => {
            tracing::debug!("Book {} not found for update", id);
            Err(ApiError::not_found("Book not found or no changes made"))
        }
        UpdateOutcome::Unchanged => {
            tracing::debug!("Book {} left unchanged by update", id);
            Err(ApiError::not_found("Book not found or no changes made"))
        }
    }
}

/// Handler for DELETE /books/{id}
/// Deletes a book
#[utoipa::path(
    delete,
    path = "/books/{id}",
    params(
        ("id" = String, Path, description = "Book id")
    ),
    responses(
        (status = 200, description = "Book deleted", body = MessageResponse),
        (status = 400, description = "Malformed id", body = String),
        (status = 401, description = "Missing, invalid or expired token", body = String),
        (status = 404, description = "Book not found", body = MessageResponse),
        (status = 500, description = "Internal server error", body = String)
    ),
    tag = "books"
)]
pub async fn delete_book(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    tracing::debug!("{} deleting book {}", user.email, id);

    let id = parse_book_id(&id)?;
    match state.books.delete(id).await? {
        DeleteOutcome::Deleted => {
            tracing::info!("Successfully deleted book with id: {}", id);
            Ok(Json(MessageResponse {
                message: "Book deleted successfully".to_string(),
            }))
        }
        DeleteOutcome::NotDeleted => Err(ApiError::not_found(
            "Book not found or could not be deleted",
        )),
        DeleteOutcome::Missing => Err(ApiError::not_found(BOOK_NOT_FOUND)),
    }
}
