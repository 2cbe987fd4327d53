// Handler tests for the Bookshop API
// Drives the full router against the in-memory document store

use super::*;
use axum::body::Bytes;
use axum::http::{header, HeaderValue, StatusCode};
use axum_test::{TestResponse, TestServer};
use chrono::Utc;
use serde_json::{json, Value};

use crate::auth::Claims;
use crate::store::MemoryDocumentStore;

const SECRET: &str = "handler_test_secret";

// ============================================================================
// Test Helpers
// ============================================================================

fn create_test_store() -> SharedStore {
    Arc::new(MemoryDocumentStore::new().with_unique_field("users", "email"))
}

fn create_test_app_with(store: SharedStore, tokens: TokenService) -> TestServer {
    TestServer::new(create_router(AppState::new(store, tokens))).unwrap()
}

fn create_test_app() -> (TestServer, SharedStore) {
    let store = create_test_store();
    let server = create_test_app_with(store.clone(), TokenService::with_secret(SECRET));
    (server, store)
}

fn auth_value(token: &str) -> HeaderValue {
    HeaderValue::from_str(token).unwrap()
}

/// Signs up and logs in a user, returning the issued token
async fn login_token(server: &TestServer) -> String {
    let credentials = json!({"email": "reader@example.com", "password": "pw"});
    server.post("/signup").json(&credentials).await;

    let response = server.post("/login").json(&credentials).await;
    assert_eq!(response.status_code(), StatusCode::OK);
    response.json::<Value>()["token"]
        .as_str()
        .unwrap()
        .to_string()
}

async fn create_book(server: &TestServer, token: &str, body: Value) -> Value {
    let response = server
        .post("/books")
        .add_header(header::AUTHORIZATION, auth_value(token))
        .json(&body)
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    response.json::<Value>()["book"].clone()
}

fn assert_error(response: &TestResponse, status: StatusCode, message: &str) {
    assert_eq!(response.status_code(), status);
    assert_eq!(response.json::<Value>(), json!({ "error": message }));
}

/// Asserts a JSON error envelope without pinning the library's wording
fn assert_error_envelope(response: &TestResponse, status: StatusCode) {
    assert_eq!(response.status_code(), status);
    let body: Value = response.json();
    assert!(body["error"].is_string(), "unexpected body: {body}");
}

// ============================================================================
// Signup / Login
// ============================================================================

#[tokio::test]
async fn test_signup_returns_user_id() {
    let (server, store) = create_test_app();

    let response = server
        .post("/signup")
        .json(&json!({"email": "a@example.com", "password": "pw"}))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["message"], "User created successfully");

    let users = store.find_all("users").await.unwrap();
    assert_eq!(users.len(), 1);
    assert_eq!(body["user_id"], users[0].id.to_string());
}

#[tokio::test]
async fn test_duplicate_signup_is_rejected_without_new_record() {
    let (server, store) = create_test_app();
    let credentials = json!({"email": "a@example.com", "password": "pw"});

    server.post("/signup").json(&credentials).await;
    let response = server.post("/signup").json(&credentials).await;

    assert_error(&response, StatusCode::BAD_REQUEST, "Email already exists");
    assert_eq!(store.find_all("users").await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_signup_with_invalid_email_is_rejected() {
    let (server, store) = create_test_app();

    let response = server
        .post("/signup")
        .json(&json!({"email": "not-an-email", "password": "pw"}))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert!(store.find_all("users").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_signup_then_login_issues_token() {
    let (server, _) = create_test_app();
    let token = login_token(&server).await;

    let claims = TokenService::with_secret(SECRET).verify(&token).unwrap();
    assert_eq!(claims.email, "reader@example.com");
}

#[tokio::test]
async fn test_login_with_wrong_password_is_unauthorized() {
    let (server, _) = create_test_app();
    server
        .post("/signup")
        .json(&json!({"email": "a@example.com", "password": "pw"}))
        .await;

    let response = server
        .post("/login")
        .json(&json!({"email": "a@example.com", "password": "nope"}))
        .await;
    assert_error(
        &response,
        StatusCode::UNAUTHORIZED,
        "Invalid username or password",
    );

    let response = server
        .post("/login")
        .json(&json!({"email": "ghost@example.com", "password": "pw"}))
        .await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_login_with_absent_fields_is_unauthorized() {
    let (server, _) = create_test_app();
    server
        .post("/signup")
        .json(&json!({"email": "a@example.com", "password": "pw"}))
        .await;

    let response = server
        .post("/login")
        .json(&json!({"email": "a@example.com"}))
        .await;
    assert_error(
        &response,
        StatusCode::UNAUTHORIZED,
        "Invalid username or password",
    );

    let response = server.post("/login").json(&json!({})).await;
    assert_error(
        &response,
        StatusCode::UNAUTHORIZED,
        "Invalid username or password",
    );
}

#[tokio::test]
async fn test_signup_without_password_is_bad_request() {
    let (server, store) = create_test_app();

    let response = server
        .post("/signup")
        .json(&json!({"email": "a@example.com"}))
        .await;

    assert_error_envelope(&response, StatusCode::BAD_REQUEST);
    assert!(store.find_all("users").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_login_with_malformed_json_is_bad_request() {
    let (server, _) = create_test_app();

    let response = server
        .post("/login")
        .bytes(Bytes::from_static(b"{not json"))
        .content_type("application/json")
        .await;

    assert_error_envelope(&response, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_login_without_secret_is_server_error() {
    let store = create_test_store();
    let server = create_test_app_with(
        store,
        TokenService::new(None, chrono::Duration::minutes(30)),
    );
    let credentials = json!({"email": "a@example.com", "password": "pw"});

    server.post("/signup").json(&credentials).await;
    let response = server.post("/login").json(&credentials).await;

    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
}

// ============================================================================
// Token Gate
// ============================================================================

#[tokio::test]
async fn test_protected_route_without_header() {
    let (server, _) = create_test_app();

    let response = server.get("/books").await;

    assert_error(
        &response,
        StatusCode::UNAUTHORIZED,
        "Authorization header is missing",
    );
}

#[tokio::test]
async fn test_protected_route_with_foreign_token() {
    let (server, _) = create_test_app();
    let token = TokenService::with_secret("not_the_server_secret")
        .issue("reader@example.com")
        .unwrap();

    let response = server
        .get("/books")
        .add_header(header::AUTHORIZATION, auth_value(&token))
        .await;

    assert_error(&response, StatusCode::UNAUTHORIZED, "Invalid token");
}

#[tokio::test]
async fn test_protected_route_with_expired_token() {
    let (server, _) = create_test_app();
    let token = TokenService::with_secret(SECRET)
        .sign(&Claims {
            email: "reader@example.com".to_string(),
            exp: Utc::now().timestamp() - 60,
        })
        .unwrap();

    let response = server
        .delete("/books/00000000-0000-0000-0000-000000000000")
        .add_header(header::AUTHORIZATION, auth_value(&token))
        .await;

    assert_error(&response, StatusCode::UNAUTHORIZED, "Token has expired");
}

#[tokio::test]
async fn test_gate_runs_before_body_is_stored() {
    let (server, store) = create_test_app();

    let response = server
        .post("/books")
        .json(&json!({"title": "Sneaky"}))
        .await;

    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
    assert!(store.find_all("books").await.unwrap().is_empty());
}

// ============================================================================
// Books
// ============================================================================

#[tokio::test]
async fn test_create_then_get_round_trip() {
    let (server, _) = create_test_app();
    let token = login_token(&server).await;

    let created = create_book(
        &server,
        &token,
        json!({"title": "Middlemarch", "author": "George Eliot", "tags": ["novel"]}),
    )
    .await;
    let id = created["_id"].as_str().unwrap().to_string();

    let response = server
        .get(&format!("/books/{}", id))
        .add_header(header::AUTHORIZATION, auth_value(&token))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(
        response.json::<Value>(),
        json!({
            "message": "Book found",
            "result": {
                "_id": id,
                "title": "Middlemarch",
                "author": "George Eliot",
                "tags": ["novel"]
            }
        })
    );
}

#[tokio::test]
async fn test_create_reports_success_message() {
    let (server, _) = create_test_app();
    let token = login_token(&server).await;

    let response = server
        .post("/books")
        .add_header(header::AUTHORIZATION, auth_value(&token))
        .json(&json!({"title": "Emma"}))
        .await;

    let body: Value = response.json();
    assert_eq!(body["message"], "Book inserted successfully");
    assert_eq!(body["book"]["title"], "Emma");
    assert!(body["book"]["_id"].is_string());
}

#[tokio::test]
async fn test_list_returns_every_book() {
    let (server, _) = create_test_app();
    let token = login_token(&server).await;

    let first = create_book(&server, &token, json!({"title": "One"})).await;
    let second = create_book(&server, &token, json!({"title": "Two"})).await;

    let response = server
        .get("/books")
        .add_header(header::AUTHORIZATION, auth_value(&token))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.json::<Value>(), json!({ "result": [first, second] }));
}

#[tokio::test]
async fn test_get_missing_book_is_not_found() {
    let (server, _) = create_test_app();
    let token = login_token(&server).await;

    let response = server
        .get(&format!("/books/{}", uuid::Uuid::new_v4()))
        .add_header(header::AUTHORIZATION, auth_value(&token))
        .await;

    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    assert_eq!(response.json::<Value>(), json!({ "message": "Book not found" }));
}

#[tokio::test]
async fn test_malformed_id_is_bad_request() {
    let (server, _) = create_test_app();
    let token = login_token(&server).await;

    let response = server
        .get("/books/not-an-id")
        .add_header(header::AUTHORIZATION, auth_value(&token))
        .await;

    assert_error(
        &response,
        StatusCode::BAD_REQUEST,
        "Invalid book id: not-an-id",
    );
}

#[tokio::test]
async fn test_non_object_book_body_is_rejected_with_json_error() {
    let (server, store) = create_test_app();
    let token = login_token(&server).await;

    let response = server
        .post("/books")
        .add_header(header::AUTHORIZATION, auth_value(&token))
        .json(&json!([1, 2]))
        .await;
    assert_error_envelope(&response, StatusCode::UNPROCESSABLE_ENTITY);

    let response = server
        .post("/books")
        .add_header(header::AUTHORIZATION, auth_value(&token))
        .bytes(Bytes::from_static(b"{not json"))
        .content_type("application/json")
        .await;
    assert_error_envelope(&response, StatusCode::BAD_REQUEST);

    let response = server
        .post("/books")
        .add_header(header::AUTHORIZATION, auth_value(&token))
        .text("title=Emma")
        .await;
    assert_error_envelope(&response, StatusCode::UNSUPPORTED_MEDIA_TYPE);

    assert!(store.find_all("books").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_update_with_non_object_body_is_rejected_with_json_error() {
    let (server, _) = create_test_app();
    let token = login_token(&server).await;
    let created = create_book(&server, &token, json!({"title": "Emma"})).await;

    let response = server
        .patch(&format!("/books/{}", created["_id"].as_str().unwrap()))
        .add_header(header::AUTHORIZATION, auth_value(&token))
        .json(&json!("Persuasion"))
        .await;

    assert_error_envelope(&response, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_update_merges_only_supplied_fields() {
    let (server, _) = create_test_app();
    let token = login_token(&server).await;
    let created = create_book(&server, &token, json!({"title": "Emma", "year": 1815})).await;
    let id = created["_id"].as_str().unwrap();

    let response = server
        .patch(&format!("/books/{}", id))
        .add_header(header::AUTHORIZATION, auth_value(&token))
        .json(&json!({"year": 1816, "publisher": "John Murray"}))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(
        response.json::<Value>(),
        json!({
            "message": "Book updated successfully",
            "book": {
                "_id": id,
                "title": "Emma",
                "year": 1816,
                "publisher": "John Murray"
            }
        })
    );
}

#[tokio::test]
async fn test_update_missing_and_unchanged_share_a_response() {
    let (server, _) = create_test_app();
    let token = login_token(&server).await;
    let created = create_book(&server, &token, json!({"title": "Emma"})).await;
    let id = created["_id"].as_str().unwrap();

    let missing = server
        .patch(&format!("/books/{}", uuid::Uuid::new_v4()))
        .add_header(header::AUTHORIZATION, auth_value(&token))
        .json(&json!({"title": "Persuasion"}))
        .await;
    let empty = server
        .patch(&format!("/books/{}", id))
        .add_header(header::AUTHORIZATION, auth_value(&token))
        .json(&json!({}))
        .await;
    let identical = server
        .patch(&format!("/books/{}", id))
        .add_header(header::AUTHORIZATION, auth_value(&token))
        .json(&json!({"title": "Emma"}))
        .await;

    let expected = json!({ "message": "Book not found or no changes made" });
    for response in [missing, empty, identical] {
        assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(response.json::<Value>(), expected);
    }
}

#[tokio::test]
async fn test_delete_then_delete_again() {
    let (server, store) = create_test_app();
    let token = login_token(&server).await;
    let created = create_book(&server, &token, json!({"title": "Emma"})).await;
    let path = format!("/books/{}", created["_id"].as_str().unwrap());

    let response = server
        .delete(&path)
        .add_header(header::AUTHORIZATION, auth_value(&token))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(
        response.json::<Value>(),
        json!({ "message": "Book deleted successfully" })
    );
    assert!(store.find_all("books").await.unwrap().is_empty());

    for _ in 0..2 {
        let response = server
            .delete(&path)
            .add_header(header::AUTHORIZATION, auth_value(&token))
            .await;
        assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(response.json::<Value>(), json!({ "message": "Book not found" }));
    }
}

// ============================================================================
// Connection check
// ============================================================================

#[tokio::test]
async fn test_check_connection_lists_collections() {
    let (server, _) = create_test_app();
    let token = login_token(&server).await;
    create_book(&server, &token, json!({"title": "Emma"})).await;

    let response = server.get("/check_connection").await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(
        response.json::<Value>(),
        json!({
            "message": "Connection to database successful!",
            "result": ["books", "users"]
        })
    );
}

#[tokio::test]
async fn test_openapi_document_is_served() {
    let (server, _) = create_test_app();

    let response = server.get("/api-docs/openapi.json").await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let doc: Value = response.json();
    assert!(doc["paths"]["/books/{id}"].is_object());
    assert!(doc["paths"]["/signup"].is_object());
}
