use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use crate::{
    error::ErrorVerbosity,
    server::{router, ServerConfig},
    state::ApiState,
    storage::{Book, BookStore, Database},
};

fn power_up() -> Value {
    json!({
        "isbn": "0691161518",
        "amazon_url": "http://a.co/eobPtX2",
        "author": "Matthew Lane",
        "language": "english",
        "pages": 264,
        "publisher": "Princeton University Press",
        "title": "Power-Up: Unlocking the Hidden Mathematics in Video Games",
        "year": 2017
    })
}

fn new_book() -> Value {
    json!({
        "isbn": "069345234",
        "amazon_url": "http://a.co/eobPtX2",
        "author": "Diana Huang",
        "language": "english",
        "pages": 2311,
        "publisher": "Princeton University Press",
        "title": "Power-Up: Unlocking the Hidden Mathematics in Video Games",
        "year": 2022
    })
}

async fn app(error_verbosity: ErrorVerbosity) -> Router {
    app_with_tracing(error_verbosity, false).await
}

async fn app_with_tracing(error_verbosity: ErrorVerbosity, trace_bodies: bool) -> Router {
    let store = BookStore::new(
        Database::new_in_memory()
            .await
            .expect("In-memory database failed"),
    );

    let book: Book = serde_json::from_value(power_up()).expect("Fixture is not a book");
    store.create(&book).await.expect("Seeding failed");

    router(ApiState::new(error_verbosity, store), trace_bodies)
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);

    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("Invalid request");

    let response = app.clone().oneshot(request).await.expect("Request failed");
    let status = response.status();

    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("Failed to read body")
        .to_bytes();

    let body = match bytes.is_empty() {
        true => Value::Null,
        false => serde_json::from_slice(&bytes).expect("Body is not JSON"),
    };

    (status, body)
}

#[tokio::test]
async fn example_config_is_valid() {
    ServerConfig::from_config_file("config.example.yaml")
        .await
        .expect("Example config is not parsable");
}

#[tokio::test]
async fn lists_books() {
    let app = app(ErrorVerbosity::Full).await;

    let (status, body) = send(&app, Method::GET, "/books", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "books": [power_up()] }));
}

#[tokio::test]
async fn gets_a_single_book() {
    let app = app(ErrorVerbosity::Full).await;

    let (status, body) = send(&app, Method::GET, "/books/0691161518", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "book": power_up() }));
}

#[tokio::test]
async fn get_unknown_isbn_is_not_found() {
    let app = app(ErrorVerbosity::Full).await;

    let (status, body) = send(&app, Method::GET, "/books/dfasdf", None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error_type"], "Book");
    assert_eq!(body["message"], "Book not found");
    assert_eq!(
        body["error"]["book_error_reason"],
        "Book with isbn `dfasdf` not found"
    );
}

#[tokio::test]
async fn creates_a_book_that_can_be_fetched() {
    let app = app(ErrorVerbosity::Full).await;

    let (status, body) = send(&app, Method::POST, "/books", Some(new_book())).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body, json!({ "book": new_book() }));

    let (status, body) = send(&app, Method::GET, "/books/069345234", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "book": new_book() }));
}

#[tokio::test]
async fn create_with_wrong_type_is_bad_request() {
    let app = app(ErrorVerbosity::Full).await;

    let mut book = new_book();
    book["author"] = json!(345);

    let (status, body) = send(&app, Method::POST, "/books", Some(book)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error_type"], "Body");
    assert!(body["error"]["body_expected_schema"].is_string());
}

#[tokio::test]
async fn create_with_missing_fields_is_bad_request() {
    let app = app(ErrorVerbosity::Full).await;

    let mut book = new_book();
    let fields = book.as_object_mut().expect("Fixture is an object");
    fields.remove("author");
    fields.remove("language");

    let (status, body) = send(&app, Method::POST, "/books", Some(book)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error_type"], "Body");

    let (_, body) = send(&app, Method::GET, "/books", None).await;
    assert_eq!(body["books"].as_array().map(Vec::len), Some(1));
}

#[tokio::test]
async fn create_with_unknown_field_is_bad_request() {
    let app = app(ErrorVerbosity::Full).await;

    let mut book = new_book();
    book["edition"] = json!(2);

    let (status, _) = send(&app, Method::POST, "/books", Some(book)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn create_with_invalid_content_is_bad_request() {
    let app = app(ErrorVerbosity::Full).await;

    let mut book = new_book();
    book["amazon_url"] = json!("not a url");
    book["pages"] = json!(0);

    let (status, body) = send(&app, Method::POST, "/books", Some(book)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error_type"], "Validation");
    assert!(body["error"]["validation_errors"]["amazon_url"].is_array());
    assert!(body["error"]["validation_errors"]["pages"].is_array());
}

#[tokio::test]
async fn create_with_existing_isbn_is_conflict() {
    let app = app(ErrorVerbosity::Full).await;

    let (status, body) = send(&app, Method::POST, "/books", Some(power_up())).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "Book already exists");
}

#[tokio::test]
async fn updates_a_book() {
    let app = app(ErrorVerbosity::Full).await;

    let mut updated = power_up();
    updated["author"] = json!("Updated Name");

    let (status, body) = send(&app, Method::PUT, "/books/0691161518", Some(updated.clone())).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "book": updated }));

    let (_, body) = send(&app, Method::GET, "/books/0691161518", None).await;
    assert_eq!(body, json!({ "book": updated }));
}

#[tokio::test]
async fn update_unknown_isbn_is_not_found() {
    let app = app(ErrorVerbosity::Full).await;

    let (status, body) = send(&app, Method::PUT, "/books/0", Some(power_up())).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error_type"], "Book");
}

#[tokio::test]
async fn update_with_wrong_type_is_bad_request() {
    let app = app(ErrorVerbosity::Full).await;

    let mut updated = power_up();
    updated["year"] = json!("2017");

    let (status, _) = send(&app, Method::PUT, "/books/0691161518", Some(updated)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn deletes_a_book() {
    let app = app(ErrorVerbosity::Full).await;

    let (status, body) = send(&app, Method::DELETE, "/books/0691161518", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "message": "Book deleted" }));

    let (status, _) = send(&app, Method::GET, "/books/0691161518", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, Method::DELETE, "/books/0691161518", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn unknown_route_is_not_found() {
    let app = app(ErrorVerbosity::Full).await;

    let (status, body) = send(&app, Method::GET, "/authors", None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error_type"], "NotFound");
}

#[tokio::test]
async fn wrong_method_is_not_allowed() {
    let app = app(ErrorVerbosity::Full).await;

    let (status, body) = send(&app, Method::PATCH, "/books", None).await;

    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(body["error_type"], "MethodNotAllowed");
}

#[tokio::test]
async fn message_verbosity_only_renders_the_message() {
    let app = app(ErrorVerbosity::Message).await;

    let (status, body) = send(&app, Method::GET, "/books/0", None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "message": "Book not found" }));
}

#[tokio::test]
async fn type_verbosity_hides_the_reason() {
    let app = app(ErrorVerbosity::Type).await;

    let (status, body) = send(&app, Method::GET, "/books/0", None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error_type"], "Book");
    assert!(body["error"]["book_error_reason"].is_null());
}

#[tokio::test]
async fn none_verbosity_keeps_status_code() {
    let app = app(ErrorVerbosity::None).await;

    let (status, body) = send(&app, Method::GET, "/books/missing", None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, Value::Null);

    let mut book = new_book();
    book["author"] = json!(345);

    let (status, body) = send(&app, Method::POST, "/books", Some(book)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, Value::Null);
}

#[tokio::test]
async fn traced_bodies_reach_the_client_unchanged() {
    let app = app_with_tracing(ErrorVerbosity::Full, true).await;

    let (status, body) = send(&app, Method::GET, "/books", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "books": [power_up()] }));

    let (status, body) = send(&app, Method::POST, "/books", Some(new_book())).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body, json!({ "book": new_book() }));

    let (status, body) = send(&app, Method::GET, "/books/missing", None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Book not found");
}

#[tokio::test]
async fn integers_written_as_floats_are_bad_request() {
    let app = app(ErrorVerbosity::Full).await;

    let mut book = new_book();
    book["pages"] = json!(2311.0);

    let (status, body) = send(&app, Method::POST, "/books", Some(book)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error_type"], "Body");
}

#[tokio::test]
async fn serves_openapi_document() {
    let app = app(ErrorVerbosity::Full).await;

    let (status, body) = send(&app, Method::GET, "/api-docs/openapi.json", None).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"]["/books"].is_object());
    assert!(body["paths"]["/books/{isbn}"].is_object());
}
