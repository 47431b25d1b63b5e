use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::ApiError,
    extractor::{json::ApiJson, validated::Validated},
    state::ApiState,
    storage::Book,
};

use super::book_store_error;

#[derive(Debug, Serialize, ToSchema)]
pub struct CreateBookResponse {
    pub book: Book,
}

impl IntoResponse for CreateBookResponse {
    fn into_response(self) -> Response {
        (StatusCode::CREATED, Json(self)).into_response()
    }
}

#[utoipa::path(
    post,
    path = "/books",
    request_body = Book,
    responses(
        (status = 201, description = "The stored book", body = CreateBookResponse),
        (status = 400, description = "Body does not match the book schema"),
        (status = 409, description = "A book with this isbn already exists"),
    ),
    tag = "books"
)]
pub async fn create_book(
    State(state): State<ApiState>,
    Validated(ApiJson(book)): Validated<ApiJson<Book>>,
) -> Result<CreateBookResponse, ApiError> {
    let book = state
        .books()
        .create(&book)
        .await
        .map_err(book_store_error(&state))?;

    tracing::info!(isbn = %book.isbn, "Book created");

    Ok(CreateBookResponse { book })
}
