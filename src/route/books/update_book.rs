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
    extractor::{json::ApiJson, path::ApiPath, validated::Validated},
    state::ApiState,
    storage::Book,
};

use super::book_store_error;

#[derive(Debug, Serialize, ToSchema)]
pub struct UpdateBookResponse {
    pub book: Book,
}

impl IntoResponse for UpdateBookResponse {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

/// Replaces the book stored under `isbn`.
///
/// The `isbn` of the body is ignored, a book can not be moved to another isbn.
#[utoipa::path(
    put,
    path = "/books/{isbn}",
    params(("isbn" = String, Path, description = "Isbn of the book")),
    request_body = Book,
    responses(
        (status = 200, description = "The updated book", body = UpdateBookResponse),
        (status = 400, description = "Body does not match the book schema"),
        (status = 404, description = "No book with this isbn"),
    ),
    tag = "books"
)]
pub async fn update_book(
    State(state): State<ApiState>,
    ApiPath(isbn): ApiPath<String>,
    Validated(ApiJson(book)): Validated<ApiJson<Book>>,
) -> Result<UpdateBookResponse, ApiError> {
    let book = state
        .books()
        .update(&isbn, &book)
        .await
        .map_err(book_store_error(&state))?;

    tracing::info!(%isbn, "Book updated");

    Ok(UpdateBookResponse { book })
}
