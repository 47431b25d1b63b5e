use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{error::ApiError, extractor::path::ApiPath, state::ApiState};

use super::book_store_error;

#[derive(Debug, Serialize, ToSchema)]
pub struct DeleteBookResponse {
    #[schema(example = "Book deleted")]
    pub message: String,
}

impl IntoResponse for DeleteBookResponse {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

#[utoipa::path(
    delete,
    path = "/books/{isbn}",
    params(("isbn" = String, Path, description = "Isbn of the book")),
    responses(
        (status = 200, description = "Book deleted", body = DeleteBookResponse),
        (status = 404, description = "No book with this isbn"),
    ),
    tag = "books"
)]
pub async fn delete_book(
    State(state): State<ApiState>,
    ApiPath(isbn): ApiPath<String>,
) -> Result<DeleteBookResponse, ApiError> {
    state
        .books()
        .delete(&isbn)
        .await
        .map_err(book_store_error(&state))?;

    tracing::info!(%isbn, "Book deleted");

    Ok(DeleteBookResponse {
        message: String::from("Book deleted"),
    })
}
