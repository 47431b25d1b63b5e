use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{error::ApiError, extractor::path::ApiPath, state::ApiState, storage::Book};

use super::book_store_error;

#[derive(Debug, Serialize, ToSchema)]
pub struct GetBookResponse {
    pub book: Book,
}

impl IntoResponse for GetBookResponse {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

#[utoipa::path(
    get,
    path = "/books/{isbn}",
    params(("isbn" = String, Path, description = "Isbn of the book")),
    responses(
        (status = 200, description = "The book", body = GetBookResponse),
        (status = 404, description = "No book with this isbn"),
    ),
    tag = "books"
)]
pub async fn get_book(
    State(state): State<ApiState>,
    ApiPath(isbn): ApiPath<String>,
) -> Result<GetBookResponse, ApiError> {
    let book = state
        .books()
        .get(&isbn)
        .await
        .map_err(book_store_error(&state))?;

    Ok(GetBookResponse { book })
}
