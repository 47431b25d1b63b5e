use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{error::ApiError, state::ApiState, storage::Book};

use super::book_store_error;

#[derive(Debug, Serialize, ToSchema)]
pub struct ListBooksResponse {
    pub books: Vec<Book>,
}

impl IntoResponse for ListBooksResponse {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

/// Lists all books ordered by title.
#[utoipa::path(
    get,
    path = "/books",
    responses(
        (status = 200, description = "All books", body = ListBooksResponse),
    ),
    tag = "books"
)]
pub async fn list_books(State(state): State<ApiState>) -> Result<ListBooksResponse, ApiError> {
    let books = state.books().list().await.map_err(book_store_error(&state))?;

    Ok(ListBooksResponse { books })
}
