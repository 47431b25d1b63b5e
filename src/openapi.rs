use axum::{routing::get, Json, Router};
use utoipa::OpenApi;

use crate::{
    route::books::{
        create_book::{self, CreateBookResponse},
        delete_book::{self, DeleteBookResponse},
        get_book::{self, GetBookResponse},
        list_books::{self, ListBooksResponse},
        update_book::{self, UpdateBookResponse},
    },
    state::ApiState,
    storage::Book,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        list_books::list_books,
        get_book::get_book,
        create_book::create_book,
        update_book::update_book,
        delete_book::delete_book,
    ),
    components(schemas(
        Book,
        ListBooksResponse,
        GetBookResponse,
        CreateBookResponse,
        UpdateBookResponse,
        DeleteBookResponse,
    )),
    tags((name = "books", description = "Book records keyed by isbn"))
)]
pub struct ApiDoc;

pub fn app() -> Router<ApiState> {
    Router::<ApiState>::new().route(
        "/api-docs/openapi.json",
        get(|| async { Json(ApiDoc::openapi()) }),
    )
}
