use axum::{routing::get, Router};

use crate::state::ApiState;

use super::{create_book, delete_book, get_book, list_books, update_book};

pub fn app() -> Router<ApiState> {
    Router::<ApiState>::new()
        .route(
            "/books",
            get(list_books::list_books).post(create_book::create_book),
        )
        .route(
            "/books/:isbn",
            get(get_book::get_book)
                .put(update_book::update_book)
                .delete(delete_book::delete_book),
        )
}
