use crate::{
    error::{ApiError, ErrorVerbosityProvider},
    state::ApiState,
    storage::BookStoreError,
};

pub mod app;
pub mod create_book;
pub mod delete_book;
pub mod get_book;
pub mod list_books;
pub mod update_book;

/// Maps a [`BookStoreError`] to an [`ApiError`] using the verbosity of `state`.
fn book_store_error(state: &ApiState) -> impl FnOnce(BookStoreError) -> ApiError {
    let verbosity = state.error_verbosity();

    move |err| ApiError::from_book_store_error(verbosity, err)
}
