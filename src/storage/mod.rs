//! SQLite backed persistence.
//!
//! [`Database`] owns the connection pool and applies migrations on connect.
//! [`BookStore`] is the book resource manager the HTTP routes talk to.

mod books;
mod database;
mod migrations;

pub use books::{Book, BookStore, BookStoreError};
pub use database::Database;
