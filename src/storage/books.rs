use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::{Validate, ValidationErrors};

use super::Database;

#[derive(
    Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema, ToSchema, Validate, FromRow,
)]
#[serde(deny_unknown_fields)]
pub struct Book {
    #[validate(length(min = 1))]
    #[schema(example = "0691161518")]
    pub isbn: String,
    #[validate(url)]
    #[schema(example = "http://a.co/eobPtX2")]
    pub amazon_url: String,
    #[validate(length(min = 1))]
    #[schema(example = "Matthew Lane")]
    pub author: String,
    #[validate(length(min = 1))]
    #[schema(example = "english")]
    pub language: String,
    #[validate(range(min = 1))]
    #[schema(example = 264)]
    pub pages: i32,
    #[validate(length(min = 1))]
    #[schema(example = "Princeton University Press")]
    pub publisher: String,
    #[validate(length(min = 1))]
    #[schema(example = "Power-Up: Unlocking the Hidden Mathematics in Video Games")]
    pub title: String,
    #[schema(example = 2017)]
    pub year: i32,
}

#[derive(Debug, thiserror::Error)]
pub enum BookStoreError {
    #[error("Book with isbn `{isbn}` not found")]
    NotFound { isbn: String },
    #[error("Book with isbn `{isbn}` already exists")]
    AlreadyExists { isbn: String },
    #[error("Invalid book: {0}")]
    Invalid(#[from] ValidationErrors),
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Book resource manager.
///
/// Every operation is a single statement against the pool.
#[derive(Debug, Clone)]
pub struct BookStore {
    db: Database,
}

impl BookStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// All books ordered by title.
    pub async fn list(&self) -> Result<Vec<Book>, BookStoreError> {
        let books = sqlx::query_as::<_, Book>("SELECT * FROM books ORDER BY title, isbn")
            .fetch_all(self.db.pool())
            .await?;

        Ok(books)
    }

    pub async fn get(&self, isbn: &str) -> Result<Book, BookStoreError> {
        sqlx::query_as::<_, Book>("SELECT * FROM books WHERE isbn = ?")
            .bind(isbn)
            .fetch_optional(self.db.pool())
            .await?
            .ok_or_else(|| BookStoreError::NotFound {
                isbn: isbn.to_string(),
            })
    }

    #[tracing::instrument(skip_all, fields(isbn = %book.isbn))]
    pub async fn create(&self, book: &Book) -> Result<Book, BookStoreError> {
        book.validate()?;

        let created = sqlx::query_as::<_, Book>(
            r#"
            INSERT INTO books (isbn, amazon_url, author, language, pages, publisher, title, year)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT (isbn) DO NOTHING
            RETURNING *
            "#,
        )
        .bind(&book.isbn)
        .bind(&book.amazon_url)
        .bind(&book.author)
        .bind(&book.language)
        .bind(book.pages)
        .bind(&book.publisher)
        .bind(&book.title)
        .bind(book.year)
        .fetch_optional(self.db.pool())
        .await?
        .ok_or_else(|| BookStoreError::AlreadyExists {
            isbn: book.isbn.clone(),
        })?;

        Ok(created)
    }

    /// Overwrites every field of the book stored under `isbn`.
    ///
    /// The key is taken from `isbn`, `book.isbn` is never written.
    #[tracing::instrument(skip(self, book))]
    pub async fn update(&self, isbn: &str, book: &Book) -> Result<Book, BookStoreError> {
        book.validate()?;

        let updated = sqlx::query_as::<_, Book>(
            r#"
            UPDATE books
            SET amazon_url = ?, author = ?, language = ?, pages = ?, publisher = ?, title = ?, year = ?
            WHERE isbn = ?
            RETURNING *
            "#,
        )
        .bind(&book.amazon_url)
        .bind(&book.author)
        .bind(&book.language)
        .bind(book.pages)
        .bind(&book.publisher)
        .bind(&book.title)
        .bind(book.year)
        .bind(isbn)
        .fetch_optional(self.db.pool())
        .await?
        .ok_or_else(|| BookStoreError::NotFound {
            isbn: isbn.to_string(),
        })?;

        Ok(updated)
    }

    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, isbn: &str) -> Result<(), BookStoreError> {
        let result = sqlx::query("DELETE FROM books WHERE isbn = ?")
            .bind(isbn)
            .execute(self.db.pool())
            .await?;

        if result.rows_affected() == 0 {
            return Err(BookStoreError::NotFound {
                isbn: isbn.to_string(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn power_up() -> Book {
        Book {
            isbn: "0691161518".to_string(),
            amazon_url: "http://a.co/eobPtX2".to_string(),
            author: "Matthew Lane".to_string(),
            language: "english".to_string(),
            pages: 264,
            publisher: "Princeton University Press".to_string(),
            title: "Power-Up: Unlocking the Hidden Mathematics in Video Games".to_string(),
            year: 2017,
        }
    }

    async fn store() -> BookStore {
        BookStore::new(
            Database::new_in_memory()
                .await
                .expect("In-memory database failed"),
        )
    }

    #[tokio::test]
    async fn created_book_can_be_fetched() {
        let store = store().await;
        let book = power_up();

        let created = store.create(&book).await.expect("Create failed");
        assert_eq!(created, book);

        let fetched = store.get(&book.isbn).await.expect("Get failed");
        assert_eq!(fetched, book);
    }

    #[tokio::test]
    async fn list_is_empty_then_ordered_by_title() {
        let store = store().await;
        assert!(store.list().await.expect("List failed").is_empty());

        let first = power_up();
        let second = Book {
            isbn: "0000000001".to_string(),
            title: "A Book That Sorts First".to_string(),
            ..power_up()
        };

        store.create(&first).await.expect("Create failed");
        store.create(&second).await.expect("Create failed");

        let books = store.list().await.expect("List failed");
        assert_eq!(books, vec![second, first]);
    }

    #[tokio::test]
    async fn duplicate_isbn_is_rejected() {
        let store = store().await;
        store.create(&power_up()).await.expect("Create failed");

        let err = store.create(&power_up()).await.unwrap_err();
        assert!(matches!(err, BookStoreError::AlreadyExists { isbn } if isbn == "0691161518"));
    }

    #[tokio::test]
    async fn invalid_book_is_rejected_before_insert() {
        let store = store().await;
        let book = Book {
            amazon_url: "not a url".to_string(),
            pages: 0,
            ..power_up()
        };

        let err = store.create(&book).await.unwrap_err();
        match err {
            BookStoreError::Invalid(errors) => {
                let fields = errors.field_errors();
                assert!(fields.contains_key("amazon_url"));
                assert!(fields.contains_key("pages"));
            }
            other => panic!("Unexpected error: {other:?}"),
        }

        assert!(store.list().await.expect("List failed").is_empty());
    }

    #[tokio::test]
    async fn update_overwrites_fields_but_keeps_isbn() {
        let store = store().await;
        store.create(&power_up()).await.expect("Create failed");

        let changes = Book {
            isbn: "ignored".to_string(),
            author: "Updated Name".to_string(),
            ..power_up()
        };

        let updated = store
            .update("0691161518", &changes)
            .await
            .expect("Update failed");

        assert_eq!(updated.isbn, "0691161518");
        assert_eq!(updated.author, "Updated Name");
        assert_eq!(store.get("0691161518").await.expect("Get failed"), updated);
        assert!(matches!(
            store.get("ignored").await,
            Err(BookStoreError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn missing_isbn_is_not_found() {
        let store = store().await;

        assert!(matches!(
            store.get("0").await,
            Err(BookStoreError::NotFound { .. })
        ));
        assert!(matches!(
            store.update("0", &power_up()).await,
            Err(BookStoreError::NotFound { .. })
        ));
        assert!(matches!(
            store.delete("0").await,
            Err(BookStoreError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn deleted_book_is_gone() {
        let store = store().await;
        store.create(&power_up()).await.expect("Create failed");

        store.delete("0691161518").await.expect("Delete failed");

        assert!(matches!(
            store.get("0691161518").await,
            Err(BookStoreError::NotFound { .. })
        ));
    }
}
