//! Persistence for [`Book`]s.
//!
//! [`BookStore`] owns the connection pool. It is opened once when the server
//! starts, shared through the application state and closed on shutdown.

use std::str::FromStr;

use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    SqlitePool,
};

use crate::{
    config::DatabaseConfig,
    types::book::{Book, BookUpdate},
    utils::is_in_memory_url,
};

mod error;

pub use error::StoreError;

const CREATE_BOOKS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS books (
    isbn TEXT PRIMARY KEY,
    amazon_url TEXT NOT NULL,
    author TEXT NOT NULL,
    language TEXT NOT NULL,
    pages INTEGER NOT NULL,
    publisher TEXT NOT NULL,
    title TEXT NOT NULL,
    year INTEGER NOT NULL
)
"#;

const BOOK_COLUMNS: &str = "isbn, amazon_url, author, language, pages, publisher, title, year";

#[derive(Debug, Clone)]
pub struct BookStore {
    pool: SqlitePool,
}

impl BookStore {
    #[tracing::instrument(name = "store_connect", skip_all, fields(max_connections = config.max_connections))]
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str(&config.url)?.create_if_missing(true);

        let pool_options = if is_in_memory_url(&config.url) {
            // Every connection to `:memory:` is a distinct database.
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(config.max_connections)
        };

        let pool = pool_options.connect_with(options).await?;

        tracing::debug!("Connected");

        Ok(Self { pool })
    }

    /// Creates the `books` table if it does not exist.
    pub async fn migrate(&self) -> Result<(), StoreError> {
        sqlx::query(CREATE_BOOKS_TABLE).execute(&self.pool).await?;

        tracing::debug!("Migrations complete");

        Ok(())
    }

    /// Returns all books in insertion order.
    #[tracing::instrument(skip_all)]
    pub async fn list_books(&self) -> Result<Vec<Book>, StoreError> {
        let books = sqlx::query_as::<_, Book>(&format!(
            "SELECT {BOOK_COLUMNS} FROM books ORDER BY rowid"
        ))
        .fetch_all(&self.pool)
        .await?;

        tracing::trace!(count = books.len(), "Listed books");

        Ok(books)
    }

    #[tracing::instrument(skip_all, fields(isbn = %isbn))]
    pub async fn get_book(&self, isbn: &str) -> Result<Book, StoreError> {
        sqlx::query_as::<_, Book>(&format!(
            "SELECT {BOOK_COLUMNS} FROM books WHERE isbn = ?"
        ))
        .bind(isbn)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| StoreError::NotFound {
            isbn: isbn.to_string(),
        })
    }

    #[tracing::instrument(skip_all, fields(isbn = %book.isbn))]
    pub async fn create_book(&self, book: &Book) -> Result<Book, StoreError> {
        sqlx::query(&format!(
            "INSERT INTO books ({BOOK_COLUMNS}) VALUES (?, ?, ?, ?, ?, ?, ?, ?)"
        ))
        .bind(&book.isbn)
        .bind(&book.amazon_url)
        .bind(&book.author)
        .bind(&book.language)
        .bind(book.pages)
        .bind(&book.publisher)
        .bind(&book.title)
        .bind(book.year)
        .execute(&self.pool)
        .await
        .map_err(|err| StoreError::from_insert(err, &book.isbn))?;

        tracing::debug!("Created book");

        Ok(book.clone())
    }

    #[tracing::instrument(skip_all, fields(isbn = %isbn))]
    pub async fn update_book(&self, isbn: &str, update: &BookUpdate) -> Result<Book, StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE books
            SET amazon_url = ?, author = ?, language = ?, pages = ?, publisher = ?, title = ?, year = ?
            WHERE isbn = ?
            "#,
        )
        .bind(&update.amazon_url)
        .bind(&update.author)
        .bind(&update.language)
        .bind(update.pages)
        .bind(&update.publisher)
        .bind(&update.title)
        .bind(update.year)
        .bind(isbn)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound {
                isbn: isbn.to_string(),
            });
        }

        tracing::debug!("Updated book");

        Ok(Book::from_update(isbn.to_string(), update.clone()))
    }

    #[tracing::instrument(skip_all, fields(isbn = %isbn))]
    pub async fn delete_book(&self, isbn: &str) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM books WHERE isbn = ?")
            .bind(isbn)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound {
                isbn: isbn.to_string(),
            });
        }

        tracing::debug!("Deleted book");

        Ok(())
    }

    /// Deletes every book. Used to isolate test scenarios.
    pub async fn clear_all(&self) -> Result<u64, StoreError> {
        let result = sqlx::query("DELETE FROM books").execute(&self.pool).await?;

        Ok(result.rows_affected())
    }

    /// Closes the pool. Subsequent calls are no-ops.
    pub async fn close(&self) {
        if self.pool.is_closed() {
            return;
        }

        self.pool.close().await;

        tracing::debug!("Closed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::book::sample_book;

    async fn store() -> BookStore {
        let store = BookStore::connect(&DatabaseConfig::in_memory())
            .await
            .expect("Failed to connect");

        store.migrate().await.expect("Failed to migrate");

        store
    }

    fn update() -> BookUpdate {
        BookUpdate {
            amazon_url: "http://a.co/updated".to_string(),
            author: "Someone Else".to_string(),
            language: "german".to_string(),
            pages: 320,
            publisher: "Other Publisher".to_string(),
            title: "Updated Title".to_string(),
            year: 1999,
        }
    }

    #[tokio::test]
    async fn empty_store_lists_nothing() {
        let store = store().await;

        let books = store.list_books().await.expect("Failed to list");

        assert!(books.is_empty());
    }

    #[tokio::test]
    async fn created_book_is_listed_once() {
        let store = store().await;
        let book = sample_book();

        let created = store.create_book(&book).await.expect("Failed to create");
        let books = store.list_books().await.expect("Failed to list");

        assert_eq!(created, book);
        assert_eq!(books, vec![book]);
    }

    #[tokio::test]
    async fn books_are_listed_in_insertion_order() {
        let store = store().await;
        let isbns = ["3", "1", "2"];

        for isbn in isbns {
            let book = Book {
                isbn: isbn.to_string(),
                ..sample_book()
            };

            store.create_book(&book).await.expect("Failed to create");
        }

        let listed: Vec<String> = store
            .list_books()
            .await
            .expect("Failed to list")
            .into_iter()
            .map(|book| book.isbn)
            .collect();

        assert_eq!(listed, isbns);
    }

    #[tokio::test]
    async fn duplicate_isbn_is_rejected() {
        let store = store().await;
        let book = sample_book();

        store.create_book(&book).await.expect("Failed to create");
        let err = store.create_book(&book).await.expect_err("Duplicate must fail");

        assert!(matches!(err, StoreError::DuplicateIsbn { isbn } if isbn == book.isbn));
        assert_eq!(store.list_books().await.expect("Failed to list").len(), 1);
    }

    #[tokio::test]
    async fn get_update_and_delete() {
        let store = store().await;
        let book = sample_book();

        store.create_book(&book).await.expect("Failed to create");

        let fetched = store.get_book(&book.isbn).await.expect("Failed to get");
        assert_eq!(fetched, book);

        let updated = store
            .update_book(&book.isbn, &update())
            .await
            .expect("Failed to update");
        assert_eq!(updated, Book::from_update(book.isbn.clone(), update()));
        assert_eq!(
            store.get_book(&book.isbn).await.expect("Failed to get"),
            updated
        );

        store.delete_book(&book.isbn).await.expect("Failed to delete");
        assert!(matches!(
            store.get_book(&book.isbn).await,
            Err(StoreError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn missing_book_is_not_found() {
        let store = store().await;

        assert!(matches!(
            store.update_book("missing", &update()).await,
            Err(StoreError::NotFound { .. })
        ));
        assert!(matches!(
            store.delete_book("missing").await,
            Err(StoreError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn clear_all_removes_every_book() {
        let store = store().await;

        for isbn in ["1", "2"] {
            let book = Book {
                isbn: isbn.to_string(),
                ..sample_book()
            };

            store.create_book(&book).await.expect("Failed to create");
        }

        let deleted = store.clear_all().await.expect("Failed to clear");

        assert_eq!(deleted, 2);
        assert!(store.list_books().await.expect("Failed to list").is_empty());
    }

    #[tokio::test]
    async fn close_is_idempotent_and_fails_later_queries() {
        let store = store().await;

        store.close().await;
        store.close().await;

        assert!(matches!(
            store.list_books().await,
            Err(StoreError::Database(_))
        ));
    }
}
