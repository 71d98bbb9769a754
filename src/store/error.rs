use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("A book with isbn `{isbn}` already exists")]
    DuplicateIsbn { isbn: String },
    #[error("No book with isbn `{isbn}`")]
    NotFound { isbn: String },
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl StoreError {
    /// Maps unique constraint violations on insert to [`StoreError::DuplicateIsbn`].
    pub(super) fn from_insert(err: sqlx::Error, isbn: &str) -> Self {
        match &err {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                StoreError::DuplicateIsbn {
                    isbn: isbn.to_string(),
                }
            }
            _ => StoreError::Database(err),
        }
    }
}
