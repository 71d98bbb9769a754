use axum::http::{HeaderMap, StatusCode};
use serde::Serialize;

use crate::{
    error::{
        ApiError, ErrorVerbosityProvider, InternalServerError, ResourceError, ResourceErrorProvider,
        RouteError,
    },
    state::ApiState,
    store::StoreError,
};

pub mod app;
pub mod create_book;
pub mod delete_book;
pub mod get_book;
pub mod list_books;
pub mod update_book;

#[derive(Debug, Serialize)]
#[serde(tag = "error_type")]
pub enum BookErrorType {
    NotFound {
        #[serde(skip)]
        isbn: String,
    },
    DuplicateIsbn {
        #[serde(skip)]
        isbn: String,
    },
}

#[derive(Debug, Serialize)]
pub struct BookErrorContext {
    pub reason: String,
}

impl ResourceErrorProvider for BookErrorType {
    type Context = BookErrorContext;

    fn headers(&self) -> Option<HeaderMap> {
        None
    }

    fn status_code(&self) -> StatusCode {
        match self {
            BookErrorType::NotFound { .. } => StatusCode::NOT_FOUND,
            BookErrorType::DuplicateIsbn { .. } => StatusCode::CONFLICT,
        }
    }

    fn message(&self) -> &'static str {
        match self {
            BookErrorType::NotFound { .. } => "Book not found",
            BookErrorType::DuplicateIsbn { .. } => "Book already exists",
        }
    }

    fn context(&self) -> Self::Context {
        match self {
            BookErrorType::NotFound { isbn } => BookErrorContext {
                reason: format!("Book with isbn {isbn} not found"),
            },
            BookErrorType::DuplicateIsbn { isbn } => BookErrorContext {
                reason: format!("Book with isbn {isbn} already exists"),
            },
        }
    }
}

pub type BookRouteError = RouteError<BookErrorType>;

/// Maps store failures to route errors: domain failures keep their own status, the rest are 500s.
pub(crate) fn book_route_error(state: &ApiState, err: StoreError) -> BookRouteError {
    let verbosity = state.error_verbosity();

    match err {
        StoreError::NotFound { isbn } => {
            ResourceError::new(verbosity, BookErrorType::NotFound { isbn }).into()
        }
        StoreError::DuplicateIsbn { isbn } => {
            ResourceError::new(verbosity, BookErrorType::DuplicateIsbn { isbn }).into()
        }
        err @ StoreError::Database(_) => {
            ApiError::from(InternalServerError::from_generic_error(verbosity, err)).into()
        }
    }
}
