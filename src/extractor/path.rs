use axum::{
    async_trait,
    extract::{FromRequestParts, Path as AxumPath},
    http::request::Parts,
};
use serde::Deserialize;

use crate::error::{ApiError, ErrorVerbosityProvider, PathError};

use super::Extractor;

#[derive(Deserialize)]
struct IsbnParams {
    isbn: String,
}

/// The `:isbn` segment of a `/books/:isbn` route.
///
/// Rejects with a [`PathError`] when the route has no `isbn` parameter.
pub struct IsbnPath(pub String);

#[async_trait]
impl<S> FromRequestParts<S> for IsbnPath
where
    S: Send + Sync + ErrorVerbosityProvider,
{
    type Rejection = ApiError;

    #[tracing::instrument(name = "isbn_path_extractor", skip_all, fields(isbn))]
    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let AxumPath(IsbnParams { isbn }) =
            AxumPath::<IsbnParams>::from_request_parts(parts, state)
                .await
                .map_err(|rejection| {
                    tracing::warn!(?rejection, "Rejection");

                    PathError::from_path_rejection(state.error_verbosity(), rejection)
                })?;

        tracing::Span::current().record("isbn", isbn.as_str());
        tracing::trace!(%isbn, "Extracted");

        Ok(IsbnPath(isbn))
    }
}

impl Extractor for IsbnPath {
    type Extracted = String;

    fn extracted(&self) -> &Self::Extracted {
        &self.0
    }
}
