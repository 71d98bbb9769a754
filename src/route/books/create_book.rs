use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::{
    extractor::{json::ApiJson, validated::Validated},
    state::ApiState,
    types::book::Book,
};

use super::{book_route_error, BookRouteError};

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateBookResponse {
    pub book: Book,
}

impl IntoResponse for CreateBookResponse {
    fn into_response(self) -> Response {
        (StatusCode::CREATED, Json(self)).into_response()
    }
}

/// Only reached once the body is a complete and valid [`Book`].
pub async fn create_book(
    State(state): State<ApiState>,
    Validated(ApiJson(book)): Validated<ApiJson<Book>>,
) -> Result<CreateBookResponse, BookRouteError> {
    let book = state
        .store()
        .create_book(&book)
        .await
        .map_err(|err| book_route_error(&state, err))?;

    Ok(CreateBookResponse { book })
}
