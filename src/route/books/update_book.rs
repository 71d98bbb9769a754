use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::{
    extractor::{json::ApiJson, path::IsbnPath, validated::Validated},
    state::ApiState,
    types::book::{Book, BookUpdate},
};

use super::{book_route_error, BookRouteError};

#[derive(Debug, Serialize, Deserialize)]
pub struct UpdateBookResponse {
    pub book: Book,
}

impl IntoResponse for UpdateBookResponse {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

pub async fn update_book(
    State(state): State<ApiState>,
    IsbnPath(isbn): IsbnPath,
    Validated(ApiJson(update)): Validated<ApiJson<BookUpdate>>,
) -> Result<UpdateBookResponse, BookRouteError> {
    let book = state
        .store()
        .update_book(&isbn, &update)
        .await
        .map_err(|err| book_route_error(&state, err))?;

    Ok(UpdateBookResponse { book })
}
