use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::{extractor::path::IsbnPath, state::ApiState};

use super::{book_route_error, BookRouteError};

#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteBookResponse {
    pub message: String,
}

impl IntoResponse for DeleteBookResponse {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

pub async fn delete_book(
    State(state): State<ApiState>,
    IsbnPath(isbn): IsbnPath,
) -> Result<DeleteBookResponse, BookRouteError> {
    state
        .store()
        .delete_book(&isbn)
        .await
        .map_err(|err| book_route_error(&state, err))?;

    Ok(DeleteBookResponse {
        message: "Book deleted".to_string(),
    })
}
