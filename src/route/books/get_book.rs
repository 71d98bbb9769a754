use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::{extractor::path::IsbnPath, state::ApiState, types::book::Book};

use super::{book_route_error, BookRouteError};

#[derive(Debug, Serialize, Deserialize)]
pub struct GetBookResponse {
    pub book: Book,
}

impl IntoResponse for GetBookResponse {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

pub async fn get_book(
    State(state): State<ApiState>,
    IsbnPath(isbn): IsbnPath,
) -> Result<GetBookResponse, BookRouteError> {
    let book = state
        .store()
        .get_book(&isbn)
        .await
        .map_err(|err| book_route_error(&state, err))?;

    Ok(GetBookResponse { book })
}
