use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::{
    error::{ApiError, ErrorVerbosityProvider, MethodNotAllowedError},
    state::ApiState,
};

/// Middleware to map axum's empty `405` response to our [`ApiError`].
///
/// The `Allow` header set by the router is carried over.
pub async fn method_not_allowed(State(state): State<ApiState>, req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let resp = next.run(req).await;

    if resp.status() != StatusCode::METHOD_NOT_ALLOWED {
        return resp;
    }

    let allow = resp.headers().get(header::ALLOW).cloned();
    tracing::debug!(%method, ?allow, "Method not allowed");

    let mut error_resp =
        ApiError::from(MethodNotAllowedError::new(state.error_verbosity())).into_response();

    if let Some(allow) = allow {
        error_resp.headers_mut().insert(header::ALLOW, allow);
    }

    error_resp
}
