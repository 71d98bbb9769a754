use axum::{
    extract::rejection::PathRejection,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use derive_more::From;
use serde::{Deserialize, Serialize};
use validator::ValidationErrors;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum ErrorVerbosity {
    /// Server returns the appropriate status code with an empty JSON object.
    None,
    /// Server returns the appropriate status code and headers with an empty JSON object.
    StatusCode,
    /// Server returns only the message with the appropriate status code.
    Message,
    /// Server returns the message, the error type with cleared error content and the appropriate status code.
    Type,
    /// Server returns the message, the error type with the error content and the appropriate status code.
    Full,
}

impl ErrorVerbosity {
    pub fn should_generate_message(&self) -> bool {
        matches!(
            self,
            ErrorVerbosity::Message | ErrorVerbosity::Type | ErrorVerbosity::Full
        )
    }

    pub fn should_generate_error_reason(&self) -> bool {
        matches!(self, ErrorVerbosity::Full)
    }
}

pub trait ErrorVerbosityProvider {
    fn error_verbosity(&self) -> ErrorVerbosity;
}

/// Maps any error into an [`ApiError::InternalServerError`] using the verbosity of the given state.
///
/// ```ignore
/// state.store().list_books().await.map_err(server_error!(state))?;
/// ```
#[macro_export]
macro_rules! server_error {
    ($state:expr) => {
        |err| {
            $crate::error::ApiError::from(
                $crate::error::InternalServerError::from_generic_error(
                    $crate::error::ErrorVerbosityProvider::error_verbosity(&$state),
                    err,
                ),
            )
        }
    };
}

#[derive(Serialize)]
struct EmptyBody {}

/// Renders a status code, headers and a serializable body according to the given verbosity.
fn verbose_response<B, M>(
    verbosity: ErrorVerbosity,
    status_code: StatusCode,
    headers: HeaderMap,
    body: B,
    message: M,
) -> Response
where
    B: Serialize,
    M: Serialize,
{
    match verbosity {
        ErrorVerbosity::None => (status_code, Json(EmptyBody {})).into_response(),
        ErrorVerbosity::StatusCode => (status_code, headers, Json(EmptyBody {})).into_response(),
        ErrorVerbosity::Message => (status_code, headers, Json(message)).into_response(),
        ErrorVerbosity::Type | ErrorVerbosity::Full => {
            (status_code, headers, Json(body)).into_response()
        }
    }
}

#[derive(Debug, Serialize)]
struct ApiErrorResponse {
    #[serde(flatten)]
    error: ApiError,
    message: &'static str,
}

#[derive(Debug, Serialize)]
struct ApiErrorMessage {
    message: &'static str,
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        let verbosity = self.error.verbosity();
        let status_code = self.error.status_code();
        let message = ApiErrorMessage {
            message: self.message,
        };

        verbose_response(verbosity, status_code, HeaderMap::new(), self, message)
    }
}

#[derive(Debug, From, Serialize)]
#[serde(tag = "error_type", content = "error")]
/// API error
pub enum ApiError {
    /// Internal server error
    ///
    /// This error is returned when an internal server error occurs.
    InternalServerError(InternalServerError),
    /// Body error
    ///
    /// This error is returned when the body is not as expected.
    Body(BodyError),
    /// Path error
    ///
    /// This error is returned when the path is not as expected.
    Path(PathError),
    /// Validation error
    ///
    /// This error is returned when the extracted data is well formed but invalid.
    Validation(ValidationError),
    /// Method not allowed
    ///
    /// This error is returned when the method is not allowed.
    MethodNotAllowed(MethodNotAllowedError),
    /// Not found error
    ///
    /// This error is returned when the requested route is not found.
    NotFound(NotFoundError),
}

impl ApiError {
    fn verbosity(&self) -> ErrorVerbosity {
        match self {
            ApiError::InternalServerError(err) => err.verbosity,
            ApiError::Body(err) => err.verbosity,
            ApiError::Path(err) => err.verbosity,
            ApiError::Validation(err) => err.verbosity,
            ApiError::MethodNotAllowed(err) => err.verbosity,
            ApiError::NotFound(err) => err.verbosity,
        }
    }

    fn message(&self) -> &'static str {
        match self {
            ApiError::InternalServerError(_) => "An internal server error has occurred",
            ApiError::Body(_) => "Failed to parse request body",
            ApiError::Path(_) => "Failed to parse path parameters",
            ApiError::Validation(_) => "Validation failed",
            ApiError::MethodNotAllowed(_) => "Method not allowed",
            ApiError::NotFound(_) => "The requested resource was not found",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Body(_) => StatusCode::BAD_REQUEST,
            ApiError::Path(_) => StatusCode::BAD_REQUEST,
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
        }
    }
}

impl From<ApiError> for ApiErrorResponse {
    fn from(error: ApiError) -> Self {
        let message = match error.verbosity().should_generate_message() {
            true => error.message(),
            false => "",
        };

        ApiErrorResponse { error, message }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        ApiErrorResponse::from(self).into_response()
    }
}

#[derive(Debug, Serialize)]
pub struct InternalServerError {
    #[serde(skip)]
    verbosity: ErrorVerbosity,
    internal_server_error: Option<String>,
}

impl InternalServerError {
    pub fn from_generic_error<E: Into<anyhow::Error>>(verbosity: ErrorVerbosity, err: E) -> Self {
        let err: anyhow::Error = err.into();
        let err = format!("{err:#}");
        tracing::error!(%err, "Internal server error");

        let internal_server_error = verbosity.should_generate_error_reason().then_some(err);

        InternalServerError {
            verbosity,
            internal_server_error,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct BodyError {
    #[serde(skip)]
    verbosity: ErrorVerbosity,
    body_error_reason: Option<String>,
    body_expected_schema: Option<String>,
}

impl BodyError {
    pub fn new(
        verbosity: ErrorVerbosity,
        body_error_reason: String,
        body_expected_schema: String,
    ) -> Self {
        let (body_error_reason, body_expected_schema) =
            match verbosity.should_generate_error_reason() {
                true => (Some(body_error_reason), Some(body_expected_schema)),
                false => (None, None),
            };

        BodyError {
            verbosity,
            body_error_reason,
            body_expected_schema,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PathError {
    #[serde(skip)]
    verbosity: ErrorVerbosity,
    path_error_reason: Option<String>,
}

impl PathError {
    pub fn new(verbosity: ErrorVerbosity, path_error_reason: String) -> Self {
        let path_error_reason = verbosity
            .should_generate_error_reason()
            .then_some(path_error_reason);

        PathError {
            verbosity,
            path_error_reason,
        }
    }

    pub fn from_path_rejection(verbosity: ErrorVerbosity, rejection: PathRejection) -> Self {
        Self::new(verbosity, rejection.body_text())
    }
}

#[derive(Debug, Serialize)]
pub struct ValidationError {
    #[serde(skip)]
    verbosity: ErrorVerbosity,
    validation_errors: Option<ValidationErrors>,
}

impl ValidationError {
    pub fn from_validation_errors(verbosity: ErrorVerbosity, errors: ValidationErrors) -> Self {
        let validation_errors = verbosity.should_generate_error_reason().then_some(errors);

        ValidationError {
            verbosity,
            validation_errors,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MethodNotAllowedError {
    #[serde(skip)]
    verbosity: ErrorVerbosity,
}

impl MethodNotAllowedError {
    pub fn new(verbosity: ErrorVerbosity) -> Self {
        MethodNotAllowedError { verbosity }
    }
}

#[derive(Debug, Serialize)]
pub struct NotFoundError {
    #[serde(skip)]
    verbosity: ErrorVerbosity,
}

impl NotFoundError {
    pub fn new(verbosity: ErrorVerbosity) -> Self {
        NotFoundError { verbosity }
    }
}

/// Describes an error that is specific to a resource, like a missing or conflicting book.
pub trait ResourceErrorProvider: Serialize {
    type Context: Serialize + std::fmt::Debug;

    fn headers(&self) -> Option<HeaderMap>;

    fn status_code(&self) -> StatusCode;

    fn message(&self) -> &'static str;

    fn context(&self) -> Self::Context;
}

#[derive(Debug, Serialize)]
#[serde(bound(serialize = "T: ResourceErrorProvider"))]
pub struct ResourceError<T: ResourceErrorProvider> {
    #[serde(skip)]
    verbosity: ErrorVerbosity,
    #[serde(flatten)]
    error: T,
    message: &'static str,
    error_context: Option<T::Context>,
}

impl<T: ResourceErrorProvider> ResourceError<T> {
    pub fn new(verbosity: ErrorVerbosity, error: T) -> Self {
        let message = match verbosity.should_generate_message() {
            true => error.message(),
            false => "",
        };

        let error_context = verbosity
            .should_generate_error_reason()
            .then(|| error.context());

        ResourceError {
            verbosity,
            error,
            message,
            error_context,
        }
    }
}

impl<T: ResourceErrorProvider> IntoResponse for ResourceError<T> {
    fn into_response(self) -> Response {
        let status_code = self.error.status_code();
        let headers = self.error.headers().unwrap_or_default();
        let message = ApiErrorMessage {
            message: self.message,
        };

        verbose_response(self.verbosity, status_code, headers, self, message)
    }
}

/// Error returned by routes that can fail with either a generic [`ApiError`] or a [`ResourceError`].
#[derive(Debug)]
pub enum RouteError<T: ResourceErrorProvider> {
    Api(ApiError),
    Resource(ResourceError<T>),
}

impl<T: ResourceErrorProvider> From<ApiError> for RouteError<T> {
    fn from(error: ApiError) -> Self {
        RouteError::Api(error)
    }
}

impl<T: ResourceErrorProvider> From<ResourceError<T>> for RouteError<T> {
    fn from(error: ResourceError<T>) -> Self {
        RouteError::Resource(error)
    }
}

impl<T: ResourceErrorProvider> IntoResponse for RouteError<T> {
    fn into_response(self) -> Response {
        match self {
            RouteError::Api(error) => error.into_response(),
            RouteError::Resource(error) => error.into_response(),
        }
    }
}

#[cfg(test)]
mod tests {
    use http_body_util::BodyExt;
    use serde_json::Value;

    use super::*;

    async fn body_json(response: Response) -> Value {
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes();

        serde_json::from_slice(&bytes).expect("Body is not JSON")
    }

    #[tokio::test]
    async fn internal_server_error_is_500_and_hides_reason_below_full() {
        let error: ApiError =
            InternalServerError::from_generic_error(ErrorVerbosity::Type, anyhow::anyhow!("boom"))
                .into();
        let response = error.into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body_json(response).await;

        assert_eq!(body["error_type"], "InternalServerError");
        assert_eq!(body["error"]["internal_server_error"], Value::Null);
    }

    #[tokio::test]
    async fn full_verbosity_includes_reason() {
        let error: ApiError =
            InternalServerError::from_generic_error(ErrorVerbosity::Full, anyhow::anyhow!("boom"))
                .into();

        let body = body_json(error.into_response()).await;

        assert_eq!(body["error"]["internal_server_error"], "boom");
        assert_eq!(body["message"], "An internal server error has occurred");
    }

    #[tokio::test]
    async fn message_verbosity_only_returns_message() {
        let error: ApiError = NotFoundError::new(ErrorVerbosity::Message).into();
        let response = error.into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body = body_json(response).await;

        assert_eq!(
            body,
            serde_json::json!({ "message": "The requested resource was not found" })
        );
    }

    #[tokio::test]
    async fn low_verbosity_keeps_status_and_sends_empty_json() {
        for verbosity in [ErrorVerbosity::None, ErrorVerbosity::StatusCode] {
            let error: ApiError = MethodNotAllowedError::new(verbosity).into();
            let response = error.into_response();

            assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
            assert_eq!(body_json(response).await, serde_json::json!({}));
        }
    }

    #[test]
    fn body_and_validation_errors_are_400() {
        let body: ApiError =
            BodyError::new(ErrorVerbosity::Full, "reason".into(), "schema".into()).into();
        let validation: ApiError =
            ValidationError::from_validation_errors(ErrorVerbosity::Full, ValidationErrors::new())
                .into();

        assert_eq!(body.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(validation.status_code(), StatusCode::BAD_REQUEST);
    }
}
