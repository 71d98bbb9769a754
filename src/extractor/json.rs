use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Json as AxumJson, Request},
};
use schemars::{schema_for, JsonSchema};
use serde::de::DeserializeOwned;

use crate::error::{
    ApiError, BodyError, ErrorVerbosity, ErrorVerbosityProvider, InternalServerError,
};

use super::Extractor;

/// A JSON body extractor that rejects with an [`ApiError`] instead of axum's plain text.
///
/// Missing fields, wrong types, malformed JSON and a missing `Content-Type` all become a
/// `400` [`BodyError`]. The expected schema is only rendered when the verbosity will show it.
pub struct ApiJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned + JsonSchema + Send,
    S: Send + Sync + ErrorVerbosityProvider,
{
    type Rejection = ApiError;

    #[tracing::instrument(name = "json_extractor", skip_all)]
    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match AxumJson::<T>::from_request(req, state).await {
            Ok(AxumJson(value)) => Ok(ApiJson(value)),
            Err(rejection) => Err(body_error::<T>(state.error_verbosity(), rejection)),
        }
    }
}

fn body_error<T: JsonSchema>(verbosity: ErrorVerbosity, rejection: JsonRejection) -> ApiError {
    tracing::warn!(status = %rejection.status(), reason = %rejection.body_text(), "Rejected body");

    if !verbosity.should_generate_error_reason() {
        return BodyError::new(verbosity, String::new(), String::new()).into();
    }

    match serde_yaml::to_string(&schema_for!(T)) {
        Ok(schema) => BodyError::new(verbosity, rejection.body_text(), schema).into(),
        Err(err) => InternalServerError::from_generic_error(verbosity, err).into(),
    }
}

impl<T> Extractor for ApiJson<T> {
    type Extracted = T;

    fn extracted(&self) -> &Self::Extracted {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{self, header, StatusCode},
    };
    use serde_json::Value;

    use super::*;
    use crate::types::book::Book;

    struct Verbosity(ErrorVerbosity);

    impl ErrorVerbosityProvider for Verbosity {
        fn error_verbosity(&self) -> ErrorVerbosity {
            self.0
        }
    }

    fn request(body: &str) -> Request {
        http::Request::builder()
            .method("POST")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_owned()))
            .expect("Failed to build request")
    }

    async fn extract(req: Request, state: &Verbosity) -> Result<ApiJson<Book>, ApiError> {
        <ApiJson<Book> as FromRequest<Verbosity>>::from_request(req, state).await
    }

    #[tokio::test]
    async fn full_verbosity_reports_reason_and_schema() {
        let state = Verbosity(ErrorVerbosity::Full);

        let Err(error) = extract(request("{}"), &state).await else {
            panic!("Empty object must be rejected");
        };

        assert_eq!(error.status_code(), StatusCode::BAD_REQUEST);

        let json = serde_json::to_value(&error).expect("Failed to serialize");

        assert!(json["error"]["body_error_reason"].as_str().is_some());
        assert!(json["error"]["body_expected_schema"]
            .as_str()
            .expect("Schema is missing")
            .contains("amazon_url"));
    }

    #[tokio::test]
    async fn lower_verbosity_omits_reason_and_schema() {
        let state = Verbosity(ErrorVerbosity::Type);

        let Err(error) = extract(request("not json"), &state).await else {
            panic!("Malformed JSON must be rejected");
        };

        let json = serde_json::to_value(&error).expect("Failed to serialize");

        assert_eq!(json["error_type"], "Body");
        assert_eq!(json["error"]["body_error_reason"], Value::Null);
        assert_eq!(json["error"]["body_expected_schema"], Value::Null);
    }
}
