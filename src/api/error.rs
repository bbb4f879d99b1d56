use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;

use crate::error::ProviderError;

/// Errors a request handler can surface. Every variant renders as the same
/// JSON envelope so clients can rely on one error shape.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// Structural problems with the request, reported per field.
    #[error("Invalid request content.")]
    Validation(Vec<FieldViolation>),
}

pub type ApiResult<T> = Result<T, ApiError>;

/// One failed check on one request field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldViolation {
    pub field: String,
    pub message: String,
}

impl FieldViolation {
    pub fn new(field: &str, message: &str) -> Self {
        FieldViolation {
            field: field.to_string(),
            message: message.to_string(),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ErrorBody {
    error_status: &'static str,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    fields_validation_results: Option<Vec<FieldViolation>>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_status, fields) = match &self {
            ApiError::Provider(ProviderError::UnsupportedCurrency(_)) => {
                (StatusCode::BAD_REQUEST, "BAD_REQUEST", None)
            }
            ApiError::Provider(ProviderError::Upstream(_)) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_SERVER_ERROR",
                None,
            ),
            ApiError::Validation(violations) => {
                (StatusCode::BAD_REQUEST, "BAD_REQUEST", Some(violations.clone()))
            }
        };

        let body = Json(ErrorBody {
            error_status,
            message: self.to_string(),
            fields_validation_results: fields,
        });
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_of(error: ApiError) -> (StatusCode, serde_json::Value) {
        let response = error.into_response();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn unsupported_currency_renders_as_bad_request() {
        let (status, body) = body_of(ApiError::Provider(ProviderError::UnsupportedCurrency(
            "dogecoin".to_string(),
        )))
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["errorStatus"], "BAD_REQUEST");
        assert_eq!(body["message"], "Currency 'dogecoin' is not supported.");
        assert!(body.get("fieldsValidationResults").is_none());
    }

    #[tokio::test]
    async fn upstream_failure_renders_as_internal_error() {
        let (status, body) = body_of(ApiError::Provider(ProviderError::Upstream(
            "External API error".to_string(),
        )))
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["errorStatus"], "INTERNAL_SERVER_ERROR");
        assert_eq!(body["message"], "External API error");
    }

    #[tokio::test]
    async fn validation_failure_lists_field_violations() {
        let (status, body) = body_of(ApiError::Validation(vec![
            FieldViolation::new("from", "From value is mandatory."),
            FieldViolation::new("amount", "Amount must be positive."),
        ]))
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["errorStatus"], "BAD_REQUEST");
        assert_eq!(body["message"], "Invalid request content.");
        let fields = body["fieldsValidationResults"].as_array().unwrap();
        assert_eq!(fields.len(), 2);
        assert_eq!(fields[0]["field"], "from");
        assert_eq!(fields[1]["message"], "Amount must be positive.");
    }
}
