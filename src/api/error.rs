use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::common::errors::EngineError;

/// Errors returned by HTTP handlers
#[derive(Debug)]
pub enum ApiError {
    /// Required body fields are absent
    MissingFields(Vec<String>),
    /// The request cannot be served as sent
    BadRequest { error: String, message: Option<String> },
    /// Something failed on the server side
    Internal { error: String, message: String },
}

impl ApiError {
    pub fn bad_request(error: impl Into<String>) -> Self {
        Self::BadRequest {
            error: error.into(),
            message: None,
        }
    }

    pub fn internal(error: impl Into<String>, source: impl std::fmt::Display) -> Self {
        Self::Internal {
            error: error.into(),
            message: source.to_string(),
        }
    }

    /// Map a failure of an operation that reads the live risk configuration
    ///
    /// Caller mistakes stay 400; anything else, a corrupted stored configuration
    /// included, becomes a 500 reported under `context`.
    pub fn from_evaluation(context: &str, err: EngineError) -> Self {
        if err.is_client_error() {
            err.into()
        } else {
            Self::internal(context, err)
        }
    }

    /// Collapse into an engine error, used for per-trade batch slots
    pub fn into_engine_error(self) -> EngineError {
        match self {
            ApiError::MissingFields(fields) => {
                EngineError::Validation(format!("Missing required fields: {}", fields.join(", ")))
            }
            ApiError::BadRequest { error, message } => match message {
                Some(message) => EngineError::Validation(format!("{}: {}", error, message)),
                None => EngineError::Validation(error),
            },
            ApiError::Internal { error, message } => {
                EngineError::Internal(format!("{}: {}", error, message))
            }
        }
    }
}

impl From<EngineError> for ApiError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::Validation(message) => ApiError::BadRequest {
                error: "Invalid input values".to_string(),
                message: Some(message),
            },
            EngineError::InvalidConfig(message) => ApiError::bad_request(message),
            e @ EngineError::DegenerateInput { .. } => ApiError::bad_request(e.to_string()),
            e => ApiError::internal("Internal error", e),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::MissingFields(fields) => (
                StatusCode::BAD_REQUEST,
                json!({
                    "error": "Missing required fields",
                    "missing_fields": fields,
                }),
            ),
            ApiError::BadRequest { error, message } => {
                let body = match message {
                    Some(message) => json!({ "error": error, "message": message }),
                    None => json!({ "error": error }),
                };
                (StatusCode::BAD_REQUEST, body)
            }
            ApiError::Internal { error, message } => {
                tracing::error!(error = %error, message = %message, "Request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": error, "message": message }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

/// Result type for HTTP handlers
pub type ApiResult<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_error_mapping() {
        let err: ApiError = EngineError::Validation("bad delta".into()).into();
        assert!(matches!(err, ApiError::BadRequest { message: Some(ref m), .. } if m == "bad delta"));

        let err: ApiError = EngineError::InvalidConfig("Total capital must be positive".into()).into();
        assert!(matches!(err, ApiError::BadRequest { message: None, .. }));

        let err: ApiError = EngineError::Internal("disk".into()).into();
        assert!(matches!(err, ApiError::Internal { .. }));
    }

    #[test]
    fn test_status_codes() {
        let response = ApiError::MissingFields(vec!["delta".into()]).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = ApiError::internal("Internal calculation error", "boom").into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_missing_fields_become_validation_errors() {
        let err = ApiError::MissingFields(vec!["theta".into(), "entry".into()]).into_engine_error();
        assert_eq!(
            err.to_string(),
            "Validation error: Missing required fields: theta, entry"
        );
    }

    #[test]
    fn test_internal_errors_stay_server_side() {
        let err = ApiError::internal("Internal calculation error", "boom").into_engine_error();
        assert!(matches!(err, EngineError::Internal(_)));
        assert!(!err.is_client_error());
    }

    #[test]
    fn test_evaluation_errors_split_by_cause() {
        let err = ApiError::from_evaluation(
            "Risk validation failed",
            EngineError::Validation("Risk amount must be a finite number, got NaN".into()),
        );
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);

        let err = ApiError::from_evaluation(
            "Risk validation failed",
            EngineError::InvalidConfig("Total capital must be positive, found 0".into()),
        );
        assert!(matches!(err, ApiError::Internal { ref error, .. } if error == "Risk validation failed"));
    }
}
