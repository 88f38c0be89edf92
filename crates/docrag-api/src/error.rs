use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use docrag_core::error::DocragError;
use serde::Serialize;

/// Unified API error type
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
    pub details: Option<String>,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self { status: StatusCode::BAD_REQUEST, message: message.into(), details: None }
    }

    pub fn unprocessable(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::UNPROCESSABLE_ENTITY,
            message: message.into(),
            details: None,
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody { error: self.message, details: self.details };
        (self.status, Json(body)).into_response()
    }
}

impl From<DocragError> for ApiError {
    fn from(err: DocragError) -> Self {
        let status = match &err {
            DocragError::EmptyInput => StatusCode::UNPROCESSABLE_ENTITY,
            DocragError::ConfigInvalid { .. } => StatusCode::BAD_REQUEST,
            DocragError::DimensionMismatch { .. } => StatusCode::CONFLICT,
            DocragError::EmbeddingTimeout { .. } | DocragError::GenerationTimeout { .. } => {
                StatusCode::GATEWAY_TIMEOUT
            }
            DocragError::EmbedderUnavailable { .. } | DocragError::GeneratorUnavailable { .. } => {
                StatusCode::BAD_GATEWAY
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let message = match &err {
            DocragError::EmptyInput => "Document produced no indexable chunks",
            DocragError::ConfigInvalid { .. } => "Invalid chunking parameters",
            DocragError::DimensionMismatch { .. } => "Embedding dimension mismatch",
            DocragError::EmbeddingTimeout { .. } | DocragError::GenerationTimeout { .. } => {
                "Model server timed out"
            }
            DocragError::EmbedderUnavailable { .. } | DocragError::GeneratorUnavailable { .. } => {
                "Model server unavailable"
            }
            _ => "Internal error",
        };

        Self { status, message: message.to_string(), details: Some(err.to_string()) }
    }
}
