// src/errors.rs
use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Missing Paystack signature")]
    MissingSignature,

    #[error("Invalid Paystack signature")]
    InvalidSignature,

    #[error("Invalid payment service specified: {0}")]
    UnknownProvider(String),

    #[error("{provider} error ({status}): {message}")]
    Provider {
        provider: String,
        status: u16,
        message: String,
    },

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("External API error: {0}")]
    ExternalApi(String),

    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    #[error("HTTP client error: {0}")]
    HttpClientError(String),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::MissingSignature => StatusCode::BAD_REQUEST,
            AppError::InvalidSignature => StatusCode::BAD_REQUEST,
            AppError::UnknownProvider(_) => StatusCode::BAD_REQUEST,
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::Provider { .. } => StatusCode::BAD_GATEWAY,
            AppError::ExternalApi(_) => StatusCode::BAD_GATEWAY,
            AppError::ConfigurationError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::HttpClientError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "status": "error",
            "message": self.to_string(),
            "timestamp": chrono::Utc::now().to_rfc3339(),
        }));

        (self.status_code(), body).into_response()
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::ValidationError(format!("JSON parsing error: {}", err))
    }
}

impl From<JsonRejection> for AppError {
    fn from(err: JsonRejection) -> Self {
        AppError::ValidationError(err.body_text())
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::ExternalApi(format!("HTTP request failed: {}", err))
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::ValidationError(err.to_string())
    }
}

// Helper conversion functions
impl AppError {
    pub fn invalid_data(msg: impl Into<String>) -> Self {
        AppError::ValidationError(msg.into())
    }

    pub fn provider(provider: impl Into<String>, status: u16, msg: impl Into<String>) -> Self {
        AppError::Provider {
            provider: provider.into(),
            status,
            message: msg.into(),
        }
    }

    pub fn external_api(msg: impl Into<String>) -> Self {
        AppError::ExternalApi(msg.into())
    }

    pub fn configuration(msg: impl Into<String>) -> Self {
        AppError::ConfigurationError(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signature_errors_are_bad_requests() {
        assert_eq!(AppError::MissingSignature.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::InvalidSignature.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::MissingSignature.to_string(), "Missing Paystack signature");
    }

    #[test]
    fn provider_errors_map_to_bad_gateway() {
        let err = AppError::provider("paystack", 404, "Transaction reference not found");
        assert_eq!(err.status_code(), StatusCode::BAD_GATEWAY);
        assert_eq!(
            err.to_string(),
            "paystack error (404): Transaction reference not found"
        );
    }
}
