use crate::config::ConfigError;
use crate::postings::{FetchError, PostingServiceError, RecordError, RouteError, SlugError};
use crate::telemetry::TelemetryError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Json(serde_json::Error),
    Postings(PostingServiceError),
    Slug(SlugError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Json(err) => write!(f, "invalid exam data: {}", err),
            AppError::Postings(err) => write!(f, "{}", err),
            AppError::Slug(err) => write!(f, "slug error: {}", err),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Json(err) => Some(err),
            AppError::Postings(err) => Some(err),
            AppError::Slug(err) => Some(err),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Postings(PostingServiceError::Fetch(_)) => StatusCode::BAD_GATEWAY,
            AppError::Postings(PostingServiceError::Record(_)) | AppError::Json(_) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            AppError::Postings(PostingServiceError::Route(_)) => StatusCode::NOT_FOUND,
            AppError::Slug(_) => StatusCode::BAD_REQUEST,
            AppError::Config(_) | AppError::Telemetry(_) | AppError::Io(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

impl From<PostingServiceError> for AppError {
    fn from(value: PostingServiceError) -> Self {
        Self::Postings(value)
    }
}

impl From<FetchError> for AppError {
    fn from(value: FetchError) -> Self {
        Self::Postings(PostingServiceError::Fetch(value))
    }
}

impl From<RecordError> for AppError {
    fn from(value: RecordError) -> Self {
        Self::Postings(PostingServiceError::Record(value))
    }
}

impl From<RouteError> for AppError {
    fn from(value: RouteError) -> Self {
        Self::Postings(PostingServiceError::Route(value))
    }
}

impl From<SlugError> for AppError {
    fn from(value: SlugError) -> Self {
        Self::Slug(value)
    }
}
