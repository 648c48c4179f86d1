//! HTTP error taxonomy and its JSON rendering.
//!
//! # Invariants
//! - Absence maps to 404; malformed or invalid bodies map to 400.
//! - Storage and unexpected failures map to 500 with the error message in
//!   `details`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use driver_core::StorageError;
use log::{error, warn};
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug, Serialize)]
struct ErrorBody {
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    errors: Option<Vec<String>>,
}

/// Failure of an API handler.
#[derive(Debug)]
pub enum ApiError {
    /// Body or query could not be decoded.
    BadRequest(String),
    /// Body decoded but failed field validation.
    Validation(Vec<String>),
    NotFound(String),
    Storage {
        message: &'static str,
        source: StorageError,
    },
    /// Anything not raised by the store, e.g. a panicked worker task.
    Unexpected {
        message: &'static str,
        details: String,
    },
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) | Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Storage { .. } | Self::Unexpected { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn body(&self) -> ErrorBody {
        match self {
            Self::BadRequest(details) => ErrorBody {
                message: "Invalid request".to_string(),
                details: Some(details.clone()),
                errors: None,
            },
            Self::Validation(errors) => ErrorBody {
                message: "Validation failed".to_string(),
                details: None,
                errors: Some(errors.clone()),
            },
            Self::NotFound(message) => ErrorBody {
                message: message.clone(),
                details: None,
                errors: None,
            },
            Self::Storage { message, source } => ErrorBody {
                message: (*message).to_string(),
                details: Some(source.to_string()),
                errors: None,
            },
            Self::Unexpected { message, details } => ErrorBody {
                message: (*message).to_string(),
                details: Some(details.clone()),
                errors: None,
            },
        }
    }
}

impl Display for ApiError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BadRequest(details) => write!(f, "bad request: {details}"),
            Self::Validation(errors) => write!(f, "validation failed: {}", errors.join("; ")),
            Self::NotFound(message) => write!(f, "{message}"),
            Self::Storage { message, source } => write!(f, "{message}: {source}"),
            Self::Unexpected { message, details } => write!(f, "{message}: {details}"),
        }
    }
}

impl Error for ApiError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Storage { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(
                "event=http_response module=api status=error code={} error={}",
                status.as_u16(),
                self
            );
        } else {
            warn!(
                "event=http_response module=api status=rejected code={} error={}",
                status.as_u16(),
                self
            );
        }
        (status, Json(self.body())).into_response()
    }
}
