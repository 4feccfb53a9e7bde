//! Error types for the identifier service.
//!
//! [`Error`] captures every failure a request can run into and converts into
//! an HTTP response with a JSON body `{"error": "..."}`.
//!
//! ## Status mapping
//! - `400` bad input: malformed body or identifier, unknown category under
//!   the reject policy.
//! - `404` a well-formed identifier that was never issued.
//! - `409` issuance lost: retries exhausted, sequence exhausted, store
//!   conflict.
//! - `503` the store, the worker or the service is unavailable.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

pub type Result<T> = core::result::Result<T, Error>;

/// Unified error type for the identifier service.
#[derive(Clone, thiserror::Error, Debug)]
pub enum Error {
    /// Internal channel send/receive failure (e.g., closed channel).
    #[error("Channel error: {context}")]
    ChannelError { context: String },

    /// Allocation, issuance or the store failed.
    #[error(transparent)]
    Id(#[from] qms_id::Error),

    /// The client request was malformed.
    #[error("Invalid request: {reason}")]
    InvalidRequest { reason: String },

    /// The identifier is well-formed but was never issued.
    #[error("Identifier {id} not found")]
    NotFound { id: String },

    /// The service is in the process of shutting down.
    #[error("Service is shutting down")]
    ServiceShutdown,
}

impl Error {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidRequest { .. } => StatusCode::BAD_REQUEST,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::ChannelError { .. } | Self::ServiceShutdown => StatusCode::SERVICE_UNAVAILABLE,
            Self::Id(e) if e.is_invalid_input() => StatusCode::BAD_REQUEST,
            Self::Id(
                qms_id::Error::SequenceExhausted { .. } | qms_id::Error::RetriesExhausted { .. },
            ) => StatusCode::CONFLICT,
            Self::Id(qms_id::Error::Store(e)) if e.is_conflict() => StatusCode::CONFLICT,
            Self::Id(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::debug!(error = %self, %status, "request rejected");
        }
        (
            status,
            Json(ErrorBody {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qms_id::StoreError;

    #[test]
    fn maps_errors_to_status_codes() {
        let cases = [
            (
                Error::InvalidRequest {
                    reason: "x".into(),
                },
                StatusCode::BAD_REQUEST,
            ),
            (
                Error::Id(qms_id::Error::UnknownCategory {
                    category: "x".into(),
                }),
                StatusCode::BAD_REQUEST,
            ),
            (
                Error::Id(qms_id::Error::MalformedIdentifier {
                    input: "x".into(),
                    reason: "y",
                }),
                StatusCode::BAD_REQUEST,
            ),
            (Error::NotFound { id: "x".into() }, StatusCode::NOT_FOUND),
            (
                Error::Id(qms_id::Error::RetriesExhausted {
                    partition: "CCFS-2025-10".into(),
                    attempts: 8,
                }),
                StatusCode::CONFLICT,
            ),
            (
                Error::Id(qms_id::Error::Store(StoreError::Conflict { id: "x".into() })),
                StatusCode::CONFLICT,
            ),
            (
                Error::Id(qms_id::Error::Store(StoreError::Unavailable {
                    reason: "down".into(),
                })),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            (Error::ServiceShutdown, StatusCode::SERVICE_UNAVAILABLE),
            (
                Error::ChannelError {
                    context: "closed".into(),
                },
                StatusCode::SERVICE_UNAVAILABLE,
            ),
        ];
        for (error, status) in cases {
            assert_eq!(error.status(), status, "{error}");
        }
    }
}
