// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::auth::AuthError;
use crate::moderation::ChirpRejection;
use crate::storage::StorageError;

/// Message returned for every rejected bearer token.
pub const TOKEN_REJECTED: &str = "invalid or expired token";

/// Message returned for any failed login.
pub const CREDENTIALS_REJECTED: &str = "incorrect email or password";

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, message)
    }

    /// 500 with a generic message; details only go to the log.
    pub fn internal() -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "internal server error")
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ErrorBody {
            error: self.message,
        });
        (self.status, body).into_response()
    }
}

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound(what) => ApiError::not_found(format!("{what} not found")),
            StorageError::DuplicateEmail(_) => ApiError::bad_request("email already in use"),
            StorageError::Forbidden { user_id, resource } => {
                tracing::warn!(user_id, %resource, "Ownership check failed");
                ApiError::forbidden("you do not own this resource")
            }
            other => {
                tracing::error!(error = %other, "Storage failure");
                ApiError::internal()
            }
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        if err.is_token_rejection() {
            tracing::warn!(code = err.error_code(), reason = %err, "Rejected token");
            return ApiError::unauthorized(TOKEN_REJECTED);
        }
        match err {
            AuthError::AuthFailed => ApiError::unauthorized(CREDENTIALS_REJECTED),
            AuthError::InvalidApiKey => {
                tracing::warn!("Rejected webhook API key");
                ApiError::unauthorized("invalid API key")
            }
            AuthError::Storage(storage) => storage.into(),
            other => {
                tracing::error!(code = other.error_code(), error = %other, "Auth failure");
                ApiError::internal()
            }
        }
    }
}

impl From<ChirpRejection> for ApiError {
    fn from(rejection: ChirpRejection) -> Self {
        ApiError::bad_request(rejection.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!(error = %rejection.body_text(), "Rejected request body");
        ApiError::bad_request("couldn't decode parameters")
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::bad_request(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::bad_request(rejection.body_text())
    }
}
