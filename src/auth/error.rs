// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication errors.

use axum::response::{IntoResponse, Response};
use thiserror::Error;

use super::claims::TokenKind;
use crate::error::ApiError;
use crate::storage::StorageError;

/// Authentication error type.
///
/// Token failures are kept distinct so they can be logged precisely; the
/// HTTP layer collapses them into one 401 response.
#[derive(Debug, Error)]
pub enum AuthError {
    /// No authorization header present
    #[error("Authorization header is required")]
    MissingAuthHeader,
    /// Authorization header has the wrong scheme or is not valid text
    #[error("Invalid authorization header format")]
    InvalidAuthHeader,
    /// Token is not a well-formed JWT or its subject is not a user id
    #[error("Token is malformed")]
    MalformedToken,
    /// Token signature does not match the service secret
    #[error("Token signature is invalid")]
    InvalidSignature,
    /// Token has expired
    #[error("Token has expired")]
    TokenExpired,
    /// Token issuer is not one this service mints
    #[error("Token issuer is invalid")]
    InvalidIssuer,
    /// A valid token of the other kind was presented
    #[error("Expected {expected} token, got {found} token")]
    WrongTokenKind { expected: TokenKind, found: TokenKind },
    /// Refresh token has no revocation record
    #[error("Refresh token is unknown")]
    UnknownRefreshToken,
    /// Refresh token has been revoked
    #[error("Refresh token has been revoked")]
    Revoked,
    /// Email or password did not match; never says which
    #[error("Incorrect email or password")]
    AuthFailed,
    /// Webhook API key mismatch
    #[error("Invalid API key")]
    InvalidApiKey,
    /// Password hashing failed
    #[error("Password hashing failed: {0}")]
    Hashing(String),
    /// Token signing failed
    #[error("Token signing failed: {0}")]
    Signing(String),
    /// Underlying store failure
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl AuthError {
    /// Get the error code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::MissingAuthHeader => "missing_auth_header",
            AuthError::InvalidAuthHeader => "invalid_auth_header",
            AuthError::MalformedToken => "malformed_token",
            AuthError::InvalidSignature => "invalid_signature",
            AuthError::TokenExpired => "token_expired",
            AuthError::InvalidIssuer => "invalid_issuer",
            AuthError::WrongTokenKind { .. } => "wrong_token_kind",
            AuthError::UnknownRefreshToken => "unknown_refresh_token",
            AuthError::Revoked => "token_revoked",
            AuthError::AuthFailed => "auth_failed",
            AuthError::InvalidApiKey => "invalid_api_key",
            AuthError::Hashing(_) => "hashing_error",
            AuthError::Signing(_) => "signing_error",
            AuthError::Storage(_) => "storage_error",
        }
    }

    /// Whether this is a rejected bearer token (any token-validation failure).
    pub fn is_token_rejection(&self) -> bool {
        matches!(
            self,
            AuthError::MissingAuthHeader
                | AuthError::InvalidAuthHeader
                | AuthError::MalformedToken
                | AuthError::InvalidSignature
                | AuthError::TokenExpired
                | AuthError::InvalidIssuer
                | AuthError::WrongTokenKind { .. }
                | AuthError::UnknownRefreshToken
                | AuthError::Revoked
        )
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        ApiError::from(self).into_response()
    }
}
