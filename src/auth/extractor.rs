// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Axum extractors for request credentials.
//!
//! - [`Auth`] validates a `Bearer` access token and yields the user.
//! - [`BearerToken`] yields the raw `Bearer` string (refresh/revoke endpoints
//!   validate it themselves, against the store).
//! - [`ApiKey`] yields the key from an `ApiKey <key>` header (webhooks).
//!
//! ```rust,ignore
//! async fn my_handler(Auth(user): Auth) -> impl IntoResponse {
//!     // user.user_id is the token subject
//! }
//! ```

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};

use super::{AuthError, AuthenticatedUser};
use crate::state::AppState;

/// Extractor for authenticated users.
pub struct Auth(pub AuthenticatedUser);

impl FromRequestParts<AppState> for Auth {
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = credential(parts, "Bearer")?;
        let user_id = state.tokens.validate_access_token(token)?;
        Ok(Auth(AuthenticatedUser { user_id }))
    }
}

/// Raw bearer token, not yet validated.
pub struct BearerToken(pub String);

impl<S: Send + Sync> FromRequestParts<S> for BearerToken {
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        credential(parts, "Bearer").map(|token| BearerToken(token.to_string()))
    }
}

/// Webhook API key, not yet compared. Any header problem is `InvalidApiKey`.
pub struct ApiKey(pub String);

impl<S: Send + Sync> FromRequestParts<S> for ApiKey {
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        credential(parts, "ApiKey")
            .map(|key| ApiKey(key.to_string()))
            .map_err(|_| AuthError::InvalidApiKey)
    }
}

/// Pull `<scheme> <value>` out of the Authorization header.
fn credential<'a>(parts: &'a Parts, scheme: &str) -> Result<&'a str, AuthError> {
    let header = parts
        .headers
        .get(AUTHORIZATION)
        .ok_or(AuthError::MissingAuthHeader)?
        .to_str()
        .map_err(|_| AuthError::InvalidAuthHeader)?;

    header
        .strip_prefix(scheme)
        .and_then(|rest| rest.strip_prefix(' '))
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .ok_or(AuthError::InvalidAuthHeader)
}
