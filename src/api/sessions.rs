// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Login, token refresh and revocation.
//!
//! `/api/refresh` and `/api/revoke` take the refresh token in the
//! `Authorization: Bearer` header, not in the body.

use axum::{extract::State, http::StatusCode, Json};

use super::{blocking, ApiJson};
use crate::{
    auth::{AuthError, BearerToken},
    error::ApiError,
    models::{CredentialsRequest, LoginResponse, TokenResponse},
    state::AppState,
};

/// Exchange email and password for a session pair.
#[utoipa::path(
    post,
    path = "/api/login",
    request_body = CredentialsRequest,
    tag = "Sessions",
    responses(
        (status = 200, description = "Logged in", body = LoginResponse),
        (status = 401, description = "Incorrect email or password"),
    )
)]
pub async fn login(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<CredentialsRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let credentials = state.credentials.clone();
    let tokens = state.tokens.clone();

    let (user, pair) = blocking(move || {
        let user = credentials.verify_credential(&request.email, &request.password)?;
        let pair = tokens.issue_session_pair(user.id)?;
        Ok::<_, AuthError>((user, pair))
    })
    .await?;

    Ok(Json(LoginResponse {
        id: user.id,
        email: user.email,
        is_chirpy_red: user.is_chirpy_red,
        token: pair.access_token,
        refresh_token: pair.refresh_token,
    }))
}

/// Mint a new access token from an unrevoked refresh token.
#[utoipa::path(
    post,
    path = "/api/refresh",
    tag = "Sessions",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "New access token", body = TokenResponse),
        (status = 401, description = "Refresh token invalid, expired or revoked"),
    )
)]
pub async fn refresh(
    State(state): State<AppState>,
    BearerToken(refresh_token): BearerToken,
) -> Result<Json<TokenResponse>, ApiError> {
    let tokens = state.tokens.clone();
    let token = blocking(move || tokens.refresh_access_token(&refresh_token)).await?;
    Ok(Json(TokenResponse { token }))
}

/// Revoke a refresh token.
#[utoipa::path(
    post,
    path = "/api/revoke",
    tag = "Sessions",
    security(("bearer" = [])),
    responses(
        (status = 204, description = "Refresh token revoked"),
        (status = 401, description = "Refresh token invalid or unknown"),
    )
)]
pub async fn revoke(
    State(state): State<AppState>,
    BearerToken(refresh_token): BearerToken,
) -> Result<StatusCode, ApiError> {
    let tokens = state.tokens.clone();
    blocking(move || tokens.revoke(&refresh_token)).await?;
    Ok(StatusCode::NO_CONTENT)
}
