// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! User endpoints.

use axum::{extract::State, http::StatusCode, Json};

use super::{blocking, ApiJson};
use crate::{
    auth::Auth,
    error::ApiError,
    models::{CredentialsRequest, UserResponse},
    state::AppState,
};

/// Register a new account.
#[utoipa::path(
    post,
    path = "/api/users",
    request_body = CredentialsRequest,
    tag = "Users",
    responses(
        (status = 201, description = "Account created", body = UserResponse),
        (status = 400, description = "Malformed body or email already in use"),
    )
)]
pub async fn create_user(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<CredentialsRequest>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    let credentials = state.credentials.clone();
    let user = blocking(move || credentials.create_account(&request.email, &request.password)).await?;
    Ok((StatusCode::CREATED, Json(user.into())))
}

/// Replace the caller's email and password.
///
/// The upgraded-tier flag is kept as is.
#[utoipa::path(
    put,
    path = "/api/users",
    request_body = CredentialsRequest,
    tag = "Users",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Updated account", body = UserResponse),
        (status = 400, description = "Malformed body or email already in use"),
        (status = 401, description = "Unauthorized - invalid or missing token"),
    )
)]
pub async fn update_user(
    State(state): State<AppState>,
    Auth(user): Auth,
    ApiJson(request): ApiJson<CredentialsRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    let credentials = state.credentials.clone();
    let updated = blocking(move || {
        credentials.update_profile(user.user_id, &request.email, &request.password)
    })
    .await?;
    Ok(Json(updated.into()))
}
