// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{extract::State, http::StatusCode, Json};

use super::{blocking, ApiJson, ApiPath, ApiQuery};
use crate::{
    auth::Auth,
    error::ApiError,
    models::{ChirpListQuery, ChirpRequest, ValidateChirpResponse},
    moderation::clean_chirp,
    state::AppState,
    storage::{Chirp, ChirpId, ChirpRepository, OwnershipEnforcer},
};

#[utoipa::path(
    post,
    path = "/api/chirps",
    request_body = ChirpRequest,
    tag = "Chirps",
    security(("bearer" = [])),
    responses(
        (status = 201, body = Chirp),
        (status = 400, description = "Chirp is empty or too long"),
        (status = 401, description = "Unauthorized - invalid or missing token"),
    )
)]
pub async fn create_chirp(
    State(state): State<AppState>,
    Auth(user): Auth,
    ApiJson(request): ApiJson<ChirpRequest>,
) -> Result<(StatusCode, Json<Chirp>), ApiError> {
    let body = clean_chirp(&request.body)?;
    let store = state.store.clone();
    let chirp = blocking(move || ChirpRepository::new(&store).create(user.user_id, &body)).await?;

    tracing::info!(chirp_id = chirp.id, author_id = chirp.author_id, "Chirp created");
    Ok((StatusCode::CREATED, Json(chirp)))
}

#[utoipa::path(
    get,
    path = "/api/chirps",
    params(ChirpListQuery),
    tag = "Chirps",
    responses((status = 200, body = [Chirp]))
)]
pub async fn list_chirps(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<ChirpListQuery>,
) -> Result<Json<Vec<Chirp>>, ApiError> {
    let store = state.store.clone();
    let order = query.sort.unwrap_or_default();
    let chirps = blocking(move || ChirpRepository::new(&store).list(query.author_id, order)).await?;
    Ok(Json(chirps))
}

#[utoipa::path(
    get,
    path = "/api/chirps/{chirp_id}",
    params(
        ("chirp_id" = u64, Path, description = "Identifier of the chirp")
    ),
    tag = "Chirps",
    responses(
        (status = 200, body = Chirp),
        (status = 404, description = "No such chirp"),
    )
)]
pub async fn get_chirp(
    State(state): State<AppState>,
    ApiPath(chirp_id): ApiPath<ChirpId>,
) -> Result<Json<Chirp>, ApiError> {
    let store = state.store.clone();
    let chirp = blocking(move || ChirpRepository::new(&store).get(chirp_id)).await?;
    Ok(Json(chirp))
}

/// Delete a chirp. Only its author may do so.
#[utoipa::path(
    delete,
    path = "/api/chirps/{chirp_id}",
    params(
        ("chirp_id" = u64, Path, description = "Identifier of the chirp to delete")
    ),
    tag = "Chirps",
    security(("bearer" = [])),
    responses(
        (status = 204),
        (status = 401, description = "Unauthorized - invalid or missing token"),
        (status = 403, description = "Chirp belongs to another user"),
        (status = 404, description = "No such chirp"),
    )
)]
pub async fn delete_chirp(
    State(state): State<AppState>,
    Auth(user): Auth,
    ApiPath(chirp_id): ApiPath<ChirpId>,
) -> Result<StatusCode, ApiError> {
    let store = state.store.clone();
    blocking(move || {
        let repo = ChirpRepository::new(&store);
        repo.get(chirp_id)?.verify_ownership(&user)?;
        repo.delete(chirp_id)
    })
    .await?;

    tracing::info!(chirp_id, user_id = user.user_id, "Chirp deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// Validate and clean a chirp without storing it.
#[utoipa::path(
    post,
    path = "/api/validate_chirp",
    request_body = ChirpRequest,
    tag = "Chirps",
    responses(
        (status = 200, body = ValidateChirpResponse),
        (status = 400, description = "Chirp is empty or too long"),
    )
)]
pub async fn validate_chirp(
    ApiJson(request): ApiJson<ChirpRequest>,
) -> Result<Json<ValidateChirpResponse>, ApiError> {
    let cleaned_body = clean_chirp(&request.body)?;
    Ok(Json(ValidateChirpResponse { cleaned_body }))
}
