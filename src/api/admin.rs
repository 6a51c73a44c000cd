// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Hit counter endpoints and the `/app` middleware.

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{Html, IntoResponse, Response},
};
use percent_encoding::percent_decode_str;

use crate::state::AppState;

/// Count every request that reaches the static file service.
pub async fn count_hit(State(state): State<AppState>, request: Request, next: Next) -> Response {
    state.hits.increment();
    next.run(request).await
}

/// Answer 404 for the database file and its temp sibling when they live
/// under the assets directory.
pub async fn hide_store_files(State(state): State<AppState>, request: Request, next: Next) -> Response {
    if is_store_file(&state, request.uri().path()) {
        tracing::warn!(path = %request.uri().path(), "Refused to serve the database file");
        return StatusCode::NOT_FOUND.into_response();
    }
    next.run(request).await
}

fn is_store_file(state: &AppState, uri_path: &str) -> bool {
    let decoded = percent_decode_str(uri_path).decode_utf8_lossy();
    let requested = state.config.assets_dir.join(decoded.trim_start_matches('/'));
    let Ok(requested) = requested.canonicalize() else {
        return false;
    };

    let temp = state.store.temp_path();
    let found = [state.store.path(), temp.as_path()]
        .into_iter()
        .filter_map(|p| p.canonicalize().ok())
        .any(|p| p == requested);
    found
}

/// Admin page showing how often `/app` was visited.
#[utoipa::path(
    get,
    path = "/admin/metrics",
    tag = "Admin",
    responses((status = 200, description = "HTML page with the hit count", content_type = "text/html"))
)]
pub async fn metrics(State(state): State<AppState>) -> Html<String> {
    Html(format!(
        "<html>\n<body>\n    <h1>Welcome, Chirpy Admin</h1>\n    <p>Chirpy has been visited {} times!</p>\n</body>\n</html>\n",
        state.hits.get()
    ))
}

/// Zero the hit counter.
#[utoipa::path(
    get,
    path = "/api/reset",
    tag = "Admin",
    responses((status = 200, description = "Counter reset", content_type = "text/html"))
)]
pub async fn reset_hits(State(state): State<AppState>) -> Html<&'static str> {
    state.hits.reset();
    tracing::info!("Hit counter reset");
    Html("Hits have been reset")
}
