// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

/// Liveness probe handler.
///
/// Always returns 200 with `OK` if the process is running.
#[utoipa::path(
    get,
    path = "/api/healthz",
    tag = "Health",
    responses(
        (status = 200, description = "Service is alive", body = String, content_type = "text/plain")
    )
)]
pub async fn healthz() -> &'static str {
    "OK"
}
