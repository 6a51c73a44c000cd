// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Polka payment webhooks.
//!
//! Polka authenticates with `Authorization: ApiKey <key>`. Only
//! `user.upgraded` changes anything; every other event is acknowledged so
//! Polka stops retrying it.

use axum::{extract::State, http::StatusCode};
use subtle::ConstantTimeEq;

use super::{blocking, ApiJson};
use crate::{
    auth::{ApiKey, AuthError},
    error::ApiError,
    models::{PolkaWebhookRequest, USER_UPGRADED_EVENT},
    state::AppState,
};

#[utoipa::path(
    post,
    path = "/api/polka/webhooks",
    request_body = PolkaWebhookRequest,
    tag = "Webhooks",
    security(("api_key" = [])),
    responses(
        (status = 204, description = "Event processed or ignored"),
        (status = 401, description = "Missing or wrong API key"),
        (status = 404, description = "Upgraded user does not exist"),
    )
)]
pub async fn polka_webhook(
    State(state): State<AppState>,
    ApiKey(key): ApiKey,
    ApiJson(event): ApiJson<PolkaWebhookRequest>,
) -> Result<StatusCode, ApiError> {
    if !key_matches(&key, &state.config.polka_key) {
        return Err(AuthError::InvalidApiKey.into());
    }

    if event.event != USER_UPGRADED_EVENT {
        tracing::debug!(event = %event.event, "Ignoring webhook event");
        return Ok(StatusCode::NO_CONTENT);
    }

    let user_id = event
        .data
        .user_id
        .ok_or_else(|| ApiError::bad_request("missing data.user_id"))?;
    let credentials = state.credentials.clone();
    blocking(move || credentials.upgrade_tier(user_id)).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// An empty configured key matches nothing.
fn key_matches(presented: &str, expected: &str) -> bool {
    !expected.is_empty() && bool::from(presented.as_bytes().ct_eq(expected.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PolkaWebhookData;
    use crate::state::test_support::{test_state, TEST_POLKA_KEY};
    use crate::storage::UserRepository;

    fn upgraded(user_id: u64) -> ApiJson<PolkaWebhookRequest> {
        ApiJson(PolkaWebhookRequest {
            event: USER_UPGRADED_EVENT.into(),
            data: PolkaWebhookData {
                user_id: Some(user_id),
            },
        })
    }

    #[tokio::test]
    async fn upgrade_event_sets_tier() {
        let (state, _dir) = test_state();
        state.credentials.create_account("a@x.com", "pw").unwrap();

        let status = polka_webhook(State(state.clone()), ApiKey(TEST_POLKA_KEY.into()), upgraded(1))
            .await
            .expect("webhook succeeds");

        assert_eq!(status, StatusCode::NO_CONTENT);
        assert!(UserRepository::new(&state.store).get(1).unwrap().is_chirpy_red);
    }

    #[tokio::test]
    async fn wrong_key_is_unauthorized() {
        let (state, _dir) = test_state();
        state.credentials.create_account("a@x.com", "pw").unwrap();

        let err = polka_webhook(State(state.clone()), ApiKey("nope".into()), upgraded(1))
            .await
            .unwrap_err();

        assert_eq!(err.status, StatusCode::UNAUTHORIZED);
        assert!(!UserRepository::new(&state.store).get(1).unwrap().is_chirpy_red);
    }

    #[test]
    fn key_comparison() {
        assert!(key_matches("k3y", "k3y"));
        assert!(!key_matches("k3y", "k3z"));
        assert!(!key_matches("k3", "k3y"));
        assert!(!key_matches("", ""));
    }

    #[tokio::test]
    async fn unknown_user_is_not_found() {
        let (state, _dir) = test_state();

        let err = polka_webhook(State(state), ApiKey(TEST_POLKA_KEY.into()), upgraded(9))
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn other_events_are_acknowledged() {
        let (state, _dir) = test_state();
        let event = ApiJson(PolkaWebhookRequest {
            event: "user.payment_failed".into(),
            data: PolkaWebhookData::default(),
        });

        let status = polka_webhook(State(state), ApiKey(TEST_POLKA_KEY.into()), event)
            .await
            .unwrap();
        assert_eq!(status, StatusCode::NO_CONTENT);
    }
}
