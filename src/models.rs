// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # API Data Models
//!
//! This module defines the request and response data structures used by
//! the REST API. All types derive `ToSchema` (or `IntoParams`) for the
//! OpenAPI document.
//!
//! Stored entities never cross the HTTP boundary directly: [`UserResponse`]
//! is built from a stored user and drops the password hash. Chirps are safe to
//! return as stored and use [`Chirp`](crate::storage::Chirp) itself.
//!
//! ## Model Categories
//!
//! - **Users**: sign-up, profile update and their responses
//! - **Sessions**: login, refresh and their responses
//! - **Chirps**: posting, validation and list filters
//! - **Webhooks**: Polka payment events

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::storage::{SortOrder, User, UserId};

// =============================================================================
// User Models
// =============================================================================

/// Email and password pair, used for sign-up, profile update and login.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct CredentialsRequest {
    pub email: String,
    pub password: String,
}

/// Public view of an account.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct UserResponse {
    pub id: UserId,
    pub email: String,
    /// Whether the account has the upgraded tier.
    pub is_chirpy_red: bool,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            is_chirpy_red: user.is_chirpy_red,
        }
    }
}

// =============================================================================
// Session Models
// =============================================================================

/// Successful login: the account plus a fresh session pair.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    pub id: UserId,
    pub email: String,
    pub is_chirpy_red: bool,
    /// Access token, valid for one hour.
    pub token: String,
    /// Refresh token, valid for 60 days unless revoked.
    pub refresh_token: String,
}

/// A newly minted access token.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TokenResponse {
    pub token: String,
}

// =============================================================================
// Chirp Models
// =============================================================================

/// Body of a chirp to post or validate.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct ChirpRequest {
    /// Up to 140 characters.
    pub body: String,
}

/// Result of validating a chirp without storing it.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ValidateChirpResponse {
    pub cleaned_body: String,
}

/// Filters for listing chirps.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ChirpListQuery {
    /// Only chirps by this author.
    pub author_id: Option<UserId>,
    /// Order by chirp id, `asc` (default) or `desc`.
    pub sort: Option<SortOrder>,
}

// =============================================================================
// Webhook Models
// =============================================================================

/// Event name that grants the upgraded tier.
pub const USER_UPGRADED_EVENT: &str = "user.upgraded";

/// Payment event posted by Polka.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct PolkaWebhookRequest {
    pub event: String,
    #[serde(default)]
    pub data: PolkaWebhookData,
}

/// Present for `user.upgraded`; other events may omit it.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct PolkaWebhookData {
    pub user_id: Option<UserId>,
}
