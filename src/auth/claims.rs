// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! JWT claims and authenticated user representation.

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::storage::UserId;

/// Which half of a session pair a token is. The `iss` claim carries it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// Short-lived, stateless, authorizes individual requests
    Access,
    /// Long-lived, revocable, only mints new access tokens
    Refresh,
}

impl TokenKind {
    /// Issuer claim written into tokens of this kind.
    pub fn issuer(self) -> &'static str {
        match self {
            TokenKind::Access => "chirpy-access",
            TokenKind::Refresh => "chirpy-refresh",
        }
    }

    pub fn from_issuer(issuer: &str) -> Option<TokenKind> {
        match issuer {
            "chirpy-access" => Some(TokenKind::Access),
            "chirpy-refresh" => Some(TokenKind::Refresh),
            _ => None,
        }
    }

    /// Default lifetime: one hour for access tokens, 60 days for refresh tokens.
    pub fn default_ttl(self) -> Duration {
        match self {
            TokenKind::Access => Duration::hours(1),
            TokenKind::Refresh => Duration::days(60),
        }
    }
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenKind::Access => write!(f, "access"),
            TokenKind::Refresh => write!(f, "refresh"),
        }
    }
}

/// Claims carried by both access and refresh tokens.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionClaims {
    /// Issuer, discriminates the token kind
    pub iss: String,
    /// Subject, the user id in decimal
    pub sub: String,
    /// Issued at (Unix seconds)
    pub iat: i64,
    /// Expiration (Unix seconds)
    pub exp: i64,
    /// Random token id so tokens minted in the same second differ.
    /// Tokens from earlier deployments carry none.
    #[serde(default)]
    pub jti: String,
}

/// The user behind a validated access token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub user_id: UserId,
}
