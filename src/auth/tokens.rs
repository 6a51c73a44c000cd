// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Session token issuing and validation.
//!
//! ## Lifecycle
//!
//! 1. Login mints an access/refresh pair and records the refresh token.
//! 2. Access tokens authorize requests until they expire; nothing is stored.
//! 3. A refresh token mints new access tokens while its record is unrevoked.
//! 4. Revocation stamps the record; the refresh token is rejected from then on.
//!
//! All tokens are HS256 JWTs signed with one shared secret. Expiry has no
//! leeway: a token is accepted through its `exp` second and rejected after.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use uuid::Uuid;

use super::claims::{SessionClaims, TokenKind};
use super::AuthError;
use crate::storage::{RefreshTokenRepository, StorageError, Store, UserId};

/// Freshly minted access/refresh pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Mints and validates session tokens, persisting refresh-token state.
#[derive(Clone)]
pub struct TokenIssuer {
    store: Arc<Store>,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl TokenIssuer {
    pub fn new(store: Arc<Store>, secret: &str) -> Self {
        Self {
            store,
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            access_ttl: TokenKind::Access.default_ttl(),
            refresh_ttl: TokenKind::Refresh.default_ttl(),
        }
    }

    /// Override token lifetimes.
    pub fn with_ttls(mut self, access_ttl: Duration, refresh_ttl: Duration) -> Self {
        self.access_ttl = access_ttl;
        self.refresh_ttl = refresh_ttl;
        self
    }

    /// Mint an access/refresh pair for `user_id` and record the refresh token.
    pub fn issue_session_pair(&self, user_id: UserId) -> Result<SessionPair, AuthError> {
        let now = Utc::now();
        let access_token = self.mint(TokenKind::Access, user_id, now)?;
        let refresh_token = self.mint(TokenKind::Refresh, user_id, now)?;

        RefreshTokenRepository::new(&self.store).create(&refresh_token)?;
        tracing::info!(user_id, "Issued session tokens");

        Ok(SessionPair {
            access_token,
            refresh_token,
        })
    }

    /// Validate an access token and return its subject.
    pub fn validate_access_token(&self, token: &str) -> Result<UserId, AuthError> {
        let claims = self.verify(token, TokenKind::Access)?;
        parse_subject(&claims.sub)
    }

    /// Mint a new access token from an unrevoked refresh token.
    ///
    /// The refresh token itself is not rotated.
    pub fn refresh_access_token(&self, refresh_token: &str) -> Result<String, AuthError> {
        let claims = self.verify(refresh_token, TokenKind::Refresh)?;
        let user_id = parse_subject(&claims.sub)?;

        let record = RefreshTokenRepository::new(&self.store)
            .get(refresh_token)
            .map_err(unknown_on_missing)?;
        if record.is_revoked() {
            return Err(AuthError::Revoked);
        }

        tracing::debug!(user_id, "Refreshed access token");
        self.mint(TokenKind::Access, user_id, Utc::now())
    }

    /// Revoke a refresh token. Revoking an already revoked token re-stamps it.
    pub fn revoke(&self, refresh_token: &str) -> Result<(), AuthError> {
        let claims = self.verify(refresh_token, TokenKind::Refresh)?;

        RefreshTokenRepository::new(&self.store)
            .revoke(refresh_token, Utc::now())
            .map_err(unknown_on_missing)?;
        tracing::info!(subject = %claims.sub, "Revoked refresh token");
        Ok(())
    }

    fn mint(&self, kind: TokenKind, user_id: UserId, now: DateTime<Utc>) -> Result<String, AuthError> {
        let ttl = match kind {
            TokenKind::Access => self.access_ttl,
            TokenKind::Refresh => self.refresh_ttl,
        };
        let claims = SessionClaims {
            iss: kind.issuer().to_string(),
            sub: user_id.to_string(),
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
            jti: Uuid::new_v4().to_string(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AuthError::Signing(e.to_string()))
    }

    /// Check signature, expiry and issuer, in that order.
    fn verify(&self, token: &str, expected: TokenKind) -> Result<SessionClaims, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "iss", "sub"]);

        let claims = decode::<SessionClaims>(token, &self.decoding_key, &validation)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                ErrorKind::InvalidSignature => AuthError::InvalidSignature,
                ErrorKind::InvalidIssuer => AuthError::InvalidIssuer,
                _ => AuthError::MalformedToken,
            })?
            .claims;

        match TokenKind::from_issuer(&claims.iss) {
            Some(kind) if kind == expected => Ok(claims),
            Some(found) => Err(AuthError::WrongTokenKind { expected, found }),
            None => Err(AuthError::InvalidIssuer),
        }
    }
}

fn parse_subject(sub: &str) -> Result<UserId, AuthError> {
    sub.parse().map_err(|_| AuthError::MalformedToken)
}

fn unknown_on_missing(err: StorageError) -> AuthError {
    match err {
        StorageError::NotFound(_) => AuthError::UnknownRefreshToken,
        other => AuthError::Storage(other),
    }
}
