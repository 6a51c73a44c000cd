// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Refresh-token revocation records.
//!
//! A record is keyed by the full token string. It starts unrevoked and can
//! only move to revoked; records are never deleted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::super::codec::zero_time;
use super::super::{StorageError, StorageResult, Store};

/// Persisted revocation state for one refresh token.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RefreshTokenRecord {
    /// The encoded refresh token.
    pub id: String,
    /// When the token was revoked, `None` while it is still valid.
    #[serde(with = "zero_time")]
    pub revoked_at: Option<DateTime<Utc>>,
}

impl RefreshTokenRecord {
    pub fn is_revoked(&self) -> bool {
        self.revoked_at.is_some()
    }
}

/// Repository for refresh-token records.
pub struct RefreshTokenRepository<'a> {
    store: &'a Store,
}

impl<'a> RefreshTokenRepository<'a> {
    pub fn new(store: &'a Store) -> Self {
        Self { store }
    }

    /// Record a newly issued refresh token.
    pub fn create(&self, token: &str) -> StorageResult<RefreshTokenRecord> {
        self.store.mutate(|db| {
            let record = RefreshTokenRecord {
                id: token.to_string(),
                revoked_at: None,
            };
            db.refresh_tokens.insert(record.id.clone(), record.clone());
            Ok(record)
        })
    }

    pub fn get(&self, token: &str) -> StorageResult<RefreshTokenRecord> {
        self.store
            .load()?
            .refresh_tokens
            .remove(token)
            .ok_or_else(|| StorageError::NotFound("refresh token".to_string()))
    }

    /// Mark a token revoked as of `at`. Revoking again moves the timestamp.
    pub fn revoke(&self, token: &str, at: DateTime<Utc>) -> StorageResult<RefreshTokenRecord> {
        self.store.mutate(|db| {
            let record = db
                .refresh_tokens
                .get_mut(token)
                .ok_or_else(|| StorageError::NotFound("refresh token".to_string()))?;
            record.revoked_at = Some(at);
            Ok(record.clone())
        })
    }
}
