// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! On-disk document set and its JSON codec.
//!
//! The whole database is one JSON object:
//!
//! ```text
//! {
//!   "users":       { "<id>": { "id", "email", "password", "is_chirpy_red" } },
//!   "chirps":      { "<id>": { "id", "author_id", "body" } },
//!   "revocations": { "<token>": { "id", "revoked_at" } },
//!   "sequences":   { "users": <last id>, "chirps": <last id> }
//! }
//! ```
//!
//! Map iteration order carries no meaning. `sequences` is optional on decode
//! so files written before it existed still load.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::repository::{Chirp, ChirpId, RefreshTokenRecord, User, UserId};
use super::{StorageError, StorageResult};

/// The full document set held in the backing file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Database {
    pub users: BTreeMap<UserId, User>,
    pub chirps: BTreeMap<ChirpId, Chirp>,
    /// Refresh-token records keyed by the token string itself.
    #[serde(rename = "revocations")]
    pub refresh_tokens: BTreeMap<String, RefreshTokenRecord>,
    #[serde(default)]
    pub sequences: Sequences,
}

/// Last identifier handed out per collection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sequences {
    #[serde(default)]
    pub users: u64,
    #[serde(default)]
    pub chirps: u64,
}

impl Database {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Allocate the next user id.
    ///
    /// Ids never go backwards, even if a file predating `sequences` is loaded
    /// or records were removed by hand.
    pub fn next_user_id(&mut self) -> UserId {
        let highest = self.users.keys().next_back().copied().unwrap_or(0);
        self.sequences.users = self.sequences.users.max(highest) + 1;
        self.sequences.users
    }

    /// Allocate the next chirp id. Deleted chirp ids are never reissued.
    pub fn next_chirp_id(&mut self) -> ChirpId {
        let highest = self.chirps.keys().next_back().copied().unwrap_or(0);
        self.sequences.chirps = self.sequences.chirps.max(highest) + 1;
        self.sequences.chirps
    }
}

/// Serialize the document set.
pub fn encode(db: &Database) -> StorageResult<Vec<u8>> {
    serde_json::to_vec(db).map_err(StorageError::Serialization)
}

/// Deserialize a document set, rejecting anything that does not match the schema.
pub fn decode(bytes: &[u8]) -> StorageResult<Database> {
    serde_json::from_slice(bytes).map_err(StorageError::CorruptData)
}

/// Serde adapter mapping `None` to the zero timestamp `0001-01-01T00:00:00Z`.
///
/// The persisted format has no null for "not revoked"; it stores the zero
/// instant instead, and any other instant means revoked at that time.
pub(crate) mod zero_time {
    use chrono::{DateTime, NaiveDate, Utc};
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn zero() -> DateTime<Utc> {
        NaiveDate::from_ymd_opt(1, 1, 1)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|naive| naive.and_utc())
            .unwrap_or(DateTime::<Utc>::MIN_UTC)
    }

    pub fn serialize<S: Serializer>(
        value: &Option<DateTime<Utc>>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        value.unwrap_or_else(zero).serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<DateTime<Utc>>, D::Error> {
        let at = DateTime::<Utc>::deserialize(deserializer)?;
        Ok((at != zero()).then_some(at))
    }
}
