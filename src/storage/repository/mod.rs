// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Repository layer providing typed access to the document store.
//!
//! Each repository borrows the [`Store`](super::Store) and expresses its
//! operations as whole-file loads or `mutate` cycles.

pub mod chirps;
pub mod refresh_tokens;
pub mod users;

pub use chirps::{Chirp, ChirpId, ChirpRepository, SortOrder};
pub use refresh_tokens::{RefreshTokenRecord, RefreshTokenRepository};
pub use users::{User, UserId, UserRepository};
