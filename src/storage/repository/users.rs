// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! User repository.
//!
//! Users are never deleted. Email uniqueness is checked inside the same
//! mutation that writes, so it holds even under concurrent sign-ups.

use serde::{Deserialize, Serialize};

use super::super::codec::Database;
use super::super::{StorageError, StorageResult, Store};

/// Numeric account identifier.
pub type UserId = u64;

/// Account as persisted. `password` is always a bcrypt hash.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub password: String,
    pub is_chirpy_red: bool,
}

/// Repository for user operations.
pub struct UserRepository<'a> {
    store: &'a Store,
}

impl<'a> UserRepository<'a> {
    pub fn new(store: &'a Store) -> Self {
        Self { store }
    }

    /// Create a user from an already hashed password.
    pub fn create(&self, email: &str, password_hash: &str) -> StorageResult<User> {
        self.store.mutate(|db| {
            ensure_email_free(db, email, None)?;

            let id = db.next_user_id();
            let user = User {
                id,
                email: email.to_string(),
                password: password_hash.to_string(),
                is_chirpy_red: false,
            };
            db.users.insert(id, user.clone());
            Ok(user)
        })
    }

    pub fn get(&self, id: UserId) -> StorageResult<User> {
        self.store
            .load()?
            .users
            .remove(&id)
            .ok_or_else(|| StorageError::NotFound(format!("user {id}")))
    }

    /// Exact, case-sensitive email lookup.
    pub fn find_by_email(&self, email: &str) -> StorageResult<User> {
        self.store
            .load()?
            .users
            .into_values()
            .find(|user| user.email == email)
            .ok_or_else(|| StorageError::NotFound("user with that email".to_string()))
    }

    /// All users in ascending id order.
    pub fn list(&self) -> StorageResult<Vec<User>> {
        Ok(self.store.load()?.users.into_values().collect())
    }

    /// Replace email and password hash, keeping the tier flag.
    pub fn update_profile(
        &self,
        id: UserId,
        email: &str,
        password_hash: &str,
    ) -> StorageResult<User> {
        self.store.mutate(|db| {
            ensure_email_free(db, email, Some(id))?;

            let user = db
                .users
                .get_mut(&id)
                .ok_or_else(|| StorageError::NotFound(format!("user {id}")))?;
            user.email = email.to_string();
            user.password = password_hash.to_string();
            Ok(user.clone())
        })
    }

    /// Grant the Chirpy Red tier. Upgrading twice is harmless.
    pub fn upgrade(&self, id: UserId) -> StorageResult<User> {
        self.store.mutate(|db| {
            let user = db
                .users
                .get_mut(&id)
                .ok_or_else(|| StorageError::NotFound(format!("user {id}")))?;
            user.is_chirpy_red = true;
            Ok(user.clone())
        })
    }
}

fn ensure_email_free(db: &Database, email: &str, owner: Option<UserId>) -> StorageResult<()> {
    let taken = db
        .users
        .values()
        .any(|user| user.email == email && Some(user.id) != owner);
    if taken {
        Err(StorageError::DuplicateEmail(email.to_string()))
    } else {
        Ok(())
    }
}
