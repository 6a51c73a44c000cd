// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Account creation and password verification.
//!
//! Passwords are hashed with bcrypt before they reach the store. A lookup
//! miss still runs one bcrypt verification against a decoy hash, so an
//! unknown email costs the same time as a wrong password.

use std::sync::{Arc, OnceLock};

use super::AuthError;
use crate::storage::{StorageError, Store, User, UserId, UserRepository};

/// Creates accounts and checks credentials.
pub struct CredentialManager {
    store: Arc<Store>,
    cost: u32,
    decoy_hash: OnceLock<String>,
}

impl CredentialManager {
    /// Use a specific bcrypt work factor (4–31).
    pub fn with_cost(store: Arc<Store>, cost: u32) -> Self {
        Self {
            store,
            cost,
            decoy_hash: OnceLock::new(),
        }
    }

    /// Register a new account. Fails with `DuplicateEmail` if the email is taken.
    pub fn create_account(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let password_hash = self.hash(password)?;
        let user = UserRepository::new(&self.store).create(email, &password_hash)?;
        tracing::info!(user_id = user.id, "Account created");
        Ok(user)
    }

    /// Check an email/password pair.
    ///
    /// Unknown email and wrong password both yield `AuthFailed`.
    pub fn verify_credential(&self, email: &str, password: &str) -> Result<User, AuthError> {
        match UserRepository::new(&self.store).find_by_email(email) {
            Ok(user) => {
                if bcrypt::verify(password, &user.password).unwrap_or(false) {
                    Ok(user)
                } else {
                    tracing::debug!(user_id = user.id, "Password mismatch");
                    Err(AuthError::AuthFailed)
                }
            }
            Err(StorageError::NotFound(_)) => {
                let _ = bcrypt::verify(password, self.decoy_hash());
                Err(AuthError::AuthFailed)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Grant the upgraded tier.
    pub fn upgrade_tier(&self, user_id: UserId) -> Result<User, AuthError> {
        let user = UserRepository::new(&self.store).upgrade(user_id)?;
        tracing::info!(user_id, "Account upgraded to Chirpy Red");
        Ok(user)
    }

    /// Replace email and password; the tier flag is preserved.
    pub fn update_profile(
        &self,
        user_id: UserId,
        email: &str,
        password: &str,
    ) -> Result<User, AuthError> {
        let password_hash = self.hash(password)?;
        let user = UserRepository::new(&self.store).update_profile(user_id, email, &password_hash)?;
        tracing::info!(user_id, "Profile updated");
        Ok(user)
    }

    fn hash(&self, password: &str) -> Result<String, AuthError> {
        bcrypt::hash(password, self.cost).map_err(|e| AuthError::Hashing(e.to_string()))
    }

    fn decoy_hash(&self) -> &str {
        self.decoy_hash
            .get_or_init(|| bcrypt::hash("decoy-password", self.cost).unwrap_or_default())
    }
}
