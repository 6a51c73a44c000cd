// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Ownership enforcement for author-only mutations.
//!
//! Ownership is an identity check, not a tier or role check: the stored
//! author id must equal the authenticated subject.

use crate::auth::AuthenticatedUser;

use super::repository::UserId;
use super::{StorageError, StorageResult};

/// Trait for resources that have an owner.
pub trait OwnedResource {
    /// Get the owner's user ID.
    fn owner_id(&self) -> UserId;

    /// Human-readable label used in errors and logs.
    fn resource_label(&self) -> String;
}

/// Trait for enforcing ownership on storage operations.
pub trait OwnershipEnforcer {
    /// Verify that the user owns this resource.
    ///
    /// # Errors
    /// Returns `StorageError::Forbidden` if the user doesn't own the resource.
    fn verify_ownership(&self, user: &AuthenticatedUser) -> StorageResult<()>;
}

impl<T: OwnedResource> OwnershipEnforcer for T {
    fn verify_ownership(&self, user: &AuthenticatedUser) -> StorageResult<()> {
        if self.owner_id() == user.user_id {
            Ok(())
        } else {
            Err(StorageError::Forbidden {
                user_id: user.user_id,
                resource: self.resource_label(),
            })
        }
    }
}
