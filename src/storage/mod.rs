// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Document Storage
//!
//! Persistent storage for users, chirps and refresh-token revocations in a
//! single JSON file.
//!
//! ## Layers
//!
//! - [`codec`] - the document set and its JSON encoding
//! - [`store`] - file access, locking and read-modify-write cycles
//! - [`repository`] - per-entity operations on top of the store
//! - [`ownership`] - author checks for mutations
//!
//! The file is the only source of truth. Nothing is cached in memory between
//! operations, and every mutation reloads the file before writing it back.

pub mod codec;
pub mod ownership;
pub mod repository;
pub mod store;

pub use codec::Database;
pub use ownership::{OwnedResource, OwnershipEnforcer};
pub use repository::{
    Chirp, ChirpId, ChirpRepository, RefreshTokenRecord, RefreshTokenRepository, SortOrder, User,
    UserId, UserRepository,
};
pub use store::{StorageError, StorageResult, Store};
