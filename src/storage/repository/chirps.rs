// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Chirp repository.
//!
//! Bodies arrive here already validated and cleaned; the repository stores
//! whatever it is given.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::super::{OwnedResource, StorageError, StorageResult, Store};
use super::UserId;

/// Numeric chirp identifier.
pub type ChirpId = u64;

/// A stored chirp.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct Chirp {
    /// Chirp identifier.
    pub id: ChirpId,
    /// ID of the user who posted it.
    pub author_id: UserId,
    /// Cleaned chirp text.
    pub body: String,
}

impl OwnedResource for Chirp {
    fn owner_id(&self) -> UserId {
        self.author_id
    }

    fn resource_label(&self) -> String {
        format!("chirp {}", self.id)
    }
}

/// Listing order by chirp id.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

/// Repository for chirp operations.
pub struct ChirpRepository<'a> {
    store: &'a Store,
}

impl<'a> ChirpRepository<'a> {
    pub fn new(store: &'a Store) -> Self {
        Self { store }
    }

    pub fn create(&self, author_id: UserId, body: &str) -> StorageResult<Chirp> {
        self.store.mutate(|db| {
            let id = db.next_chirp_id();
            let chirp = Chirp {
                id,
                author_id,
                body: body.to_string(),
            };
            db.chirps.insert(id, chirp.clone());
            Ok(chirp)
        })
    }

    pub fn get(&self, id: ChirpId) -> StorageResult<Chirp> {
        self.store
            .load()?
            .chirps
            .remove(&id)
            .ok_or_else(|| StorageError::NotFound(format!("chirp {id}")))
    }

    /// All chirps, optionally restricted to one author, in the given order.
    pub fn list(&self, author_id: Option<UserId>, order: SortOrder) -> StorageResult<Vec<Chirp>> {
        let mut chirps: Vec<Chirp> = self
            .store
            .load()?
            .chirps
            .into_values()
            .filter(|chirp| author_id.is_none_or(|author| chirp.author_id == author))
            .collect();
        if order == SortOrder::Desc {
            chirps.reverse();
        }
        Ok(chirps)
    }

    /// Remove a chirp and return what was removed.
    pub fn delete(&self, id: ChirpId) -> StorageResult<Chirp> {
        self.store.mutate(|db| {
            db.chirps
                .remove(&id)
                .ok_or_else(|| StorageError::NotFound(format!("chirp {id}")))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn test_store() -> (Store, TempDir) {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let store = Store::open(dir.path().join("db.json")).expect("Failed to open store");
        (store, dir)
    }

    fn ids(chirps: &[Chirp]) -> Vec<ChirpId> {
        chirps.iter().map(|c| c.id).collect()
    }

    #[test]
    fn create_and_get_chirp() {
        let (store, _dir) = test_store();
        let repo = ChirpRepository::new(&store);

        let chirp = repo.create(3, "hello world").unwrap();
        assert_eq!(chirp.id, 1);
        assert_eq!(repo.get(1).unwrap(), chirp);
    }

    #[test]
    fn list_sorts_and_filters() {
        let (store, _dir) = test_store();
        let repo = ChirpRepository::new(&store);
        for author in [1, 2, 1, 2, 1] {
            repo.create(author, "x").unwrap();
        }

        assert_eq!(ids(&repo.list(None, SortOrder::Asc).unwrap()), vec![1, 2, 3, 4, 5]);
        assert_eq!(ids(&repo.list(None, SortOrder::Desc).unwrap()), vec![5, 4, 3, 2, 1]);
        assert_eq!(ids(&repo.list(Some(1), SortOrder::Asc).unwrap()), vec![1, 3, 5]);
        assert_eq!(ids(&repo.list(Some(2), SortOrder::Desc).unwrap()), vec![4, 2]);
        assert!(repo.list(Some(9), SortOrder::Asc).unwrap().is_empty());
    }

    #[test]
    fn ids_sort_numerically_past_nine() {
        let (store, _dir) = test_store();
        let repo = ChirpRepository::new(&store);
        for _ in 0..11 {
            repo.create(1, "x").unwrap();
        }

        let listed = ids(&repo.list(None, SortOrder::Asc).unwrap());
        assert_eq!(listed, (1..=11).collect::<Vec<_>>());
    }

    #[test]
    fn delete_removes_and_never_reuses_id() {
        let (store, _dir) = test_store();
        let repo = ChirpRepository::new(&store);
        repo.create(1, "first").unwrap();
        let second = repo.create(1, "second").unwrap();

        assert_eq!(repo.delete(second.id).unwrap(), second);
        assert!(matches!(repo.get(second.id), Err(StorageError::NotFound(_))));
        assert!(matches!(repo.delete(second.id), Err(StorageError::NotFound(_))));

        let third = repo.create(1, "third").unwrap();
        assert_eq!(third.id, 3);
    }

    #[test]
    fn sort_order_parses_lowercase() {
        let asc: SortOrder = serde_json::from_str("\"asc\"").unwrap();
        let desc: SortOrder = serde_json::from_str("\"desc\"").unwrap();
        assert_eq!(asc, SortOrder::Asc);
        assert_eq!(desc, SortOrder::Desc);
        assert_eq!(SortOrder::default(), SortOrder::Asc);
    }
}
