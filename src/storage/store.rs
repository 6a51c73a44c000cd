// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Single-file JSON document store.
//!
//! ## Locking
//!
//! - `load()` takes the file lock shared; concurrent loads never block each other.
//! - `save()` takes the file lock exclusive for the duration of the write.
//! - `mutate()` additionally holds the mutation lock across the whole
//!   load → compute → save sequence, so two writers can never both start from
//!   the same snapshot and silently drop one another's changes.
//!
//! Nothing is cached between calls: every read goes to disk and every
//! mutation starts from a fresh load.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use parking_lot::{Mutex, RwLock};
use thiserror::Error;

use super::codec::{self, Database};

/// Error type for store operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The backing file could not be created at startup.
    #[error("failed to initialize store at {path}: {source}")]
    Init {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// I/O error while reading or writing the backing file.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    /// The backing file does not match the document schema.
    #[error("corrupt database file: {0}")]
    CorruptData(#[source] serde_json::Error),
    /// The document set could not be serialized.
    #[error("serialization error: {0}")]
    Serialization(#[source] serde_json::Error),
    /// Lookup miss.
    #[error("{0} not found")]
    NotFound(String),
    /// Email uniqueness violation.
    #[error("an account with email {0} already exists")]
    DuplicateEmail(String),
    /// The caller does not own the resource.
    #[error("user {user_id} may not modify {resource}")]
    Forbidden { user_id: u64, resource: String },
}

/// Result type for store operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Gateway to the backing JSON file. All reads and writes go through here.
#[derive(Debug)]
pub struct Store {
    path: PathBuf,
    file_lock: RwLock<()>,
    mutation_lock: Mutex<()>,
}

impl Store {
    /// Create a store for `path`. Does not touch the filesystem; call `ensure()`.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            file_lock: RwLock::new(()),
            mutation_lock: Mutex::new(()),
        }
    }

    /// Create the store and make sure its backing file exists.
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        let store = Self::new(path);
        store.ensure()?;
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Sibling file written by `save` before it is renamed over `path`.
    pub fn temp_path(&self) -> PathBuf {
        self.path.with_extension("tmp")
    }

    /// Create the backing file with an empty document set if it is missing.
    ///
    /// Any error other than "not found" while probing the file is fatal.
    pub fn ensure(&self) -> StorageResult<()> {
        match fs::metadata(&self.path) {
            Ok(_) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                let _guard = self.mutation_lock.lock();
                self.save(&Database::empty()).map_err(|e| match e {
                    StorageError::Io(source) => StorageError::Init {
                        path: self.path.clone(),
                        source,
                    },
                    other => other,
                })?;
                tracing::info!(path = %self.path.display(), "Created empty database file");
                Ok(())
            }
            Err(source) => Err(StorageError::Init {
                path: self.path.clone(),
                source,
            }),
        }
    }

    /// Overwrite the backing file with an empty document set.
    pub fn reset(&self) -> StorageResult<()> {
        let _guard = self.mutation_lock.lock();
        self.save(&Database::empty())?;
        tracing::warn!(path = %self.path.display(), "Database reset");
        Ok(())
    }

    /// Read and decode the whole document set.
    pub fn load(&self) -> StorageResult<Database> {
        let bytes = {
            let _read = self.file_lock.read();
            fs::read(&self.path)?
        };
        codec::decode(&bytes)
    }

    /// Encode and replace the whole document set.
    ///
    /// Writes a sibling temp file and renames it over the target, so a failed
    /// write leaves the previous content in place.
    pub fn save(&self, db: &Database) -> StorageResult<()> {
        let bytes = codec::encode(db)?;
        let temp_path = self.temp_path();

        let _write = self.file_lock.write();
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let result = (|| -> io::Result<()> {
            let file = File::create(&temp_path)?;
            let mut writer = BufWriter::new(file);
            writer.write_all(&bytes)?;
            writer.flush()?;
            writer.get_ref().sync_all()?;
            fs::rename(&temp_path, &self.path)
        })();

        if let Err(e) = result {
            let _ = fs::remove_file(&temp_path);
            return Err(e.into());
        }
        Ok(())
    }

    /// Run a read-modify-write cycle over the whole document set.
    ///
    /// `f` sees a freshly loaded copy. If it returns an error nothing is
    /// written; otherwise the modified set is saved before the value is
    /// handed back.
    pub fn mutate<T>(&self, f: impl FnOnce(&mut Database) -> StorageResult<T>) -> StorageResult<T> {
        let _guard = self.mutation_lock.lock();
        let mut db = self.load()?;
        let value = f(&mut db)?;
        self.save(&db)?;
        Ok(value)
    }
}
