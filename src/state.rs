// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::auth::{CredentialManager, TokenIssuer};
use crate::config::AppConfig;
use crate::storage::Store;

/// Counts requests served from `/app`.
#[derive(Debug, Clone, Default)]
pub struct HitCounter(Arc<AtomicU64>);

impl HitCounter {
    pub fn increment(&self) {
        self.0.fetch_add(1, Ordering::Relaxed);
    }

    pub fn get(&self) -> u64 {
        self.0.load(Ordering::Relaxed)
    }

    pub fn reset(&self) {
        self.0.store(0, Ordering::Relaxed);
    }
}

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub store: Arc<Store>,
    pub credentials: Arc<CredentialManager>,
    pub tokens: Arc<TokenIssuer>,
    pub hits: HitCounter,
}

impl AppState {
    pub fn new(config: AppConfig, store: Arc<Store>) -> Self {
        let credentials = CredentialManager::with_cost(Arc::clone(&store), config.bcrypt_cost);
        let tokens = TokenIssuer::new(Arc::clone(&store), &config.jwt_secret);
        Self {
            config: Arc::new(config),
            store,
            credentials: Arc::new(credentials),
            tokens: Arc::new(tokens),
            hits: HitCounter::default(),
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::config::LogFormat;
    use tempfile::TempDir;

    pub const TEST_POLKA_KEY: &str = "test-polka-key";

    pub fn test_config(dir: &TempDir) -> AppConfig {
        AppConfig {
            db_path: dir.path().join("database.json"),
            host: "127.0.0.1".into(),
            port: 0,
            jwt_secret: "test-secret-key-12345".into(),
            polka_key: TEST_POLKA_KEY.into(),
            assets_dir: dir.path().to_path_buf(),
            bcrypt_cost: 4,
            log_format: LogFormat::Pretty,
        }
    }

    /// State backed by a fresh database in a temp dir. Keep the dir alive.
    pub fn test_state() -> (AppState, TempDir) {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let config = test_config(&dir);
        let store = Arc::new(Store::open(&config.db_path).expect("Failed to open store"));
        (AppState::new(config, store), dir)
    }
}
