// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! This module defines environment variable names and default values used
//! throughout the application. Configuration is loaded from the environment
//! once at startup.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `DB_PATH` | JSON database file | `./database.json` |
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `JWT_SECRET` | HS256 signing secret for session tokens | Required |
//! | `POLKA_KEY` | API key expected on payment webhooks | `POLKA_API_KEY`, else empty (all rejected) |
//! | `ASSETS_DIR` | Static file root served under `/app` | `.` |
//! | `BCRYPT_COST` | bcrypt work factor, 4 to 31 | `12` |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |
//!
//! `main` first loads a `.env` file from the working directory or a parent, if present.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

use thiserror::Error;

/// Environment variable name for the database file path.
pub const DB_PATH_ENV: &str = "DB_PATH";

/// Default database file, relative to the working directory.
pub const DEFAULT_DB_PATH: &str = "./database.json";

pub const HOST_ENV: &str = "HOST";
pub const DEFAULT_HOST: &str = "0.0.0.0";

pub const PORT_ENV: &str = "PORT";
pub const DEFAULT_PORT: u16 = 8080;

/// Environment variable name for the token signing secret.
/// No default; startup fails without it.
pub const JWT_SECRET_ENV: &str = "JWT_SECRET";

/// Environment variable name for the Polka webhook API key.
pub const POLKA_KEY_ENV: &str = "POLKA_KEY";

/// Older name for [`POLKA_KEY_ENV`], read when the new one is unset.
pub const LEGACY_POLKA_KEY_ENV: &str = "POLKA_API_KEY";

pub const ASSETS_DIR_ENV: &str = "ASSETS_DIR";
pub const DEFAULT_ASSETS_DIR: &str = ".";

pub const BCRYPT_COST_ENV: &str = "BCRYPT_COST";

pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

/// Default tracing filter when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "info,tower_http=debug";

/// Errors raised while reading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("invalid value for {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Fully resolved server configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub db_path: PathBuf,
    pub host: String,
    pub port: u16,
    pub jwt_secret: String,
    /// Empty means no webhook call is ever accepted.
    pub polka_key: String,
    pub assets_dir: PathBuf,
    pub bcrypt_cost: u32,
    pub log_format: LogFormat,
}

impl AppConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Read configuration through `lookup`, which maps a variable name to its value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let jwt_secret = lookup(JWT_SECRET_ENV)
            .filter(|s| !s.is_empty())
            .ok_or(ConfigError::Missing(JWT_SECRET_ENV))?;

        let port = match lookup(PORT_ENV) {
            Some(raw) => raw.parse().map_err(|e| ConfigError::Invalid {
                name: PORT_ENV,
                reason: format!("{e}"),
            })?,
            None => DEFAULT_PORT,
        };

        let bcrypt_cost = match lookup(BCRYPT_COST_ENV) {
            Some(raw) => {
                let cost: u32 = raw.parse().map_err(|e| ConfigError::Invalid {
                    name: BCRYPT_COST_ENV,
                    reason: format!("{e}"),
                })?;
                if !(4..=31).contains(&cost) {
                    return Err(ConfigError::Invalid {
                        name: BCRYPT_COST_ENV,
                        reason: format!("{cost} is outside 4..=31"),
                    });
                }
                cost
            }
            None => bcrypt::DEFAULT_COST,
        };

        let log_format = match lookup(LOG_FORMAT_ENV).as_deref() {
            None | Some("pretty") => LogFormat::Pretty,
            Some("json") => LogFormat::Json,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    name: LOG_FORMAT_ENV,
                    reason: format!("expected json or pretty, got {other}"),
                })
            }
        };

        Ok(Self {
            db_path: PathBuf::from(lookup(DB_PATH_ENV).unwrap_or_else(|| DEFAULT_DB_PATH.into())),
            host: lookup(HOST_ENV).unwrap_or_else(|| DEFAULT_HOST.into()),
            port,
            jwt_secret,
            polka_key: lookup(POLKA_KEY_ENV)
                .or_else(|| lookup(LEGACY_POLKA_KEY_ENV))
                .unwrap_or_default(),
            assets_dir: PathBuf::from(
                lookup(ASSETS_DIR_ENV).unwrap_or_else(|| DEFAULT_ASSETS_DIR.into()),
            ),
            bcrypt_cost,
            log_format,
        })
    }

    /// Socket address to bind.
    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| ConfigError::Invalid {
                name: HOST_ENV,
                reason: format!("{e}"),
            })
    }
}
