// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Chirpy - short-post HTTP service
//!
//! Users, chirps and refresh-token revocations live in a single JSON file;
//! sessions are HS256 access/refresh token pairs.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers (Axum)
//! - `auth` - Credentials and session tokens
//! - `moderation` - Chirp length rules and profanity filter
//! - `storage` - Single-file JSON document store

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod moderation;
pub mod state;
pub mod storage;
