// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! Accounts, passwords and session tokens for the Chirpy API.
//!
//! ## Auth Flow
//!
//! 1. `POST /api/login` checks email + password (bcrypt) and returns an
//!    access token (1 hour) and a refresh token (60 days)
//! 2. Clients send `Authorization: Bearer <access token>` on protected routes
//! 3. `POST /api/refresh` trades an unrevoked refresh token for a new access token
//! 4. `POST /api/revoke` revokes a refresh token for good
//!
//! ## Security
//!
//! - Login failures never reveal whether the email or the password was wrong
//! - Access and refresh tokens are told apart by their issuer claim and are
//!   never accepted in each other's place
//! - Refresh-token revocation is persisted in the document store

pub mod claims;
pub mod credentials;
pub mod error;
pub mod extractor;
pub mod tokens;

pub use claims::{AuthenticatedUser, SessionClaims, TokenKind};
pub use credentials::CredentialManager;
pub use error::AuthError;
pub use extractor::{ApiKey, Auth, BearerToken};
pub use tokens::{SessionPair, TokenIssuer};
