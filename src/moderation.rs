// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Chirp body validation and profanity filtering.

use thiserror::Error;

/// Longest accepted chirp, counted in `char`s, not UTF-8 bytes. Earlier
/// Chirpy servers counted bytes and rejected shorter non-ASCII chirps.
pub const MAX_CHIRP_LENGTH: usize = 140;

/// Words replaced by [`CENSOR`], matched case-insensitively.
pub const BANNED_WORDS: [&str; 3] = ["kerfuffle", "sharbert", "fornax"];

pub const CENSOR: &str = "****";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChirpRejection {
    #[error("Chirp is empty")]
    Empty,
    #[error("Chirp is too long")]
    TooLong,
}

/// Check the raw body and return it with banned words masked.
pub fn clean_chirp(body: &str) -> Result<String, ChirpRejection> {
    if body.is_empty() {
        return Err(ChirpRejection::Empty);
    }
    if body.chars().count() > MAX_CHIRP_LENGTH {
        return Err(ChirpRejection::TooLong);
    }
    Ok(censor(body))
}

/// Mask banned words. Only whole words split on single spaces match, so
/// "Fornax!" survives while "FORNAX" does not.
pub fn censor(body: &str) -> String {
    body.split(' ')
        .map(|word| {
            let lowered = word.to_lowercase();
            if BANNED_WORDS.contains(&lowered.as_str()) {
                CENSOR
            } else {
                word
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
