//! Parsing of raw parameter text
//!
//! Callers hand over path and form values exactly as received. Anything
//! that is not an integer becomes a [`CatalogError::Validation`].

use crate::error::{CatalogError, CatalogResult};
use songbook_common::SongId;
use std::num::IntErrorKind;

/// Parse integer text, tolerating surrounding whitespace and a sign
pub fn parse_integer(field: &'static str, text: &str) -> CatalogResult<i64> {
    text.trim()
        .parse::<i64>()
        .map_err(|_| CatalogError::validation(field, text))
}

/// Parse a page number; an absent page means page 1
pub fn parse_page(text: Option<&str>) -> CatalogResult<i64> {
    match text {
        Some(text) => parse_integer("page", text),
        None => Ok(1),
    }
}

/// Parse a level filter; an absent level means 0 ("all levels")
pub fn parse_level(text: Option<&str>) -> CatalogResult<i64> {
    match text {
        Some(text) => parse_integer("level", text),
        None => Ok(0),
    }
}

/// Parse a rating
///
/// Integer text beyond `i64` saturates, so it fails the 1..=5 range check
/// instead of being reported as malformed.
pub fn parse_rating(text: &str) -> CatalogResult<i64> {
    match text.trim().parse::<i64>() {
        Ok(value) => Ok(value),
        Err(e) => match e.kind() {
            IntErrorKind::PosOverflow => Ok(i64::MAX),
            IntErrorKind::NegOverflow => Ok(i64::MIN),
            _ => Err(CatalogError::validation("rating", text)),
        },
    }
}

/// Parse a song id
pub fn parse_song_id(text: &str) -> CatalogResult<SongId> {
    text.parse::<SongId>()
        .map_err(|_| CatalogError::validation("song_id", text))
}
