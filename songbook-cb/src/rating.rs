//! Song rating
//!
//! Read, validate, then write. The existence check and the update are two
//! separate store calls with nothing locking the song in between, so two
//! raters racing on one song simply leave the last rating written.

use serde::Serialize;
use songbook_common::{Rating, Song};
use tracing::{info, warn};

use crate::error::{CatalogError, CatalogResult};
use crate::params::{parse_rating, parse_song_id};
use crate::store::{FieldUpdate, SongStore};

/// Outcome of a successful rating
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RatingConfirmation {
    /// The song as it reads after the update
    pub song: Song,
    pub rating: Rating,
    pub message: String,
}

/// Record `rating_text` against the song identified by `song_id_text`
///
/// Checks run in this order: rating is an integer, id resolves to a song,
/// rating is within 1..=5.
pub async fn rate_song(
    store: &dyn SongStore,
    song_id_text: &str,
    rating_text: &str,
) -> CatalogResult<RatingConfirmation> {
    let value = parse_rating(rating_text)?;
    let id = parse_song_id(song_id_text)?;

    let mut song = store
        .find_all()
        .await?
        .into_iter()
        .find(|song| song.id == id)
        .ok_or_else(|| CatalogError::NotFound(id.to_string()))?;

    let rating = Rating::try_from(value).map_err(|_| CatalogError::Range(value))?;

    let updated = store.update_field(id, FieldUpdate::Rating(rating)).await?;
    if updated == 0 {
        warn!("Song {} disappeared before its rating was written", id);
        return Err(CatalogError::NotFound(id.to_string()));
    }

    info!("Rated song {} ({} by {}): {}", id, song.title, song.artist, rating);

    song.rating = Some(rating);
    let message = format!(
        "Rating {} to the song {} by {} has been added",
        rating, song.title, song.artist
    );

    Ok(RatingConfirmation {
        song,
        rating,
        message,
    })
}
