//! Rating submission

use axum::{extract::State, Form, Json};
use serde::{Deserialize, Serialize};
use songbook_common::Song;

use crate::error::CatalogResult;
use crate::AppState;

/// Form body of POST /songs/rating
///
/// Both fields stay raw text; a missing field is treated as empty.
#[derive(Debug, Default, Deserialize)]
pub struct RatingForm {
    #[serde(default)]
    pub song_id: String,
    #[serde(default)]
    pub rating: String,
}

#[derive(Debug, Serialize)]
pub struct RatingResponse {
    pub page: &'static str,
    pub message: String,
    pub song: Song,
}

/// POST /songs/rating
pub async fn rate_song(
    State(state): State<AppState>,
    Form(form): Form<RatingForm>,
) -> CatalogResult<Json<RatingResponse>> {
    let confirmation = state.catalog.rate(&form.song_id, &form.rating).await?;

    Ok(Json(RatingResponse {
        page: "message",
        message: confirmation.message,
        song: confirmation.song,
    }))
}
