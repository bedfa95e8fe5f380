//! Song listing
//!
//! `/`, `/songs` and `/songs/:page` all render one page of the catalog.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;
use songbook_common::Song;

use crate::error::CatalogResult;
use crate::service::SongPage;
use crate::AppState;

/// Envelope for any page of songs
#[derive(Debug, Serialize)]
pub struct SongPageResponse {
    pub page: &'static str,
    pub songs: Vec<Song>,
    pub total_pages: usize,
    pub current_page: usize,
    /// Prefix the client appends a page number to
    pub path: String,
}

impl SongPageResponse {
    pub fn new(page: SongPage, path: impl Into<String>) -> Self {
        Self {
            page: "songs",
            songs: page.songs,
            total_pages: page.total_pages,
            current_page: page.current_page,
            path: path.into(),
        }
    }
}

/// GET / and GET /songs
pub async fn list_songs(State(state): State<AppState>) -> CatalogResult<Json<SongPageResponse>> {
    let page = state.catalog.list_songs(None).await?;
    Ok(Json(SongPageResponse::new(page, "/songs/")))
}

/// GET /songs/:page
pub async fn list_songs_page(
    State(state): State<AppState>,
    Path(page_text): Path<String>,
) -> CatalogResult<Json<SongPageResponse>> {
    let page = state.catalog.list_songs(Some(&page_text)).await?;
    Ok(Json(SongPageResponse::new(page, "/songs/")))
}
