//! Free-text search over artist and title

use axum::{
    extract::{Path, State},
    Json,
};

use super::songs::SongPageResponse;
use crate::error::CatalogResult;
use crate::AppState;

fn search_path(query: &str) -> String {
    format!("/songs/search/{}/", query)
}

/// GET /songs/search/:query
pub async fn search_songs(
    State(state): State<AppState>,
    Path(query): Path<String>,
) -> CatalogResult<Json<SongPageResponse>> {
    let page = state.catalog.search_songs(&query, None).await?;
    Ok(Json(SongPageResponse::new(page, search_path(&query))))
}

/// GET /songs/search/:query/:page
pub async fn search_songs_page(
    State(state): State<AppState>,
    Path((query, page_text)): Path<(String, String)>,
) -> CatalogResult<Json<SongPageResponse>> {
    let page = state.catalog.search_songs(&query, Some(&page_text)).await?;
    Ok(Json(SongPageResponse::new(page, search_path(&query))))
}
