//! songbook-cb library - Catalog Browser module
//!
//! Browse, search, average and rate songs held by a [`store::SongStore`].

use axum::Router;
use tower_http::trace::TraceLayer;

pub mod aggregate;
pub mod api;
pub mod error;
pub mod pagination;
pub mod params;
pub mod rating;
pub mod seed;
pub mod service;
pub mod store;

pub use error::{CatalogError, CatalogResult};
pub use service::CatalogService;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    pub catalog: CatalogService,
}

impl AppState {
    pub fn new(catalog: CatalogService) -> Self {
        Self { catalog }
    }
}

/// Build application router
///
/// Static segments win over captures, so `/songs/search/...` and
/// `/songs/avg/...` never reach the `/songs/:page` handler. Every catalog
/// route also answers with a trailing slash.
pub fn build_router(state: AppState) -> Router {
    use axum::routing::{get, post};

    let songs = Router::new()
        .route("/", get(api::list_songs))
        .route("/songs", get(api::list_songs))
        .route("/songs/", get(api::list_songs))
        .route("/songs/:page", get(api::list_songs_page))
        .route("/songs/:page/", get(api::list_songs_page))
        .route("/songs/search/:query", get(api::search_songs))
        .route("/songs/search/:query/", get(api::search_songs))
        .route("/songs/search/:query/:page", get(api::search_songs_page))
        .route("/songs/search/:query/:page/", get(api::search_songs_page))
        .route("/songs/avg/difficulty", get(api::average_difficulty))
        .route("/songs/avg/difficulty/", get(api::average_difficulty))
        .route("/songs/avg/difficulty/:level", get(api::average_difficulty_on_level))
        .route("/songs/avg/difficulty/:level/", get(api::average_difficulty_on_level))
        .route("/songs/rating", post(api::rate_song))
        .route("/songs/rating/", post(api::rate_song));

    Router::new()
        .merge(songs)
        .merge(api::health_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
