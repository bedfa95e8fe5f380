//! Catalog query service
//!
//! Entry point for the caller layer: takes raw parameter text, pulls songs
//! from the injected store, and hands back typed results or a
//! [`CatalogError`] carrying the user-facing message.

use serde::Serialize;
use songbook_common::Song;
use std::num::NonZeroUsize;
use std::sync::Arc;
use tracing::debug;

use crate::aggregate::{average_by_level, Aggregate, LevelScope};
use crate::error::CatalogResult;
use crate::pagination::Page;
use crate::params::{parse_level, parse_page};
use crate::rating::{rate_song, RatingConfirmation};
use crate::store::SongStore;

/// One page of songs
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SongPage {
    pub songs: Vec<Song>,
    pub total_pages: usize,
    pub current_page: usize,
}

impl From<Page<Song>> for SongPage {
    fn from(page: Page<Song>) -> Self {
        Self {
            songs: page.items,
            total_pages: page.total_pages,
            current_page: page.current_page,
        }
    }
}

/// Difficulty statistics with their rendered summary
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DifficultySummary {
    pub scope: LevelScope,
    pub stats: Aggregate,
    pub message: String,
}

#[derive(Clone)]
pub struct CatalogService {
    store: Arc<dyn SongStore>,
    page_size: NonZeroUsize,
}

impl CatalogService {
    pub fn new(store: Arc<dyn SongStore>, page_size: NonZeroUsize) -> Self {
        Self { store, page_size }
    }

    /// List all songs, one page at a time
    ///
    /// `page_text` of `None` means the first page.
    pub async fn list_songs(&self, page_text: Option<&str>) -> CatalogResult<SongPage> {
        let page = parse_page(page_text)?;
        let songs = self.store.find_all().await?;

        Ok(Page::from_results(songs, page, self.page_size).into())
    }

    /// Free-text search over artist and title, paginated like the listing
    ///
    /// No matches is an empty page with `total_pages == 0`, not an error.
    pub async fn search_songs(
        &self,
        query: &str,
        page_text: Option<&str>,
    ) -> CatalogResult<SongPage> {
        let page = parse_page(page_text)?;
        let matches = self.store.find_by_text_query(query).await?;
        debug!("Search {:?} found {} songs", query, matches.len());

        Ok(Page::from_results(matches, page, self.page_size).into())
    }

    /// Average difficulty, optionally restricted to one level
    ///
    /// `level_text` of `None` or `"0"` means all levels, and so does a level
    /// no song has.
    pub async fn average_difficulty(
        &self,
        level_text: Option<&str>,
    ) -> CatalogResult<DifficultySummary> {
        let level = parse_level(level_text)?;
        let songs = self.store.find_all().await?;

        let (scope, stats) = average_by_level(&songs, level)?;
        let message = summary_message(scope, &stats);

        Ok(DifficultySummary {
            scope,
            stats,
            message,
        })
    }

    /// Rate one song with an integer from 1 to 5
    pub async fn rate(&self, song_id: &str, rating_text: &str) -> CatalogResult<RatingConfirmation> {
        rate_song(self.store.as_ref(), song_id, rating_text).await
    }
}

fn summary_message(scope: LevelScope, stats: &Aggregate) -> String {
    let difficulties = stats
        .items
        .iter()
        .map(|d| d.to_string())
        .collect::<Vec<_>>()
        .join(", ");

    match scope {
        LevelScope::AllLevels => format!(
            "There are {} songs on all levels with difficulties of {} (sum is {}), and their average is rounded {}",
            stats.count, difficulties, stats.sum, stats.average
        ),
        LevelScope::Level(level) => format!(
            "There are {} songs on the level number {}, with difficulties of {} (sum is {}), and their average is rounded {}",
            stats.count, level, difficulties, stats.sum, stats.average
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CatalogError;
    use crate::store::{MemorySongStore, SEARCH_FIELDS};
    use songbook_common::NewSong;

    async fn service(songs: Vec<NewSong>, page_size: usize) -> CatalogService {
        let store = MemorySongStore::new();
        store.bulk_insert(songs).await.unwrap();
        store.ensure_text_index(&SEARCH_FIELDS).await.unwrap();
        CatalogService::new(Arc::new(store), NonZeroUsize::new(page_size).unwrap())
    }

    fn scenario() -> Vec<NewSong> {
        vec![
            NewSong::new("A", "X").with_level(1).with_difficulty(2.0),
            NewSong::new("B", "Y").with_level(1).with_difficulty(4.0),
            NewSong::new("C", "Z").with_difficulty(10.0),
        ]
    }

    fn titles(page: &SongPage) -> Vec<&str> {
        page.songs.iter().map(|s| s.title.as_str()).collect()
    }

    #[tokio::test]
    async fn test_list_songs_first_page() {
        let service = service(scenario(), 2).await;

        let page = service.list_songs(Some("1")).await.unwrap();
        assert_eq!(titles(&page), vec!["A", "B"]);
        assert_eq!(page.total_pages, 2);
        assert_eq!(page.current_page, 1);

        let page = service.list_songs(Some("2")).await.unwrap();
        assert_eq!(titles(&page), vec!["C"]);
    }

    #[tokio::test]
    async fn test_list_songs_out_of_range_is_first_page() {
        let service = service(scenario(), 2).await;

        for text in ["0", "7", "-2"] {
            let page = service.list_songs(Some(text)).await.unwrap();
            assert_eq!(page.current_page, 1);
            assert_eq!(titles(&page), vec!["A", "B"]);
        }

        let page = service.list_songs(None).await.unwrap();
        assert_eq!(page.current_page, 1);
    }

    #[tokio::test]
    async fn test_list_songs_rejects_non_integer_page() {
        let service = service(scenario(), 2).await;

        let err = service.list_songs(Some("two")).await.unwrap_err();
        assert!(matches!(err, CatalogError::Validation { .. }));
        assert_eq!(
            err.user_message(),
            "What on earth are you trying to do? Try Again."
        );
    }

    #[tokio::test]
    async fn test_list_songs_empty_catalog() {
        let service = service(Vec::new(), 2).await;

        let page = service.list_songs(Some("3")).await.unwrap();
        assert!(page.songs.is_empty());
        assert_eq!(page.total_pages, 0);
        assert_eq!(page.current_page, 1);
    }

    #[tokio::test]
    async fn test_search_paginates_matches() {
        let songs = (1..=5)
            .map(|i| NewSong::new(format!("Night {}", i), "The Yousicians"))
            .chain(std::iter::once(NewSong::new("Awaki-Waki", "Mr Fastfinger")))
            .collect();
        let service = service(songs, 2).await;

        let page = service.search_songs("yousicians", Some("3")).await.unwrap();
        assert_eq!(page.total_pages, 3);
        assert_eq!(titles(&page), vec!["Night 5"]);

        let page = service.search_songs("yousicians", Some("10")).await.unwrap();
        assert_eq!(page.current_page, 1);
        assert_eq!(titles(&page), vec!["Night 1", "Night 2"]);
    }

    #[tokio::test]
    async fn test_search_without_matches() {
        let service = service(scenario(), 2).await;

        let page = service.search_songs("nothing", None).await.unwrap();
        assert!(page.songs.is_empty());
        assert_eq!(page.total_pages, 0);
    }

    #[tokio::test]
    async fn test_search_rejects_non_integer_page() {
        let service = service(scenario(), 2).await;
        let err = service.search_songs("x", Some("1.5")).await.unwrap_err();
        assert!(matches!(err, CatalogError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_average_difficulty_on_level() {
        let service = service(scenario(), 2).await;

        let summary = service.average_difficulty(Some("1")).await.unwrap();
        assert_eq!(summary.scope, LevelScope::Level(1));
        assert_eq!(summary.stats.count, 2);
        assert_eq!(summary.stats.sum, 6.0);
        assert_eq!(summary.stats.average, 3);
        assert_eq!(
            summary.message,
            "There are 2 songs on the level number 1, with difficulties of 2, 4 (sum is 6), and their average is rounded 3"
        );
    }

    #[tokio::test]
    async fn test_average_difficulty_all_levels() {
        let service = service(scenario(), 2).await;

        for level in [None, Some("0"), Some("99")] {
            let summary = service.average_difficulty(level).await.unwrap();
            assert_eq!(summary.scope, LevelScope::AllLevels);
            assert_eq!(summary.stats.count, 3);
            assert_eq!(summary.stats.sum, 16.0);
            assert_eq!(summary.stats.average, 5);
            assert_eq!(
                summary.message,
                "There are 3 songs on all levels with difficulties of 2, 4, 10 (sum is 16), and their average is rounded 5"
            );
        }
    }

    #[tokio::test]
    async fn test_average_difficulty_errors() {
        let service = service(scenario(), 2).await;
        let err = service.average_difficulty(Some("one")).await.unwrap_err();
        assert!(matches!(err, CatalogError::Validation { .. }));

        let empty = self::service(vec![NewSong::new("A", "X")], 2).await;
        let err = empty.average_difficulty(None).await.unwrap_err();
        assert!(matches!(err, CatalogError::EmptyAggregation("difficulty")));
    }

    #[tokio::test]
    async fn test_rate_then_list_shows_rating() {
        let service = service(scenario(), 2).await;
        let id = service.list_songs(None).await.unwrap().songs[1].id;

        let confirmation = service.rate(&id.to_string(), "3").await.unwrap();
        assert!(confirmation.message.contains("B"));
        assert!(confirmation.message.contains("Y"));

        let song = &service.list_songs(None).await.unwrap().songs[1];
        assert_eq!(song.rating.map(|r| r.value()), Some(3));
    }
}
