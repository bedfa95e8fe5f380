//! Catalog seeding from the bundled JSON-lines dataset

use songbook_common::{Error, NewSong, Result};
use std::path::Path;
use tracing::info;

use crate::store::{SongStore, SEARCH_FIELDS};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedOutcome {
    /// Catalog was empty and this many songs were inserted
    Seeded(usize),
    /// Catalog already held this many songs; nothing was inserted
    Skipped(u64),
}

/// Parse one song per line, skipping blank lines
///
/// Errors name the 1-based line that failed.
pub fn parse_dataset(text: &str) -> Result<Vec<NewSong>> {
    let mut songs = Vec::new();

    for (index, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let song: NewSong = serde_json::from_str(line)
            .map_err(|e| Error::InvalidInput(format!("Dataset line {}: {}", index + 1, e)))?;
        song.validate()
            .map_err(|e| Error::InvalidInput(format!("Dataset line {}: {}", index + 1, e)))?;

        songs.push(song);
    }

    Ok(songs)
}

/// Fill an empty catalog from `dataset`, then make sure search works
pub async fn seed_catalog(store: &dyn SongStore, dataset: &Path) -> Result<SeedOutcome> {
    let existing = store.count().await?;

    let outcome = if existing > 0 {
        info!("Catalog already holds {} songs, skipping seed", existing);
        SeedOutcome::Skipped(existing)
    } else {
        let text = tokio::fs::read_to_string(dataset).await.map_err(|e| {
            Error::Config(format!("Cannot read dataset {}: {}", dataset.display(), e))
        })?;
        let songs = parse_dataset(&text)?;
        let inserted = store.bulk_insert(songs).await?.len();
        info!("Seeded {} songs from {}", inserted, dataset.display());
        SeedOutcome::Seeded(inserted)
    };

    store.ensure_text_index(&SEARCH_FIELDS).await?;

    Ok(outcome)
}
