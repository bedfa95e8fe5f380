//! SQLite-backed song store
//!
//! Free-text search uses an FTS5 external-content table (`songs_fts`) kept
//! in sync with `songs` by triggers.

use async_trait::async_trait;
use songbook_common::{Error, NewSong, Rating, Result, Song, SongId};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use tracing::{debug, info};

use super::{FieldUpdate, SongStore, TextField, TextQuery};

const SONG_COLUMNS: &str = "s.guid, s.title, s.artist, s.level, s.difficulty, s.rating, s.released";

/// Song store over the `songs` table
#[derive(Clone)]
pub struct SqliteSongStore {
    db: SqlitePool,
}

impl SqliteSongStore {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    async fn text_index_exists(&self) -> Result<bool> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'songs_fts'",
        )
        .fetch_one(&self.db)
        .await?;

        Ok(count > 0)
    }
}

fn song_from_row(row: &SqliteRow) -> Result<Song> {
    let guid: String = row.try_get("guid")?;
    let id = guid
        .parse::<SongId>()
        .map_err(|_| Error::Internal(format!("Corrupt song id in database: {}", guid)))?;

    let rating = row
        .try_get::<Option<i64>, _>("rating")?
        .map(Rating::try_from)
        .transpose()?;

    Ok(Song {
        id,
        title: row.try_get("title")?,
        artist: row.try_get("artist")?,
        level: row.try_get("level")?,
        difficulty: row.try_get("difficulty")?,
        rating,
        released: row.try_get("released")?,
    })
}

fn quoted(terms: &[String]) -> Vec<String> {
    terms.iter().map(|term| format!("\"{}\"", term)).collect()
}

/// FTS5 query matching any included term and none of the excluded ones
fn match_expression(query: &TextQuery) -> String {
    let mut expression = format!("({})", quoted(&query.include).join(" OR "));
    for term in quoted(&query.exclude) {
        expression.push_str(" NOT ");
        expression.push_str(&term);
    }
    expression
}

#[async_trait]
impl SongStore for SqliteSongStore {
    async fn find_all(&self) -> Result<Vec<Song>> {
        let rows = sqlx::query(&format!("SELECT {} FROM songs s ORDER BY s.id", SONG_COLUMNS))
            .fetch_all(&self.db)
            .await?;

        rows.iter().map(song_from_row).collect()
    }

    async fn find_by_text_query(&self, query: &str) -> Result<Vec<Song>> {
        let text_query = TextQuery::parse(query);
        if text_query.matches_nothing() {
            return Ok(Vec::new());
        }

        let rows = sqlx::query(&format!(
            "SELECT {}
             FROM (SELECT rowid AS song_rowid, rank AS score
                   FROM songs_fts
                   WHERE songs_fts MATCH ?) AS hits
             JOIN songs s ON s.id = hits.song_rowid
             ORDER BY hits.score, s.id",
            SONG_COLUMNS
        ))
        .bind(match_expression(&text_query))
        .fetch_all(&self.db)
        .await?;

        debug!("Text query {:?} matched {} songs", query, rows.len());

        rows.iter().map(song_from_row).collect()
    }

    async fn update_field(&self, id: SongId, update: FieldUpdate) -> Result<u64> {
        let sql = format!(
            "UPDATE songs SET {} = ?, updated_at = CURRENT_TIMESTAMP WHERE guid = ?",
            update.column()
        );
        let query = match update {
            FieldUpdate::Rating(rating) => sqlx::query(&sql).bind(i64::from(rating)),
        };
        let result = query.bind(id.to_string()).execute(&self.db).await?;

        Ok(result.rows_affected())
    }

    async fn bulk_insert(&self, songs: Vec<NewSong>) -> Result<Vec<SongId>> {
        for song in &songs {
            song.validate()?;
        }

        let mut tx = self.db.begin().await?;
        let mut ids = Vec::with_capacity(songs.len());

        for song in songs {
            let id = SongId::generate();
            sqlx::query(
                r#"
                INSERT INTO songs (guid, title, artist, level, difficulty, rating, released)
                VALUES (?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(id.to_string())
            .bind(&song.title)
            .bind(&song.artist)
            .bind(song.level)
            .bind(song.difficulty)
            .bind(song.rating.map(i64::from))
            .bind(song.released)
            .execute(&mut *tx)
            .await?;

            ids.push(id);
        }

        tx.commit().await?;

        Ok(ids)
    }

    async fn count(&self) -> Result<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM songs")
            .fetch_one(&self.db)
            .await?;

        Ok(count.max(0) as u64)
    }

    async fn ensure_text_index(&self, fields: &[TextField]) -> Result<()> {
        if fields.is_empty() {
            return Err(Error::InvalidInput(
                "Text index needs at least one field".to_string(),
            ));
        }

        if self.text_index_exists().await? {
            debug!("Text index songs_fts already exists");
            return Ok(());
        }

        let columns: Vec<&str> = fields.iter().map(TextField::column).collect();
        let column_list = columns.join(", ");
        let new_values = columns
            .iter()
            .map(|c| format!("new.{}", c))
            .collect::<Vec<_>>()
            .join(", ");
        let old_values = columns
            .iter()
            .map(|c| format!("old.{}", c))
            .collect::<Vec<_>>()
            .join(", ");

        let mut tx = self.db.begin().await?;

        sqlx::query(&format!(
            "CREATE VIRTUAL TABLE songs_fts USING fts5(
                {}, content='songs', content_rowid='id',
                tokenize='porter unicode61 remove_diacritics 2'
            )",
            column_list
        ))
        .execute(&mut *tx)
        .await?;

        sqlx::query(&format!(
            "CREATE TRIGGER IF NOT EXISTS songs_fts_ai AFTER INSERT ON songs BEGIN
                INSERT INTO songs_fts(rowid, {cols}) VALUES (new.id, {new});
             END",
            cols = column_list,
            new = new_values
        ))
        .execute(&mut *tx)
        .await?;

        sqlx::query(&format!(
            "CREATE TRIGGER IF NOT EXISTS songs_fts_ad AFTER DELETE ON songs BEGIN
                INSERT INTO songs_fts(songs_fts, rowid, {cols}) VALUES ('delete', old.id, {old});
             END",
            cols = column_list,
            old = old_values
        ))
        .execute(&mut *tx)
        .await?;

        sqlx::query(&format!(
            "CREATE TRIGGER IF NOT EXISTS songs_fts_au AFTER UPDATE OF {cols} ON songs BEGIN
                INSERT INTO songs_fts(songs_fts, rowid, {cols}) VALUES ('delete', old.id, {old});
                INSERT INTO songs_fts(rowid, {cols}) VALUES (new.id, {new});
             END",
            cols = column_list,
            old = old_values,
            new = new_values
        ))
        .execute(&mut *tx)
        .await?;

        // Index rows inserted before the triggers existed
        sqlx::query("INSERT INTO songs_fts(songs_fts) VALUES ('rebuild')")
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        info!("Built text index over {}", column_list);
        Ok(())
    }
}
