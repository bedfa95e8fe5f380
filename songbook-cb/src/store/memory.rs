//! In-memory song store
//!
//! Same contract as the SQLite store, without stemming or relevance
//! ranking: matches come back in insertion order.

use async_trait::async_trait;
use songbook_common::{Error, NewSong, Result, Song, SongId};
use std::sync::Arc;
use tokio::sync::RwLock;

use super::{search_terms, FieldUpdate, SongStore, TextField, TextQuery};

#[derive(Clone, Default)]
pub struct MemorySongStore {
    songs: Arc<RwLock<Vec<Song>>>,
    text_index: Arc<RwLock<Option<Vec<TextField>>>>,
}

impl MemorySongStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SongStore for MemorySongStore {
    async fn find_all(&self) -> Result<Vec<Song>> {
        Ok(self.songs.read().await.clone())
    }

    async fn find_by_text_query(&self, query: &str) -> Result<Vec<Song>> {
        let fields = self
            .text_index
            .read()
            .await
            .clone()
            .ok_or_else(|| Error::Internal("Text index has not been built".to_string()))?;

        let text_query = TextQuery::parse(query);
        if text_query.matches_nothing() {
            return Ok(Vec::new());
        }

        let songs = self.songs.read().await;
        Ok(songs
            .iter()
            .filter(|song| {
                let words: Vec<String> = fields
                    .iter()
                    .flat_map(|field| search_terms(field.value(song)))
                    .collect();
                text_query.include.iter().any(|term| words.contains(term))
                    && !text_query.exclude.iter().any(|term| words.contains(term))
            })
            .cloned()
            .collect())
    }

    async fn update_field(&self, id: SongId, update: FieldUpdate) -> Result<u64> {
        let mut songs = self.songs.write().await;
        match songs.iter_mut().find(|song| song.id == id) {
            Some(song) => {
                match update {
                    FieldUpdate::Rating(rating) => song.rating = Some(rating),
                }
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn bulk_insert(&self, songs: Vec<NewSong>) -> Result<Vec<SongId>> {
        for song in &songs {
            song.validate()?;
        }

        let mut stored = self.songs.write().await;
        let mut ids = Vec::with_capacity(songs.len());
        for song in songs {
            let id = SongId::generate();
            stored.push(song.into_song(id));
            ids.push(id);
        }

        Ok(ids)
    }

    async fn count(&self) -> Result<u64> {
        Ok(self.songs.read().await.len() as u64)
    }

    async fn ensure_text_index(&self, fields: &[TextField]) -> Result<()> {
        if fields.is_empty() {
            return Err(Error::InvalidInput(
                "Text index needs at least one field".to_string(),
            ));
        }

        let mut index = self.text_index.write().await;
        if index.is_none() {
            *index = Some(fields.to_vec());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::SEARCH_FIELDS;

    #[tokio::test]
    async fn test_search_requires_index() {
        let store = MemorySongStore::new();
        store.bulk_insert(vec![NewSong::new("A", "X")]).await.unwrap();

        assert!(store.find_by_text_query("x").await.is_err());

        store.ensure_text_index(&SEARCH_FIELDS).await.unwrap();
        assert_eq!(store.find_by_text_query("x").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_search_is_whole_word_and_case_insensitive() {
        let store = MemorySongStore::new();
        store
            .bulk_insert(vec![
                NewSong::new("Alabama Sunrise", "The Yousicians"),
                NewSong::new("Awaki-Waki", "Mr Fastfinger"),
            ])
            .await
            .unwrap();
        store.ensure_text_index(&SEARCH_FIELDS).await.unwrap();

        assert_eq!(store.find_by_text_query("SUNRISE").await.unwrap().len(), 1);
        assert_eq!(store.find_by_text_query("waki").await.unwrap().len(), 1);
        assert!(store.find_by_text_query("sun").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_search_skips_stop_words_and_honours_negation() {
        let store = MemorySongStore::new();
        store
            .bulk_insert(vec![
                NewSong::new("Wishing In The Night", "The Yousicians"),
                NewSong::new("Babysitting", "The Yousicians"),
            ])
            .await
            .unwrap();
        store.ensure_text_index(&SEARCH_FIELDS).await.unwrap();

        assert!(store.find_by_text_query("the").await.unwrap().is_empty());

        let hits = store.find_by_text_query("yousicians -night").await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].title, "Babysitting");
    }

    #[tokio::test]
    async fn test_title_only_index() {
        let store = MemorySongStore::new();
        store.bulk_insert(vec![NewSong::new("Babysitting", "The Yousicians")]).await.unwrap();
        store.ensure_text_index(&[TextField::Title]).await.unwrap();

        assert!(store.find_by_text_query("yousicians").await.unwrap().is_empty());
        assert_eq!(store.find_by_text_query("babysitting").await.unwrap().len(), 1);
    }
}
