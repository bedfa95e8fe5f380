//! Song store collaborator
//!
//! The catalog service only talks to the store through [`SongStore`], so the
//! SQLite implementation can be swapped for [`MemorySongStore`] in tests.
//!
//! Consistency is best-effort single-writer: there are no transactions
//! spanning calls, and concurrent updates to the same field are
//! last-writer-wins.

use async_trait::async_trait;
use songbook_common::{NewSong, Rating, Result, Song, SongId};

mod memory;
mod sqlite;

pub use memory::MemorySongStore;
pub use sqlite::SqliteSongStore;

/// Song fields covered by the free-text index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextField {
    Artist,
    Title,
}

impl TextField {
    pub fn column(&self) -> &'static str {
        match self {
            TextField::Artist => "artist",
            TextField::Title => "title",
        }
    }

    pub fn value<'a>(&self, song: &'a Song) -> &'a str {
        match self {
            TextField::Artist => &song.artist,
            TextField::Title => &song.title,
        }
    }
}

/// Fields used for catalog search
pub const SEARCH_FIELDS: [TextField; 2] = [TextField::Artist, TextField::Title];

/// A single-field overwrite
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldUpdate {
    Rating(Rating),
}

impl FieldUpdate {
    pub fn column(&self) -> &'static str {
        match self {
            FieldUpdate::Rating(_) => "rating",
        }
    }
}

/// Persistent song collection with a free-text index
#[async_trait]
pub trait SongStore: Send + Sync {
    /// All songs in insertion order
    async fn find_all(&self) -> Result<Vec<Song>>;

    /// Songs matching any term of `query` in the indexed fields, minus those
    /// matching a `-term`
    ///
    /// A query with no positive term besides stop words matches nothing.
    async fn find_by_text_query(&self, query: &str) -> Result<Vec<Song>>;

    /// Overwrite one field of one song; returns the number of songs updated
    async fn update_field(&self, id: SongId, update: FieldUpdate) -> Result<u64>;

    /// Insert songs, assigning fresh ids in input order
    async fn bulk_insert(&self, songs: Vec<NewSong>) -> Result<Vec<SongId>>;

    async fn count(&self) -> Result<u64>;

    /// Build the free-text index over `fields` if it does not exist yet
    async fn ensure_text_index(&self, fields: &[TextField]) -> Result<()>;
}

/// English words dropped from queries, contraction fragments included
const STOP_WORDS: &[&str] = &[
    "a", "about", "above", "after", "again", "against", "all", "am", "an", "and", "any", "are",
    "aren", "as", "at", "be", "because", "been", "before", "being", "below", "between", "both",
    "but", "by", "can", "cannot", "could", "couldn", "d", "did", "didn", "do", "does", "doesn",
    "doing", "don", "down", "during", "each", "few", "for", "from", "further", "had", "hadn",
    "has", "hasn", "have", "haven", "having", "he", "her", "here", "hers", "herself", "him",
    "himself", "his", "how", "i", "if", "in", "into", "is", "isn", "it", "its", "itself", "let",
    "ll", "m", "me", "more", "most", "mustn", "my", "myself", "no", "nor", "not", "of", "off",
    "on", "once", "only", "or", "other", "ought", "our", "ours", "ourselves", "out", "over",
    "own", "re", "s", "same", "shan", "she", "should", "shouldn", "so", "some", "such", "t",
    "than", "that", "the", "their", "theirs", "them", "themselves", "then", "there", "these",
    "they", "this", "those", "through", "to", "too", "under", "until", "up", "ve", "very", "was",
    "wasn", "we", "were", "weren", "what", "when", "where", "which", "while", "who", "whom",
    "why", "with", "won", "would", "wouldn", "you", "your", "yours", "yourself", "yourselves",
];

/// Split text into lowercase terms on anything that is not alphanumeric
///
/// Same rule the SQLite `unicode61` tokenizer applies to indexed text.
/// Stop words are dropped.
pub(crate) fn search_terms(query: &str) -> Vec<String> {
    query
        .split(|c: char| !c.is_alphanumeric())
        .filter(|term| !term.is_empty())
        .map(str::to_lowercase)
        .filter(|term| !STOP_WORDS.contains(&term.as_str()))
        .collect()
}

/// Free-text query: any `include` term matches, every `exclude` term vetoes
///
/// A whitespace-separated word with a leading `-` is excluded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct TextQuery {
    pub include: Vec<String>,
    pub exclude: Vec<String>,
}

impl TextQuery {
    pub fn parse(query: &str) -> Self {
        let mut parsed = Self::default();

        for word in query.split_whitespace() {
            match word.strip_prefix('-') {
                Some(negated) => parsed.exclude.extend(search_terms(negated)),
                None => parsed.include.extend(search_terms(word)),
            }
        }

        parsed
    }

    /// No positive term, so nothing can match
    pub fn matches_nothing(&self) -> bool {
        self.include.is_empty()
    }
}
