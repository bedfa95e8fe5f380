//! Catalog data model

use crate::{Error, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Opaque song identifier, assigned by the store on insert
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SongId(Uuid);

impl SongId {
    /// Fresh identifier for a newly inserted song
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for SongId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for SongId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Uuid::parse_str(s.trim())
            .map(Self)
            .map_err(|_| Error::InvalidInput(format!("Malformed song id: {}", s)))
    }
}

/// User rating of a song, always within `1..=5`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct Rating(u8);

impl Rating {
    pub const MIN: i64 = 1;
    pub const MAX: i64 = 5;

    pub fn value(&self) -> u8 {
        self.0
    }
}

impl TryFrom<i64> for Rating {
    type Error = Error;

    fn try_from(value: i64) -> Result<Self> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value as u8))
        } else {
            Err(Error::InvalidInput(format!(
                "Rating {} outside {}..={}",
                value,
                Self::MIN,
                Self::MAX
            )))
        }
    }
}

impl From<Rating> for i64 {
    fn from(rating: Rating) -> Self {
        i64::from(rating.0)
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A catalog entry as stored
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Song {
    pub id: SongId,
    pub title: String,
    pub artist: String,
    /// Discrete category; `None` means uncategorized
    pub level: Option<i64>,
    /// Only songs carrying a difficulty take part in averages
    pub difficulty: Option<f64>,
    pub rating: Option<Rating>,
    pub released: Option<NaiveDate>,
}

/// A song before insertion, as read from the seed dataset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewSong {
    pub title: String,
    pub artist: String,
    #[serde(default)]
    pub level: Option<i64>,
    #[serde(default)]
    pub difficulty: Option<f64>,
    #[serde(default)]
    pub rating: Option<Rating>,
    #[serde(default)]
    pub released: Option<NaiveDate>,
}

impl NewSong {
    pub fn new(title: impl Into<String>, artist: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            artist: artist.into(),
            level: None,
            difficulty: None,
            rating: None,
            released: None,
        }
    }

    pub fn with_level(mut self, level: i64) -> Self {
        self.level = Some(level);
        self
    }

    pub fn with_difficulty(mut self, difficulty: f64) -> Self {
        self.difficulty = Some(difficulty);
        self
    }

    /// Title and artist must be non-empty; difficulty must be finite
    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(Error::InvalidInput("Song title is empty".to_string()));
        }
        if self.artist.trim().is_empty() {
            return Err(Error::InvalidInput(format!(
                "Artist is empty for song '{}'",
                self.title
            )));
        }
        if let Some(difficulty) = self.difficulty {
            if !difficulty.is_finite() {
                return Err(Error::InvalidInput(format!(
                    "Difficulty is not a number for song '{}'",
                    self.title
                )));
            }
        }
        Ok(())
    }

    /// Attach a store-assigned id
    pub fn into_song(self, id: SongId) -> Song {
        Song {
            id,
            title: self.title,
            artist: self.artist,
            level: self.level,
            difficulty: self.difficulty,
            rating: self.rating,
            released: self.released,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rating_bounds() {
        assert!(Rating::try_from(0).is_err());
        assert_eq!(Rating::try_from(1).unwrap().value(), 1);
        assert_eq!(Rating::try_from(5).unwrap().value(), 5);
        assert!(Rating::try_from(6).is_err());
        assert!(Rating::try_from(-3).is_err());
    }

    #[test]
    fn test_song_id_parse() {
        let id = SongId::generate();
        let parsed: SongId = id.to_string().parse().unwrap();
        assert_eq!(parsed, id);

        let err = "not-an-id".parse::<SongId>().unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn test_new_song_from_dataset_line() {
        let line = r#"{"artist": "The Yousicians","title": "A New Kennel","difficulty": 9.1,"level":9,"released": "2010-02-03"}"#;
        let song: NewSong = serde_json::from_str(line).unwrap();
        assert_eq!(song.artist, "The Yousicians");
        assert_eq!(song.level, Some(9));
        assert_eq!(song.difficulty, Some(9.1));
        assert_eq!(song.released, NaiveDate::from_ymd_opt(2010, 2, 3));
        assert!(song.rating.is_none());
        assert!(song.validate().is_ok());
    }

    #[test]
    fn test_dataset_rating_out_of_range_rejected() {
        let line = r#"{"artist": "X","title": "Y","rating": 9}"#;
        assert!(serde_json::from_str::<NewSong>(line).is_err());
    }

    #[test]
    fn test_empty_artist_invalid() {
        let song = NewSong::new("Title", "  ");
        assert!(matches!(song.validate(), Err(Error::InvalidInput(_))));
    }
}
