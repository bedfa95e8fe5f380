//! Numeric aggregation over catalog songs
//!
//! Averages only count songs that carry the attribute; a missing value is
//! skipped, never read as zero.

use crate::error::{CatalogError, CatalogResult};
use serde::Serialize;
use songbook_common::Song;

/// Numeric song attributes that can be averaged
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attribute {
    Difficulty,
    Rating,
}

impl Attribute {
    pub fn name(&self) -> &'static str {
        match self {
            Attribute::Difficulty => "difficulty",
            Attribute::Rating => "rating",
        }
    }

    pub fn value(&self, song: &Song) -> Option<f64> {
        match self {
            Attribute::Difficulty => song.difficulty,
            Attribute::Rating => song.rating.map(|rating| f64::from(rating.value())),
        }
    }
}

/// Count, sum and rounded mean of one attribute
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Aggregate {
    pub count: usize,
    pub sum: f64,
    /// Values in catalog order
    pub items: Vec<f64>,
    pub average: i64,
}

/// Which songs an average was taken over
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LevelScope {
    AllLevels,
    Level(i64),
}

/// Round to the nearest integer, ties to the even neighbour (2.5 -> 2, 3.5 -> 4)
pub fn round_half_even(value: f64) -> i64 {
    value.round_ties_even() as i64
}

/// Average `attribute` over the songs that carry it
pub fn average(songs: &[Song], attribute: Attribute) -> CatalogResult<Aggregate> {
    let items: Vec<f64> = songs.iter().filter_map(|song| attribute.value(song)).collect();

    if items.is_empty() {
        return Err(CatalogError::EmptyAggregation(attribute.name()));
    }

    let count = items.len();
    let sum: f64 = items.iter().sum();

    Ok(Aggregate {
        count,
        sum,
        items,
        average: round_half_even(sum / count as f64),
    })
}

/// Average difficulty of one level
///
/// A level of 0, or one that no song has, falls back to the whole catalog.
pub fn average_by_level(songs: &[Song], level: i64) -> CatalogResult<(LevelScope, Aggregate)> {
    let level_exists = level != 0 && songs.iter().any(|song| song.level == Some(level));

    if !level_exists {
        return Ok((LevelScope::AllLevels, average(songs, Attribute::Difficulty)?));
    }

    let on_level: Vec<Song> = songs
        .iter()
        .filter(|song| song.level == Some(level))
        .cloned()
        .collect();

    Ok((LevelScope::Level(level), average(&on_level, Attribute::Difficulty)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use songbook_common::{NewSong, Rating, SongId};

    fn song(title: &str, level: Option<i64>, difficulty: Option<f64>) -> Song {
        let mut new = NewSong::new(title, "Artist");
        new.level = level;
        new.difficulty = difficulty;
        new.into_song(SongId::generate())
    }

    fn catalog() -> Vec<Song> {
        vec![
            song("A", Some(1), Some(2.0)),
            song("B", Some(1), Some(4.0)),
            song("C", None, Some(10.0)),
        ]
    }

    #[test]
    fn test_average_two_values() {
        let songs = vec![song("A", None, Some(2.0)), song("B", None, Some(4.0))];
        let agg = average(&songs, Attribute::Difficulty).unwrap();
        assert_eq!(agg.count, 2);
        assert_eq!(agg.sum, 6.0);
        assert_eq!(agg.items, vec![2.0, 4.0]);
        assert_eq!(agg.average, 3);
    }

    #[test]
    fn test_missing_values_are_skipped_not_zero() {
        let songs = vec![
            song("A", None, Some(4.0)),
            song("B", None, None),
            song("C", None, Some(6.0)),
        ];
        let agg = average(&songs, Attribute::Difficulty).unwrap();
        assert_eq!(agg.count, 2);
        assert_eq!(agg.average, 5);
    }

    #[test]
    fn test_empty_aggregation_is_error() {
        let songs = vec![song("A", None, None)];
        let err = average(&songs, Attribute::Difficulty).unwrap_err();
        assert!(matches!(err, CatalogError::EmptyAggregation("difficulty")));

        assert!(average(&[], Attribute::Difficulty).is_err());
    }

    #[test]
    fn test_rating_attribute() {
        let mut rated = song("A", None, None);
        rated.rating = Some(Rating::try_from(4).unwrap());
        let agg = average(&[rated, song("B", None, None)], Attribute::Rating).unwrap();
        assert_eq!(agg.count, 1);
        assert_eq!(agg.average, 4);
    }

    #[test]
    fn test_round_half_even() {
        assert_eq!(round_half_even(2.5), 2);
        assert_eq!(round_half_even(3.5), 4);
        assert_eq!(round_half_even(5.333), 5);
        assert_eq!(round_half_even(5.5), 6);
        assert_eq!(round_half_even(4.6), 5);
    }

    #[test]
    fn test_average_by_level() {
        let (scope, agg) = average_by_level(&catalog(), 1).unwrap();
        assert_eq!(scope, LevelScope::Level(1));
        assert_eq!(agg.count, 2);
        assert_eq!(agg.sum, 6.0);
        assert_eq!(agg.average, 3);
    }

    #[test]
    fn test_level_zero_uses_whole_catalog() {
        let (scope, agg) = average_by_level(&catalog(), 0).unwrap();
        assert_eq!(scope, LevelScope::AllLevels);
        assert_eq!(agg.count, 3);
        assert_eq!(agg.sum, 16.0);
        assert_eq!(agg.average, 5);
    }

    #[test]
    fn test_unknown_level_falls_back_to_whole_catalog() {
        let (scope, agg) = average_by_level(&catalog(), 42).unwrap();
        assert_eq!(scope, LevelScope::AllLevels);
        assert_eq!(agg.count, 3);
    }

    #[test]
    fn test_level_without_difficulties_is_empty() {
        let songs = vec![song("A", Some(7), None), song("B", None, Some(3.0))];
        let err = average_by_level(&songs, 7).unwrap_err();
        assert!(matches!(err, CatalogError::EmptyAggregation(_)));
    }
}
