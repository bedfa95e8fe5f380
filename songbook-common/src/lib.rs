//! # Songbook Common Library
//!
//! Shared code for the songbook services including:
//! - Catalog data model (songs, ids, ratings)
//! - Database initialization
//! - Configuration loading and root folder resolution
//! - Common error type

pub mod config;
pub mod db;
pub mod error;

pub use db::models::{NewSong, Rating, Song, SongId};
pub use error::{Error, Result};
