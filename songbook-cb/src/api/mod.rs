//! HTTP API handlers for songbook-cb

pub mod difficulty;
pub mod health;
pub mod rating;
pub mod search;
pub mod songs;

pub use difficulty::{average_difficulty, average_difficulty_on_level};
pub use health::health_routes;
pub use rating::rate_song;
pub use search::{search_songs, search_songs_page};
pub use songs::{list_songs, list_songs_page};
