//! Average difficulty endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;

use crate::aggregate::LevelScope;
use crate::error::CatalogResult;
use crate::service::DifficultySummary;
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct DifficultyResponse {
    pub page: &'static str,
    pub message: String,
    pub count: usize,
    pub sum: f64,
    pub difficulties: Vec<f64>,
    pub average: i64,
    /// `None` when the average covers every level
    pub level: Option<i64>,
}

impl From<DifficultySummary> for DifficultyResponse {
    fn from(summary: DifficultySummary) -> Self {
        let level = match summary.scope {
            LevelScope::AllLevels => None,
            LevelScope::Level(level) => Some(level),
        };

        Self {
            page: "message",
            message: summary.message,
            count: summary.stats.count,
            sum: summary.stats.sum,
            difficulties: summary.stats.items,
            average: summary.stats.average,
            level,
        }
    }
}

/// GET /songs/avg/difficulty
pub async fn average_difficulty(
    State(state): State<AppState>,
) -> CatalogResult<Json<DifficultyResponse>> {
    let summary = state.catalog.average_difficulty(None).await?;
    Ok(Json(summary.into()))
}

/// GET /songs/avg/difficulty/:level
pub async fn average_difficulty_on_level(
    State(state): State<AppState>,
    Path(level_text): Path<String>,
) -> CatalogResult<Json<DifficultyResponse>> {
    let summary = state.catalog.average_difficulty(Some(&level_text)).await?;
    Ok(Json(summary.into()))
}
