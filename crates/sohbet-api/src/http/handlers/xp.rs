//! XP HTTP handlers.
//!
//! Endpoints:
//! - GET  /api/xp/{bot_id} - Current XP record for a persona
//! - POST /api/xp/{bot_id} - Grant points and return the updated record

use axum::Json;
use axum::extract::{Path, State};
use serde::Deserialize;

use sohbet_types::bot::XpRecord;

use crate::http::error::AppError;
use crate::state::AppState;

/// GET /api/xp/{bot_id} - Current XP record. Personas that were never
/// granted points report zero XP at level 1.
pub async fn get_xp(
    State(state): State<AppState>,
    Path(bot_id): Path<String>,
) -> Result<Json<XpRecord>, AppError> {
    let record = state.chat.xp(&bot_id).await?;
    Ok(Json(record))
}

/// Request body for `POST /api/xp/{bot_id}`.
#[derive(Debug, Deserialize)]
pub struct XpGrantRequest {
    #[serde(default)]
    pub xp: i64,
}

/// POST /api/xp/{bot_id} - Grant points to a persona and return the
/// updated record.
pub async fn grant_xp(
    State(state): State<AppState>,
    Path(bot_id): Path<String>,
    Json(body): Json<XpGrantRequest>,
) -> Result<Json<XpRecord>, AppError> {
    let record = state.chat.grant_xp(&bot_id, body.xp).await?;
    Ok(Json(record))
}
