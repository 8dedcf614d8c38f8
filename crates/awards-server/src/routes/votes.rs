//! Public voting and results.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{info, instrument};

use awards_core::storage::RecordedVote;

use crate::cache::CacheScope;
use crate::client_ip::ClientIp;
use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CastVote {
    #[serde(default)]
    category_id: String,
    #[serde(default)]
    nominee_id: String,
}

#[instrument(skip_all, fields(voter = %ip))]
pub async fn cast(
    State(state): State<AppState>,
    ClientIp(ip): ClientIp,
    payload: Result<Json<CastVote>, JsonRejection>,
) -> Result<(StatusCode, Json<RecordedVote>), ApiError> {
    let Json(req) = payload?;
    let category_id = req.category_id.trim();
    let nominee_id = req.nominee_id.trim();
    if category_id.is_empty() || nominee_id.is_empty() {
        return Err(ApiError::BadRequest(
            "category_id and nominee_id are required".into(),
        ));
    }

    let recorded = state.db.record_vote(category_id, nominee_id, &ip).await?;

    state
        .invalidate(&[CacheScope::Results(category_id.to_string())])
        .await;

    info!(category_id, nominee_id, action = ?recorded.action, "Vote cast");
    Ok((StatusCode::CREATED, Json(recorded)))
}

/// The caller's vote in a category, or `{"vote": null}`.
pub async fn current(
    State(state): State<AppState>,
    ClientIp(ip): ClientIp,
    Path(category_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let body = match state.db.get_vote(&category_id, &ip).await? {
        Some(vote) => serde_json::to_value(vote).map_err(ApiError::internal)?,
        None => json!({ "vote": null }),
    };
    Ok(Json(body))
}

/// Ranked tally for a category, highest count first.
pub async fn results(
    State(state): State<AppState>,
    Path(category_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let db = state.db.clone();
    let scope = CacheScope::Results(category_id.clone());

    let body = state
        .cache
        .get_or_try_insert(scope, "", || async move {
            let tally = db.tally_results(&category_id).await?;
            serde_json::to_value(tally).map_err(ApiError::internal)
        })
        .await?;
    Ok(Json(body))
}
