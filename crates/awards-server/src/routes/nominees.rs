//! Nominee listing and admin CRUD.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{info, instrument};

use awards_core::db::new_id;
use awards_core::storage::Nominee;
use awards_core::validation::NomineeFields;

use crate::auth::AdminAuth;
use crate::cache::CacheScope;
use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct NomineeQuery {
    category_id: Option<String>,
}

/// Partial update; absent fields keep their stored value and an empty URL
/// clears it.
#[derive(Debug, Default, Deserialize)]
pub struct NomineePatch {
    name: Option<String>,
    description: Option<String>,
    category_id: Option<String>,
    image_url: Option<String>,
    youtube_url: Option<String>,
}

impl NomineePatch {
    fn apply(self, current: &Nominee) -> NomineeFields {
        NomineeFields {
            name: self.name.unwrap_or_else(|| current.name.clone()),
            description: self
                .description
                .unwrap_or_else(|| current.description.clone()),
            category_id: self
                .category_id
                .unwrap_or_else(|| current.category_id.clone()),
            image_url: self.image_url.or_else(|| current.image_url.clone()),
            youtube_url: self.youtube_url.or_else(|| current.youtube_url.clone()),
        }
    }
}

pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<NomineeQuery>,
) -> Result<Json<Value>, ApiError> {
    let filter = query.category_id.filter(|id| !id.is_empty());
    let key = filter.clone().unwrap_or_default();
    let db = state.db.clone();

    let body = state
        .cache
        .get_or_try_insert(CacheScope::Nominees, &key, || async move {
            let nominees = db.list_nominees(filter.as_deref()).await?;
            serde_json::to_value(nominees).map_err(ApiError::internal)
        })
        .await?;
    Ok(Json(body))
}

#[instrument(skip_all, fields(admin = %admin.username()))]
pub async fn create(
    State(state): State<AppState>,
    admin: AdminAuth,
    payload: Result<Json<NomineeFields>, JsonRejection>,
) -> Result<(StatusCode, Json<Nominee>), ApiError> {
    let Json(fields) = payload?;
    let fields = fields.validated()?;

    let nominee = state.db.create_nominee(&new_id(), &fields).await?;

    state
        .invalidate(&[
            CacheScope::Nominees,
            CacheScope::Results(nominee.category_id.clone()),
        ])
        .await;

    info!(nominee_id = %nominee.id, category_id = %nominee.category_id, "Nominee created");
    Ok((StatusCode::CREATED, Json(nominee)))
}

#[instrument(skip_all, fields(admin = %admin.username(), nominee_id = %id))]
pub async fn update(
    State(state): State<AppState>,
    admin: AdminAuth,
    Path(id): Path<String>,
    payload: Result<Json<NomineePatch>, JsonRejection>,
) -> Result<Json<Nominee>, ApiError> {
    let Json(patch) = payload?;
    let current = state.db.get_nominee(&id).await?;
    let fields = patch.apply(&current).validated()?;

    let nominee = state.db.update_nominee(&id, &fields).await?;

    state
        .invalidate(&[
            CacheScope::Nominees,
            CacheScope::Results(current.category_id),
            CacheScope::Results(nominee.category_id.clone()),
        ])
        .await;

    info!("Nominee updated");
    Ok(Json(nominee))
}

#[instrument(skip_all, fields(admin = %admin.username(), nominee_id = %id))]
pub async fn remove(
    State(state): State<AppState>,
    admin: AdminAuth,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let removal = state.db.remove_nominee(&id).await?;

    if let Some(url) = removal.nominee.image_url.as_deref() {
        state.uploads.remove_url(url).await;
    }

    state
        .invalidate(&[
            CacheScope::Nominees,
            CacheScope::Results(removal.nominee.category_id.clone()),
        ])
        .await;

    info!(votes = removal.deleted_votes, "Nominee deleted");

    Ok(Json(json!({
        "message": "Nominee deleted successfully",
        "deleted_votes": removal.deleted_votes,
    })))
}

/// Clear a nominee's image. Succeeds even when no image was set.
#[instrument(skip_all, fields(admin = %admin.username(), nominee_id = %id))]
pub async fn remove_image(
    State(state): State<AppState>,
    admin: AdminAuth,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let before = state.db.clear_nominee_image(&id).await?;

    if let Some(url) = before.image_url.as_deref() {
        state.uploads.remove_url(url).await;
    }

    state
        .invalidate(&[CacheScope::Nominees, CacheScope::Results(before.category_id)])
        .await;

    info!("Nominee image removed");
    Ok(Json(json!({ "success": "Image removed successfully" })))
}
