//! Category listing and admin CRUD.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{info, instrument};

use awards_core::DatabaseError;
use awards_core::db::new_id;
use awards_core::storage::Category;
use awards_core::validation::CategoryFields;

use crate::auth::AdminAuth;
use crate::cache::CacheScope;
use crate::error::ApiError;
use crate::state::AppState;

/// Partial update; absent fields keep their stored value.
#[derive(Debug, Default, Deserialize)]
pub struct CategoryPatch {
    name: Option<String>,
    description: Option<String>,
    voting_locked: Option<bool>,
}

impl CategoryPatch {
    fn apply(self, current: &Category) -> CategoryFields {
        CategoryFields {
            name: self.name.unwrap_or_else(|| current.name.clone()),
            description: self
                .description
                .unwrap_or_else(|| current.description.clone()),
            voting_locked: self.voting_locked.unwrap_or(current.voting_locked),
        }
    }
}

fn name_conflict(e: DatabaseError) -> ApiError {
    match e {
        DatabaseError::Conflict(_) => {
            ApiError::Conflict("A category with this name already exists".into())
        }
        other => other.into(),
    }
}

pub async fn list(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let db = state.db.clone();
    let body = state
        .cache
        .get_or_try_insert(CacheScope::Categories, "", || async move {
            let categories = db.list_categories().await?;
            serde_json::to_value(categories).map_err(ApiError::internal)
        })
        .await?;
    Ok(Json(body))
}

#[instrument(skip_all, fields(admin = %admin.username()))]
pub async fn create(
    State(state): State<AppState>,
    admin: AdminAuth,
    payload: Result<Json<CategoryFields>, JsonRejection>,
) -> Result<(StatusCode, Json<Category>), ApiError> {
    let Json(fields) = payload?;
    let fields = fields.validated()?;

    let category = state
        .db
        .create_category(&new_id(), &fields)
        .await
        .map_err(name_conflict)?;

    state
        .invalidate(&[
            CacheScope::Categories,
            CacheScope::Results(category.id.clone()),
        ])
        .await;

    info!(category_id = %category.id, name = %category.name, "Category created");
    Ok((StatusCode::CREATED, Json(category)))
}

#[instrument(skip_all, fields(admin = %admin.username(), category_id = %id))]
pub async fn update(
    State(state): State<AppState>,
    admin: AdminAuth,
    Path(id): Path<String>,
    payload: Result<Json<CategoryPatch>, JsonRejection>,
) -> Result<Json<Category>, ApiError> {
    let Json(patch) = payload?;
    let current = state.db.get_category(&id).await?;
    let fields = patch.apply(&current).validated()?;

    let category = state
        .db
        .update_category(&id, &fields)
        .await
        .map_err(name_conflict)?;

    state
        .invalidate(&[CacheScope::Categories, CacheScope::Results(id)])
        .await;

    info!(locked = category.voting_locked, "Category updated");
    Ok(Json(category))
}

#[instrument(skip_all, fields(admin = %admin.username(), category_id = %id))]
pub async fn remove(
    State(state): State<AppState>,
    admin: AdminAuth,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let removal = state.db.remove_category(&id).await?;

    for url in removal
        .nominees
        .iter()
        .filter_map(|n| n.image_url.as_deref())
    {
        state.uploads.remove_url(url).await;
    }

    state
        .invalidate(&[
            CacheScope::Categories,
            CacheScope::Nominees,
            CacheScope::Results(id),
        ])
        .await;

    info!(
        nominees = removal.nominees.len(),
        votes = removal.deleted_votes,
        "Category deleted"
    );

    Ok(Json(json!({
        "message": format!("Category \"{}\" deleted successfully", removal.category.name),
        "deleted_nominees": removal.nominees.len(),
        "deleted_votes": removal.deleted_votes,
    })))
}
