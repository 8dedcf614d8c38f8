//! Admin login, password change and token verification.

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{info, instrument, warn};

use awards_core::DatabaseError;
use awards_core::password::{check_new_password, hash_password, verify_password};

use crate::auth::AdminAuth;
use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    username: String,
    #[serde(default)]
    password: String,
}

#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    #[serde(default)]
    current_password: String,
    #[serde(default)]
    new_password: String,
}

#[instrument(skip_all)]
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(req) = payload?;
    let username = req.username.trim();
    if username.is_empty() || req.password.is_empty() {
        return Err(ApiError::BadRequest(
            "Username and password are required".into(),
        ));
    }

    let invalid = || ApiError::Unauthorized("Invalid credentials".into());

    let admin = match state.db.get_admin_by_username(username).await {
        Ok(admin) => admin,
        Err(DatabaseError::NotFound(_)) => {
            warn!(%username, "Login for unknown admin");
            return Err(invalid());
        }
        Err(e) => return Err(e.into()),
    };

    if !verify_password(&req.password, &admin.password_hash).map_err(ApiError::internal)? {
        warn!(%username, "Login with wrong password");
        return Err(invalid());
    }

    let (access_token, _ttl) = state
        .jwt
        .issue_access_token(&admin.username, &admin.role)
        .map_err(ApiError::internal)?;

    info!(%username, "Admin logged in");

    Ok(Json(json!({
        "access_token": access_token,
        "username": admin.username,
        "message": "Login successful",
    })))
}

#[instrument(skip_all, fields(username = %admin.username()))]
pub async fn change_password(
    State(state): State<AppState>,
    admin: AdminAuth,
    payload: Result<Json<ChangePasswordRequest>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(req) = payload?;
    if req.current_password.is_empty() || req.new_password.is_empty() {
        return Err(ApiError::BadRequest(
            "Current password and new password are required".into(),
        ));
    }
    check_new_password(&req.new_password).map_err(ApiError::BadRequest)?;

    let stored = state.db.get_admin_by_username(admin.username()).await?;
    if !verify_password(&req.current_password, &stored.password_hash)
        .map_err(ApiError::internal)?
    {
        return Err(ApiError::Unauthorized(
            "Current password is incorrect".into(),
        ));
    }

    let hash = hash_password(&req.new_password).map_err(ApiError::internal)?;
    state
        .db
        .update_admin_password(admin.username(), &hash)
        .await?;

    info!("Admin password changed");

    Ok(Json(json!({ "message": "Password changed successfully" })))
}

pub async fn verify(admin: AdminAuth) -> Json<Value> {
    Json(json!({ "username": admin.username(), "valid": true }))
}
