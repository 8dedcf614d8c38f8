//! HTTP routing.
//!
//! `/api` carries the JSON endpoints, each behind its own rate limit.
//! `/uploads`, `/static` and every other path serve files from disk, with the
//! frontend's `index.html` as the final fallback.

mod auth;
mod categories;
mod nominees;
mod upload;
mod votes;

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::http::{HeaderValue, Method, header};
use axum::middleware::{from_fn, from_fn_with_state};
use axum::routing::{MethodRouter, delete, get, post, put};
use axum::{Json, Router};
use serde_json::{Value, json};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tracing::warn;

use crate::error::ApiError;
use crate::rate_limit::{
    self, CAST_VOTE_PER_MINUTE, CREATE_PER_MINUTE, LOGIN_PER_MINUTE, READ_VOTE_PER_MINUTE,
    RouteLimit, UPLOAD_PER_MINUTE,
};
use crate::request_log;
use crate::state::AppState;
use crate::uploads::MAX_UPLOAD_BYTES;

/// Build the complete application router.
pub fn build_router(state: AppState) -> Router {
    let frontend_dir = state.settings.frontend_dir.clone();
    let index = ServeFile::new(frontend_dir.join("index.html"));

    Router::new()
        .route("/health", get(health))
        .nest("/api", api_router(&state))
        .nest_service("/uploads", ServeDir::new(state.uploads.dir()))
        .nest_service("/static", ServeDir::new(frontend_dir.join("static")))
        .fallback_service(ServeDir::new(&frontend_dir).fallback(index))
        .layer(from_fn(request_log::request_span))
        .layer(cors_layer(&state.settings.allowed_origins))
        .with_state(state)
}

fn api_router(state: &AppState) -> Router<AppState> {
    let default = state.settings.rate_limit_per_minute;
    let limit = |scope: &'static str, per_minute: u32| {
        RouteLimit::new(Arc::clone(&state.limiter), scope, per_minute)
    };

    Router::new()
        .route(
            "/auth/login",
            limited(post(auth::login), limit("login", LOGIN_PER_MINUTE)),
        )
        .route(
            "/auth/change-password",
            limited(post(auth::change_password), limit("change_password", default)),
        )
        .route(
            "/auth/verify",
            limited(get(auth::verify), limit("verify", default)),
        )
        .route(
            "/categories",
            limited(get(categories::list), limit("list_categories", default)).merge(limited(
                post(categories::create),
                limit("create_category", CREATE_PER_MINUTE),
            )),
        )
        .route(
            "/categories/{id}",
            limited(
                put(categories::update).delete(categories::remove),
                limit("category", default),
            ),
        )
        .route(
            "/nominees",
            limited(get(nominees::list), limit("list_nominees", default)).merge(limited(
                post(nominees::create),
                limit("create_nominee", CREATE_PER_MINUTE),
            )),
        )
        .route(
            "/nominees/{id}",
            limited(
                put(nominees::update).delete(nominees::remove),
                limit("nominee", default),
            ),
        )
        .route(
            "/nominees/{id}/image",
            limited(delete(nominees::remove_image), limit("nominee_image", default)),
        )
        .route(
            "/vote",
            limited(post(votes::cast), limit("cast_vote", CAST_VOTE_PER_MINUTE)),
        )
        .route(
            "/vote/{category_id}",
            limited(get(votes::current), limit("read_vote", READ_VOTE_PER_MINUTE)),
        )
        .route(
            "/results/{category_id}",
            limited(get(votes::results), limit("results", default)),
        )
        .route(
            "/upload",
            limited(post(upload::upload), limit("upload", UPLOAD_PER_MINUTE))
                .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        )
        .fallback(api_not_found)
}

fn limited(route: MethodRouter<AppState>, limit: RouteLimit) -> MethodRouter<AppState> {
    route.route_layer(from_fn_with_state(limit, rate_limit::enforce))
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(%origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

async fn api_not_found() -> ApiError {
    ApiError::NotFound("Not found".into())
}
