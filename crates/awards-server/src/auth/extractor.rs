//! Bearer-token extractor guarding admin routes.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

use crate::error::ApiError;
use crate::state::AppState;

use super::claims::Claims;

/// Claims of an authenticated admin, extracted from `Authorization: Bearer`.
///
/// Handlers that take this argument reject unauthenticated requests with 401.
#[derive(Debug, Clone)]
pub struct AdminAuth(pub Claims);

impl AdminAuth {
    pub fn username(&self) -> &str {
        self.0.username()
    }
}

impl FromRequestParts<AppState> for AdminAuth {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .ok_or_else(|| ApiError::Unauthorized("Missing authorization header".into()))?;

        let claims = state
            .jwt
            .validate(token.trim())
            .map_err(|_| ApiError::Unauthorized("Invalid token".into()))?;

        if !claims.is_admin() {
            return Err(ApiError::Forbidden("Admin role required".into()));
        }

        Ok(Self(claims))
    }
}
