//! Awards Voting Server Library
//!
//! HTTP side of the awards voting service:
//! - JWT admin authentication and default admin seeding
//! - REST routes for categories, nominees, votes, results, and uploads
//! - Response cache with resource-scoped invalidation
//! - Per-route, per-client rate limiting
//! - Local upload storage and frontend asset serving

pub mod auth;
pub mod cache;
pub mod client_ip;
pub mod config;
pub mod error;
pub mod rate_limit;
pub mod request_log;
pub mod routes;
pub mod state;
pub mod uploads;

pub use config::Settings;
pub use error::ApiError;
pub use routes::build_router;
pub use state::AppState;
