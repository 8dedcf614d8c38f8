//! Awards Core Library
//!
//! Shared functionality for the awards voting components:
//! - `SQLite` storage for categories, nominees, votes, and admin users
//! - Input validation and sanitization for registry writes
//! - Database pool helpers and common error types
//! - Tracing initialisation

pub mod db;
pub mod password;
pub mod storage;
pub mod tracing_init;
pub mod validation;

pub use db::DatabaseError;
pub use storage::AwardsDatabase;
