//! `SQLite` storage for the awards voting service.
//!
//! Provides persistence for categories, nominees, votes, and admin users.

mod admins;
mod categories;
mod db;
mod models;
mod nominees;
mod votes;

#[cfg(test)]
mod tests;

pub use admins::ADMIN_ROLE;
pub use db::AwardsDatabase;
pub use models::*;
pub use votes::VoteError;
