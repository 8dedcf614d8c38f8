//! Awards Admin CLI Library
//!
//! Operator tasks run directly against the awards database:
//! - Seeding the bundled sample ceremony
//! - Resetting admin passwords
//! - Per-category vote statistics

pub mod commands;
pub mod sample;
