//! Admin authentication.
//!
//! Provides JWT token management, the request extractor guarding admin
//! routes, and startup seeding of default admin accounts.

pub mod claims;
pub mod extractor;
pub mod jwt;
pub mod seed;

pub use claims::Claims;
pub use extractor::AdminAuth;
pub use jwt::JwtManager;
