//! Server configuration from command-line flags and environment variables.

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::Parser;

use crate::auth::jwt::DEFAULT_ACCESS_TTL_SECS;
use crate::auth::seed::DefaultAdmin;
use crate::cache::DEFAULT_CACHE_CAPACITY;
use crate::rate_limit::DEFAULT_PER_MINUTE;

const DEV_JWT_SECRET: &str = "dev-secret-change-me";

#[derive(Parser, Debug)]
#[command(name = "awards-server")]
#[command(version, about = "Awards voting server - categories, nominees, votes, results")]
pub struct ServerArgs {
    /// Address to listen on.
    #[arg(long, env = "LISTEN_ADDR", default_value = "0.0.0.0:5001")]
    pub addr: SocketAddr,

    /// Path to SQLite database file (default: ~/.awards/awards.db).
    #[arg(long, env = "DATABASE_PATH")]
    pub db_path: Option<PathBuf>,

    /// JWT signing secret.
    #[arg(long, env = "JWT_SECRET_KEY", default_value = DEV_JWT_SECRET, hide_env_values = true)]
    pub jwt_secret: String,

    /// Access token TTL in seconds.
    #[arg(long, env = "JWT_ACCESS_TTL", default_value_t = DEFAULT_ACCESS_TTL_SECS)]
    pub access_ttl: i64,

    /// Comma-separated list of origins allowed by CORS.
    #[arg(
        long,
        env = "ALLOWED_ORIGINS",
        default_value = "http://localhost:3000",
        value_delimiter = ','
    )]
    pub allowed_origins: Vec<String>,

    /// Ceiling for API routes without a dedicated limit.
    #[arg(long, env = "RATE_LIMIT_PER_MINUTE", default_value_t = DEFAULT_PER_MINUTE)]
    pub rate_limit_per_minute: u32,

    /// Directory receiving uploaded images.
    #[arg(long, env = "UPLOAD_DIR", default_value = "frontend/build/uploads")]
    pub upload_dir: PathBuf,

    /// Built frontend served for non-API paths.
    #[arg(long, env = "FRONTEND_BUILD_DIR", default_value = "frontend/build")]
    pub frontend_dir: PathBuf,

    /// Initial password of the `admin` account.
    #[arg(long, env = "ADMIN_PASSWORD", default_value = "admin123", hide_env_values = true)]
    pub admin_password: String,

    /// Initial password of the `nimi` account.
    #[arg(long, env = "NIMI_PASSWORD", default_value = "nimi123", hide_env_values = true)]
    pub nimi_password: String,

    /// Maximum number of cached responses.
    #[arg(long, default_value_t = DEFAULT_CACHE_CAPACITY)]
    pub cache_capacity: usize,

    /// Output logs as JSON (for structured log aggregation).
    #[arg(long)]
    pub log_json: bool,
}

impl ServerArgs {
    pub fn into_settings(self) -> Settings {
        let allowed_origins = self
            .allowed_origins
            .into_iter()
            .map(|o| o.trim().to_string())
            .filter(|o| !o.is_empty())
            .collect();

        Settings {
            addr: self.addr,
            db_path: self.db_path,
            jwt_secret: self.jwt_secret,
            access_ttl: self.access_ttl,
            allowed_origins,
            rate_limit_per_minute: self.rate_limit_per_minute,
            upload_dir: self.upload_dir,
            frontend_dir: self.frontend_dir,
            default_admins: vec![
                DefaultAdmin::new("admin", self.admin_password),
                DefaultAdmin::new("nimi", self.nimi_password),
            ],
            cache_capacity: self.cache_capacity,
        }
    }
}

/// Resolved server settings.
#[derive(Debug, Clone)]
pub struct Settings {
    pub addr: SocketAddr,
    pub db_path: Option<PathBuf>,
    pub jwt_secret: String,
    pub access_ttl: i64,
    pub allowed_origins: Vec<String>,
    pub rate_limit_per_minute: u32,
    pub upload_dir: PathBuf,
    pub frontend_dir: PathBuf,
    pub default_admins: Vec<DefaultAdmin>,
    pub cache_capacity: usize,
}

impl Settings {
    pub fn uses_dev_secret(&self) -> bool {
        self.jwt_secret == DEV_JWT_SECRET
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from(([127, 0, 0, 1], 5001)),
            db_path: None,
            jwt_secret: DEV_JWT_SECRET.to_string(),
            access_ttl: DEFAULT_ACCESS_TTL_SECS,
            allowed_origins: vec!["http://localhost:3000".to_string()],
            rate_limit_per_minute: DEFAULT_PER_MINUTE,
            upload_dir: PathBuf::from("frontend/build/uploads"),
            frontend_dir: PathBuf::from("frontend/build"),
            default_admins: vec![
                DefaultAdmin::new("admin", "admin123"),
                DefaultAdmin::new("nimi", "nimi123"),
            ],
            cache_capacity: DEFAULT_CACHE_CAPACITY,
        }
    }
}
