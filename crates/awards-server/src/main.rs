//! Awards Voting Server
//!
//! HTTP service for award categories, nominees, votes and results.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tracing::{info, warn};

use awards_core::storage::AwardsDatabase;
use awards_core::tracing_init::{LogFormat, init_tracing};

use awards_server::auth::seed::seed_default_admins;
use awards_server::config::ServerArgs;
use awards_server::rate_limit::IDLE_BUCKET_TTL;
use awards_server::{AppState, build_router};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = ServerArgs::parse();
    init_tracing(
        "awards_server=info,awards_core=info",
        LogFormat::from_json_flag(args.log_json),
    )?;
    let settings = args.into_settings();

    info!(
        version = env!("CARGO_PKG_VERSION"),
        addr = %settings.addr,
        "Starting awards-server"
    );

    if settings.uses_dev_secret() {
        warn!("JWT_SECRET_KEY not set; using the development secret");
    }

    let db_path = match &settings.db_path {
        Some(path) => path.clone(),
        None => default_db_path()?,
    };
    info!(path = %db_path.display(), "Opening awards database");
    let db = AwardsDatabase::open(&db_path).await?;

    let created = seed_default_admins(&db, &settings.default_admins).await?;
    if created > 0 {
        info!(created, "Seeded default admin accounts");
    }

    let addr = settings.addr;
    let state = AppState::new(db.clone(), settings);
    state.uploads.ensure_dir().await?;

    // Drop rate-limit buckets for clients that went quiet.
    let limiter = Arc::clone(&state.limiter);
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(300));
        interval.tick().await; // Skip first immediate tick
        loop {
            interval.tick().await;
            limiter.prune_idle(IDLE_BUCKET_TTL).await;
        }
    });

    let app = build_router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "Awards server listening");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for shutdown signal");
        }
        info!("Received shutdown signal");
    })
    .await?;

    db.close().await;
    info!("Awards server stopped");
    Ok(())
}

fn default_db_path() -> anyhow::Result<PathBuf> {
    let home =
        dirs::home_dir().ok_or_else(|| anyhow::anyhow!("Cannot determine home directory"))?;
    Ok(home.join(".awards").join("awards.db"))
}
