//! Awards Admin CLI
//!
//! Maintenance commands for the awards voting database.

use std::io;
use std::path::PathBuf;

use clap::Parser;
use tracing::info;

use awards_core::storage::AwardsDatabase;
use awards_core::tracing_init::{LogFormat, init_tracing};

use awards_admin::commands::{self, AdminCommand};

#[derive(Parser, Debug)]
#[command(name = "awards-admin")]
#[command(version, about = "Awards voting admin tool", long_about = None)]
struct Cli {
    /// Path to SQLite database file (default: ~/.awards/awards.db).
    #[arg(long, env = "DATABASE_PATH", global = true)]
    db_path: Option<PathBuf>,

    /// Output logs as JSON.
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: AdminCommand,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing("awards_admin=info,awards_core=warn", LogFormat::from_json_flag(cli.log_json))?;

    let db_path = match cli.db_path {
        Some(path) => path,
        None => default_db_path()?,
    };
    info!(path = %db_path.display(), "Opening awards database");
    let db = AwardsDatabase::open(&db_path).await?;

    let result = commands::run(cli.command, &db, &mut io::stdout().lock()).await;
    db.close().await;
    result
}

fn default_db_path() -> anyhow::Result<PathBuf> {
    let home =
        dirs::home_dir().ok_or_else(|| anyhow::anyhow!("Cannot determine home directory"))?;
    Ok(home.join(".awards").join("awards.db"))
}
