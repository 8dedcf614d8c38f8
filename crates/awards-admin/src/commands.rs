//! Admin subcommands: seed, set-password, stats.
//!
//! User-facing output uses writeln! to the given writer (stdout in the binary).

use std::io::Write;

use awards_core::DatabaseError;
use awards_core::password::{check_new_password, hash_password};
use awards_core::storage::AwardsDatabase;

use crate::sample::{sample_awards, seed_sample};

#[derive(clap::Subcommand, Debug)]
pub enum AdminCommand {
    /// Insert the sample award categories and nominees.
    Seed {
        /// Delete all categories, nominees and votes first.
        #[arg(long)]
        reset: bool,
    },
    /// Set a new password for an existing admin.
    SetPassword {
        /// Admin username.
        username: String,
        /// New password (at least 6 characters).
        #[arg(long, env = "AWARDS_NEW_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Show nominee and vote counts per category.
    Stats,
}

/// Execute an admin subcommand.
pub async fn run(
    command: AdminCommand,
    db: &AwardsDatabase,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    match command {
        AdminCommand::Seed { reset } => seed(db, reset, out).await,
        AdminCommand::SetPassword { username, password } => {
            set_password(db, &username, &password, out).await
        }
        AdminCommand::Stats => stats(db, out).await,
    }
}

async fn seed(db: &AwardsDatabase, reset: bool, out: &mut impl Write) -> anyhow::Result<()> {
    let samples = sample_awards()?;
    let report = seed_sample(db, &samples, reset).await?;

    if let Some(cleared) = report.cleared {
        writeln!(out, "Removed {cleared} existing categories")?;
    }
    writeln!(
        out,
        "Created {} categories and {} nominees ({} categories already present)",
        report.categories_created, report.nominees_created, report.categories_skipped
    )?;
    Ok(())
}

async fn set_password(
    db: &AwardsDatabase,
    username: &str,
    password: &str,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    check_new_password(password).map_err(|e| anyhow::anyhow!(e))?;
    let hash = hash_password(password).map_err(|e| anyhow::anyhow!("Password hashing failed: {e}"))?;

    match db.update_admin_password(username, &hash).await {
        Ok(()) => {}
        Err(DatabaseError::NotFound(_)) => anyhow::bail!("No admin named {username:?}"),
        Err(e) => return Err(e.into()),
    }

    writeln!(out, "Password updated for {username}")?;
    Ok(())
}

async fn stats(db: &AwardsDatabase, out: &mut impl Write) -> anyhow::Result<()> {
    let stats = db.category_stats().await?;
    if stats.is_empty() {
        writeln!(out, "No categories.")?;
        return Ok(());
    }

    let width = stats
        .iter()
        .map(|s| s.name.chars().count())
        .max()
        .unwrap_or(0)
        .max("CATEGORY".len());

    writeln!(out, "{:<width$}  {:>8}  {:>6}  LOCKED", "CATEGORY", "NOMINEES", "VOTES")?;
    for s in &stats {
        writeln!(
            out,
            "{:<width$}  {:>8}  {:>6}  {}",
            s.name,
            s.nominee_count,
            s.vote_count,
            if s.voting_locked { "yes" } else { "no" }
        )?;
    }

    let total: i64 = stats.iter().map(|s| s.vote_count).sum();
    writeln!(out, "{} categories, {total} votes", stats.len())?;
    Ok(())
}
