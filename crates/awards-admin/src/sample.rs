//! Bundled sample ceremony used by `awards-admin seed`.

use anyhow::Context;
use serde::Deserialize;
use tracing::{debug, info};

use awards_core::db::new_id;
use awards_core::storage::AwardsDatabase;
use awards_core::validation::{CategoryFields, NomineeFields, sanitize};

const SAMPLE_AWARDS: &str = include_str!("../data/sample_awards.json");

#[derive(Debug, Clone, Deserialize)]
pub struct SampleCategory {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub nominees: Vec<SampleNominee>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SampleNominee {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub image_url: Option<String>,
    pub youtube_url: Option<String>,
}

/// What a seeding run changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeedReport {
    /// Categories deleted by `--reset`, if it was given.
    pub cleared: Option<u64>,
    pub categories_created: usize,
    pub categories_skipped: usize,
    pub nominees_created: usize,
}

/// Parse the bundled sample categories and nominees.
pub fn sample_awards() -> anyhow::Result<Vec<SampleCategory>> {
    serde_json::from_str(SAMPLE_AWARDS).context("Bundled sample data is malformed")
}

/// Insert `samples`, skipping categories whose name already exists.
///
/// With `reset`, every category, nominee and vote is deleted first.
pub async fn seed_sample(
    db: &AwardsDatabase,
    samples: &[SampleCategory],
    reset: bool,
) -> anyhow::Result<SeedReport> {
    let mut report = SeedReport::default();

    if reset {
        let cleared = db.clear_registry().await?;
        info!(categories = cleared, "Cleared existing awards data");
        report.cleared = Some(cleared);
    }

    for sample in samples {
        if db.get_category_by_name(&sanitize(&sample.name)).await?.is_some() {
            debug!(name = %sample.name, "Category exists, skipping");
            report.categories_skipped += 1;
            continue;
        }

        let fields = CategoryFields {
            name: sample.name.clone(),
            description: sample.description.clone(),
            voting_locked: false,
        }
        .validated()
        .with_context(|| format!("Invalid sample category {:?}", sample.name))?;
        let category = db.create_category(&new_id(), &fields).await?;
        report.categories_created += 1;

        for nominee in &sample.nominees {
            let fields = NomineeFields {
                name: nominee.name.clone(),
                description: nominee.description.clone(),
                category_id: category.id.clone(),
                image_url: nominee.image_url.clone(),
                youtube_url: nominee.youtube_url.clone(),
            }
            .validated()
            .with_context(|| format!("Invalid sample nominee {:?}", nominee.name))?;
            db.create_nominee(&new_id(), &fields).await?;
            report.nominees_created += 1;
        }

        info!(
            category = %category.name,
            nominees = sample.nominees.len(),
            "Seeded category"
        );
    }

    Ok(report)
}
