use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::Path;
use tracing::{info, warn};

use crate::advice::{AdviceCategory, AdviceConfig};
use crate::error::{InsightsError, Result};

const BUILTIN_POOLS: [(AdviceCategory, &str); 6] = [
    (
        AdviceCategory::LowViewCount,
        include_str!("../../config/advice/low_view_count.txt"),
    ),
    (
        AdviceCategory::LowEngagement,
        include_str!("../../config/advice/low_engagement.txt"),
    ),
    (
        AdviceCategory::LowViewPercentage,
        include_str!("../../config/advice/low_view_percentage.txt"),
    ),
    (
        AdviceCategory::LowCardClickRate,
        include_str!("../../config/advice/low_card_click_rate.txt"),
    ),
    (
        AdviceCategory::IntroDecline,
        include_str!("../../config/advice/intro_decline.txt"),
    ),
    (
        AdviceCategory::SustainedDecline,
        include_str!("../../config/advice/sustained_decline.txt"),
    ),
];

/// Read-only pools of advice text keyed by category.
#[derive(Debug, Clone, Default)]
pub struct AdviceCatalog {
    pools: HashMap<AdviceCategory, Vec<String>>,
}

impl AdviceCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builtin() -> Self {
        let mut catalog = Self::new();
        for (category, contents) in BUILTIN_POOLS {
            catalog.insert(category, parse_pool(contents));
        }
        catalog
    }

    /// Loads `<key>.txt` for every category. Missing or unreadable files
    /// leave that category empty; only an unreadable directory is an error.
    pub fn load_dir(dir: &Path) -> Result<Self> {
        if !dir.is_dir() {
            return Err(InsightsError::Config(format!(
                "advice catalog directory not found: {}",
                dir.display()
            )));
        }

        let mut catalog = Self::new();
        for category in AdviceCategory::ALL {
            let path = dir.join(format!("{}.txt", category.key()));
            match std::fs::read_to_string(&path) {
                Ok(contents) => catalog.insert(category, parse_pool(&contents)),
                Err(err) if err.kind() == ErrorKind::NotFound => {
                    warn!(%category, path = %path.display(), "advice pool missing");
                }
                Err(err) => {
                    warn!(%category, path = %path.display(), error = %err, "advice pool unreadable");
                }
            }
        }
        Ok(catalog)
    }

    /// Built-in pools unless a catalog directory is configured. A directory
    /// that cannot be read yields an empty catalog, so every category falls
    /// back to its default sentence.
    pub fn from_config(config: &AdviceConfig) -> Self {
        let catalog = match config.catalog_dir.as_deref() {
            Some(dir) => Self::load_dir(dir).unwrap_or_else(|err| {
                warn!(error = %err, "advice catalog unavailable");
                Self::new()
            }),
            None => Self::builtin(),
        };

        let missing = catalog.missing_categories();
        if missing.is_empty() {
            info!("advice catalog loaded");
        } else {
            for category in missing {
                warn!(%category, "advice pool empty, fallback advice will be used");
            }
        }
        catalog
    }

    pub fn insert(&mut self, category: AdviceCategory, entries: Vec<String>) {
        let entries: Vec<String> = entries
            .into_iter()
            .map(|entry| entry.trim().to_string())
            .filter(|entry| !entry.is_empty())
            .collect();
        self.pools.insert(category, entries);
    }

    pub fn pool(&self, category: AdviceCategory) -> Option<&[String]> {
        self.pools.get(&category).map(Vec::as_slice)
    }

    pub fn missing_categories(&self) -> Vec<AdviceCategory> {
        AdviceCategory::ALL
            .into_iter()
            .filter(|category| self.pool(*category).map_or(true, <[String]>::is_empty))
            .collect()
    }

    pub fn validate(&self) -> Result<()> {
        match self.missing_categories().first() {
            Some(category) => Err(InsightsError::catalog_unavailable(
                *category,
                "no advice entries",
            )),
            None => Ok(()),
        }
    }

    pub fn pick<R: Rng + ?Sized>(&self, category: AdviceCategory, rng: &mut R) -> Result<&str> {
        let pool = self
            .pool(category)
            .ok_or_else(|| InsightsError::catalog_unavailable(category, "pool not loaded"))?;
        pool.choose(rng)
            .map(String::as_str)
            .ok_or_else(|| InsightsError::catalog_unavailable(category, "pool is empty"))
    }
}

fn parse_pool(contents: &str) -> Vec<String> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}
