use rand::Rng;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::advice::{AdviceCatalog, AdviceCategory, AdviceRule, AggregateStats, ADVICE_RULES};
use crate::retention::RetentionSignals;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AdviceConfig {
    pub min_views: f64,
    pub max_engagement_rate: f64,
    pub max_view_percentage: f64,
    pub max_card_click_rate: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub catalog_dir: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Default for AdviceConfig {
    fn default() -> Self {
        Self {
            min_views: 10_000.0,
            max_engagement_rate: 10.0,
            max_view_percentage: 20.0,
            max_card_click_rate: 2.0,
            catalog_dir: None,
            seed: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AdviceItem {
    pub category: AdviceCategory,
    pub message: String,
    pub fallback: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AdviceResult {
    pub items: Vec<AdviceItem>,
}

impl AdviceResult {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn categories(&self) -> Vec<AdviceCategory> {
        self.items.iter().map(|item| item.category).collect()
    }

    pub fn messages(&self) -> Vec<&str> {
        self.items.iter().map(|item| item.message.as_str()).collect()
    }

    pub fn into_messages(self) -> Vec<String> {
        self.items.into_iter().map(|item| item.message).collect()
    }
}

#[derive(Debug, Clone)]
pub struct AdviceGenerator {
    config: AdviceConfig,
    catalog: Arc<AdviceCatalog>,
    rules: &'static [AdviceRule],
}

impl AdviceGenerator {
    pub fn new(config: AdviceConfig, catalog: Arc<AdviceCatalog>) -> Self {
        Self {
            config,
            catalog,
            rules: &ADVICE_RULES,
        }
    }

    pub fn triggered_categories(
        &self,
        stats: &AggregateStats,
        signals: &RetentionSignals,
    ) -> Vec<AdviceCategory> {
        self.rules
            .iter()
            .filter(|rule| rule.applies(stats, signals, &self.config))
            .map(|rule| rule.category)
            .collect()
    }

    pub fn generate<R: Rng + ?Sized>(
        &self,
        stats: &AggregateStats,
        signals: &RetentionSignals,
        rng: &mut R,
    ) -> AdviceResult {
        let items = self
            .triggered_categories(stats, signals)
            .into_iter()
            .map(|category| self.advice_for(category, rng))
            .collect();
        AdviceResult { items }
    }

    fn advice_for<R: Rng + ?Sized>(&self, category: AdviceCategory, rng: &mut R) -> AdviceItem {
        match self.catalog.pick(category, rng) {
            Ok(message) => {
                debug!(%category, "advice selected");
                AdviceItem {
                    category,
                    message: message.to_string(),
                    fallback: false,
                }
            }
            Err(err) => {
                warn!(error = %err, "using fallback advice");
                AdviceItem {
                    category,
                    message: category.fallback_message(),
                    fallback: true,
                }
            }
        }
    }
}
