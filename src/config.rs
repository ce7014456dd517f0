use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

use crate::advice::AdviceConfig;
use crate::error::{InsightsError, Result};
use crate::retention::RetentionConfig;
use crate::scoring::{RankingConfig, ScoreWeights};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InsightsConfig {
    pub scoring: ScoreWeights,
    pub ranking: RankingConfig,
    pub advice: AdviceConfig,
    pub retention: RetentionConfig,
    pub logging: LoggingConfig,
}

impl InsightsConfig {
    pub fn load(path: Option<PathBuf>) -> Result<(Self, Option<PathBuf>)> {
        let config_path = path.or_else(default_config_path);
        let mut config = match config_path.as_ref() {
            Some(path) if path.exists() => Self::from_file(path)?,
            _ => InsightsConfig::default(),
        };

        config.apply_env_overrides();
        config.validate()?;
        Ok((config, config_path))
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        toml::from_str(contents)
            .map_err(|err| InsightsError::Config(format!("failed to parse config: {}", err)))
    }

    pub fn write(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let payload = toml::to_string_pretty(self)
            .map_err(|err| InsightsError::Config(format!("failed to serialize config: {}", err)))?;
        std::fs::write(path, payload)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.ranking.top_n == 0 {
            return Err(InsightsError::Config("ranking.top_n must be at least 1".to_string()));
        }
        if self.retention.decile_len < 2 {
            return Err(InsightsError::Config(
                "retention.decile_len must be at least 2".to_string(),
            ));
        }

        let thresholds = [
            ("advice.min_views", self.advice.min_views),
            ("advice.max_engagement_rate", self.advice.max_engagement_rate),
            ("advice.max_view_percentage", self.advice.max_view_percentage),
            ("advice.max_card_click_rate", self.advice.max_card_click_rate),
            ("retention.intro_drop", self.retention.intro_drop),
            ("retention.sustained_drop", self.retention.sustained_drop),
        ];
        for (name, value) in thresholds {
            if !value.is_finite() || value < 0.0 {
                return Err(InsightsError::Config(format!(
                    "{} must be a non-negative number, got {}",
                    name, value
                )));
            }
        }

        if self.scoring.divisor == 0.0 || !self.scoring.divisor.is_finite() {
            return Err(InsightsError::Config(
                "scoring.divisor must be a non-zero number".to_string(),
            ));
        }
        Ok(())
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(top_n) = env::var("INSIGHTS_TOP_N") {
            if let Ok(value) = top_n.trim().parse::<usize>() {
                self.ranking.top_n = value;
            }
        }
        if let Ok(seed) = env::var("INSIGHTS_ADVICE_SEED") {
            if let Ok(value) = seed.trim().parse::<u64>() {
                self.advice.seed = Some(value);
            }
        }
        if let Ok(dir) = env::var("INSIGHTS_CATALOG_DIR") {
            if !dir.trim().is_empty() {
                self.advice.catalog_dir = Some(PathBuf::from(dir));
            }
        }
        if let Ok(level) = env::var("INSIGHTS_LOG_LEVEL") {
            if !level.trim().is_empty() {
                self.logging.level = level;
            }
        }
    }
}

fn default_config_path() -> Option<PathBuf> {
    env::var("INSIGHTS_CONFIG_PATH")
        .ok()
        .filter(|value| !value.trim().is_empty())
        .map(PathBuf::from)
        .or_else(|| Some(PathBuf::from("config/insights.toml")))
}
