use thiserror::Error;

use crate::advice::AdviceCategory;

#[derive(Error, Debug)]
pub enum InsightsError {
    #[error("invalid metrics for video {video_id}: {reason}")]
    InvalidMetrics { video_id: String, reason: String },

    #[error("advice catalog unavailable for {category}: {reason}")]
    CatalogUnavailable {
        category: AdviceCategory,
        reason: String,
    },

    #[error("configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl InsightsError {
    pub fn invalid_metrics(video_id: &str, reason: impl Into<String>) -> Self {
        InsightsError::InvalidMetrics {
            video_id: video_id.to_string(),
            reason: reason.into(),
        }
    }

    pub fn catalog_unavailable(category: AdviceCategory, reason: impl Into<String>) -> Self {
        InsightsError::CatalogUnavailable {
            category,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, InsightsError>;
