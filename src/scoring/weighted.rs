use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{InsightsError, Result};
use crate::metrics::VideoMetrics;
use crate::scoring::Score;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreWeights {
    pub engagement: f64,
    pub view_percentage: f64,
    pub subscriber_conversion: f64,
    pub watch_time: f64,
    pub log_views: f64,
    pub divisor: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            engagement: 9.0,
            view_percentage: 10.0,
            subscriber_conversion: 8.0,
            watch_time: 1.0,
            log_views: 1000.0,
            divisor: 100.0,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ScoreCalculator {
    weights: ScoreWeights,
}

impl ScoreCalculator {
    pub fn new(weights: ScoreWeights) -> Self {
        Self { weights }
    }

    pub fn weights(&self) -> &ScoreWeights {
        &self.weights
    }

    /// Rates are on a percentage scale; views enter logarithmically so
    /// channel size does not dominate the quality terms.
    pub fn score(&self, metrics: &VideoMetrics) -> Result<Score> {
        let video_id = metrics.video_id.as_str();
        if metrics.views.is_nan() || metrics.views <= 0.0 {
            return Err(InsightsError::invalid_metrics(
                video_id,
                "views must be greater than zero",
            ));
        }

        let engagement_rate = metrics.engagement_count() / metrics.views * 100.0;
        let subscriber_conversion = metrics.subscribers_gained / metrics.views * 100.0;

        let mut total = 0.0;
        total += self.weights.engagement * engagement_rate;
        total += self.weights.view_percentage * metrics.average_view_percentage;
        total += self.weights.subscriber_conversion * subscriber_conversion;
        total += self.weights.watch_time * metrics.watch_time_minutes;
        total += self.weights.log_views * metrics.views.ln();

        let value = total / self.weights.divisor;
        if !value.is_finite() {
            return Err(InsightsError::invalid_metrics(
                video_id,
                format!("score is not finite ({value})"),
            ));
        }

        debug!(video_id, score = value, engagement_rate, "video scored");
        Ok(Score {
            video_id: metrics.video_id.clone(),
            value,
            engagement_rate,
            subscriber_conversion,
        })
    }
}
