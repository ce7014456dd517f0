use serde::Serialize;

use crate::advice::AdviceResult;
use crate::metrics::VideoRecord;
use crate::retention::RetentionSignals;
use crate::scoring::Score;

/// Everything the dashboard shows for one analysed video.
#[derive(Debug, Clone, Serialize)]
pub struct VideoReport {
    pub video_id: String,
    pub title: Option<String>,
    pub views: f64,
    pub engagement_count: f64,
    pub engagement_rate: Option<f64>,
    pub subscribers_gained: f64,
    pub average_view_duration: f64,
    pub average_view_percentage: f64,
    pub card_click_rate: f64,
    pub score: Score,
    pub retention: RetentionSignals,
    pub retention_curve: Vec<f64>,
    pub relative_retention: Vec<f64>,
    pub advice: AdviceResult,
}

impl VideoReport {
    pub fn new(
        record: VideoRecord,
        score: Score,
        retention: RetentionSignals,
        advice: AdviceResult,
    ) -> Self {
        let metrics = record.metrics;
        Self {
            engagement_count: metrics.engagement_count(),
            engagement_rate: metrics.engagement_rate(),
            video_id: metrics.video_id,
            title: record.title,
            views: metrics.views,
            subscribers_gained: metrics.subscribers_gained,
            average_view_duration: metrics.average_view_duration,
            average_view_percentage: metrics.average_view_percentage,
            card_click_rate: metrics.card_click_rate,
            score,
            retention,
            retention_curve: record.retention.ratios().to_vec(),
            relative_retention: record.relative_retention,
            advice,
        }
    }

    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or(&self.video_id)
    }
}
